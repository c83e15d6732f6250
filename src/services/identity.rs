// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Auth (Identity Toolkit REST) client.
//!
//! Handles:
//! - Profile lookup for the signed-in user
//! - Display name / photo URL updates
//! - Password reset and verification emails
//!
//! Provider error codes are normalized so callers can map the two codes
//! users see distinct messages for (`too-many-requests`, `session-expired`).

use crate::error::{AppError, AuthProviderError};
use crate::models::UserProfile;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Kind of out-of-band email the provider sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OobRequestType {
    PasswordReset,
    VerifyEmail,
}

/// Email recorded by the mock provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub request_type: OobRequestType,
    pub recipient: String,
}

/// In-memory auth provider (tests and local runs).
#[derive(Default)]
pub struct MockIdentity {
    accounts: DashMap<String, UserProfile>,
    sent: Mutex<Vec<SentEmail>>,
    next_error: Mutex<Option<AuthProviderError>>,
}

impl MockIdentity {
    /// Add or replace an account.
    pub fn seed(&self, profile: UserProfile) {
        self.accounts.insert(profile.uid.clone(), profile);
    }

    /// Make the next provider call fail with `err`.
    pub fn fail_next(&self, err: AuthProviderError) {
        if let Ok(mut next) = self.next_error.lock() {
            *next = Some(err);
        }
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn take_error(&self) -> Result<(), AppError> {
        let err = self.next_error.lock().ok().and_then(|mut next| next.take());
        match err {
            Some(err) => Err(AppError::AuthProvider(err)),
            None => Ok(()),
        }
    }

    fn record(&self, request_type: OobRequestType, recipient: String) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentEmail {
                request_type,
                recipient,
            });
        }
    }
}

#[derive(Clone)]
enum Backend {
    Remote {
        http: reqwest::Client,
        base_url: String,
        api_key: String,
    },
    Mock(Arc<MockIdentity>),
}

/// Auth provider client.
#[derive(Clone)]
pub struct IdentityService {
    backend: Backend,
}

impl IdentityService {
    /// Create a client for the hosted Identity Toolkit API.
    pub fn new(api_key: String) -> Self {
        Self {
            backend: Backend::Remote {
                http: reqwest::Client::new(),
                base_url: IDENTITY_TOOLKIT_URL.to_string(),
                api_key,
            },
        }
    }

    /// Create a client for a different base URL (Auth emulator).
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            backend: Backend::Remote {
                http: reqwest::Client::new(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
                api_key,
            },
        }
    }

    /// Create an in-memory provider; the handle allows seeding accounts.
    pub fn new_mock() -> (Self, Arc<MockIdentity>) {
        let mock = Arc::new(MockIdentity::default());
        (
            Self {
                backend: Backend::Mock(mock.clone()),
            },
            mock,
        )
    }

    /// Current profile of the signed-in user.
    pub async fn lookup(&self, uid: &str, id_token: &str) -> Result<UserProfile, AppError> {
        match &self.backend {
            Backend::Remote { .. } => {
                let response: LookupResponse = self
                    .call("accounts:lookup", &serde_json::json!({ "idToken": id_token }))
                    .await?;
                response
                    .users
                    .into_iter()
                    .next()
                    .map(UserProfile::from)
                    .ok_or_else(|| AppError::NotFound(format!("User {}", uid)))
            }
            Backend::Mock(mock) => {
                mock.take_error()?;
                mock.accounts
                    .get(uid)
                    .map(|p| p.value().clone())
                    .ok_or_else(|| AppError::NotFound(format!("User {}", uid)))
            }
        }
    }

    /// Set display name and photo URL on the provider's profile record.
    pub async fn update_profile(
        &self,
        uid: &str,
        id_token: &str,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<UserProfile, AppError> {
        match &self.backend {
            Backend::Remote { .. } => {
                let body = UpdateRequest {
                    id_token,
                    display_name,
                    photo_url,
                    return_secure_token: false,
                };
                let _: serde_json::Value = self.call("accounts:update", &body).await?;
                self.lookup(uid, id_token).await
            }
            Backend::Mock(mock) => {
                mock.take_error()?;
                let mut account = mock
                    .accounts
                    .get_mut(uid)
                    .ok_or_else(|| AppError::NotFound(format!("User {}", uid)))?;
                // Omitted fields are left as they are, like the REST update
                if let Some(name) = display_name {
                    account.display_name = Some(name.to_string());
                }
                if let Some(url) = photo_url {
                    account.photo_url = Some(url.to_string());
                }
                Ok(account.clone())
            }
        }
    }

    /// Ask the provider to email a password reset link.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Remote { .. } => {
                let body = OobRequest {
                    request_type: OobRequestType::PasswordReset,
                    email: Some(email),
                    id_token: None,
                };
                let _: serde_json::Value = self.call("accounts:sendOobCode", &body).await?;
            }
            Backend::Mock(mock) => {
                mock.take_error()?;
                mock.record(OobRequestType::PasswordReset, email.to_string());
            }
        }
        tracing::info!("Password reset email requested");
        Ok(())
    }

    /// Ask the provider to email a verification link to the signed-in user.
    pub async fn send_verification_email(&self, uid: &str, id_token: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Remote { .. } => {
                let body = OobRequest {
                    request_type: OobRequestType::VerifyEmail,
                    email: None,
                    id_token: Some(id_token),
                };
                let _: serde_json::Value = self.call("accounts:sendOobCode", &body).await?;
            }
            Backend::Mock(mock) => {
                mock.take_error()?;
                mock.record(OobRequestType::VerifyEmail, uid.to_string());
            }
        }
        tracing::info!(uid, "Verification email requested");
        Ok(())
    }

    /// POST to an Identity Toolkit method and decode the JSON response.
    async fn call<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let Backend::Remote {
            http,
            base_url,
            api_key,
        } = &self.backend
        else {
            return Err(AppError::Internal(anyhow::anyhow!(
                "remote call on mock identity backend"
            )));
        };

        let url = format!("{}/{}", base_url, method);
        let response = http
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                AppError::AuthProvider(AuthProviderError::new("network-request-failed", e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let err = parse_provider_error(&body).unwrap_or_else(|| {
                AuthProviderError::new("internal-error", format!("HTTP {}: {}", status, body))
            });
            return Err(AppError::AuthProvider(err));
        }

        response.json().await.map_err(|e| {
            AppError::AuthProvider(AuthProviderError::new(
                "internal-error",
                format!("JSON parse error: {}", e),
            ))
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    id_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_url: Option<&'a str>,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobRequest<'a> {
    request_type: OobRequestType,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id_token: Option<&'a str>,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<ProviderUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderUser {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

impl From<ProviderUser> for UserProfile {
    fn from(user: ProviderUser) -> Self {
        UserProfile {
            uid: user.local_id,
            display_name: user.display_name,
            email: user.email,
            photo_url: user.photo_url,
            email_verified: user.email_verified,
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Parse `{"error": {"message": "CODE : detail"}}` into a normalized error.
fn parse_provider_error(body: &str) -> Option<AuthProviderError> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    let raw = envelope.error.message;
    let (raw_code, detail) = match raw.split_once(" : ") {
        Some((code, detail)) => (code.trim(), detail.trim().to_string()),
        None => (raw.trim(), String::new()),
    };

    let code = normalize_code(raw_code);
    let message = if detail.is_empty() {
        raw_code.to_string()
    } else {
        detail
    };
    Some(AuthProviderError::new(code, message))
}

/// Map Identity Toolkit codes onto the client SDK's kebab-case codes.
fn normalize_code(raw: &str) -> String {
    match raw {
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthProviderError::TOO_MANY_REQUESTS.to_string(),
        "TOKEN_EXPIRED" | "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => {
            AuthProviderError::SESSION_EXPIRED.to_string()
        }
        other => other.to_ascii_lowercase().replace('_', "-"),
    }
}
