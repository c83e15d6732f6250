// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes for the signed-in user: profile and email verification.

use super::{client_routes, MessageResponse, RedirectHint};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::UserProfile;
use crate::services::profile::{ProfileImage, ProfileUpdate, MSG_UPDATED};
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Largest accepted profile image upload.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// API routes (require authentication via Firebase ID token).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route(
            "/api/profile",
            put(update_profile).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 64 * 1024)),
        )
        .route("/api/profile/upload-progress", get(get_upload_progress))
        .route("/api/verify-email", post(send_verification_email))
}

// ─── User Profile ────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NavLink {
    pub label: String,
    pub to: String,
}

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub email_verified: bool,
    /// Display name, or email when no name is set
    pub greeting: String,
    pub navigation: Vec<NavLink>,
    /// Set when the user still has to verify their email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<RedirectHint>,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        let navigation = [
            ("Problems", client_routes::PROBLEMS),
            ("Add Problem", client_routes::ADD_PROBLEM),
            ("Daily", client_routes::DAILY),
            ("Compiler", client_routes::COMPILER),
            ("Profile", client_routes::PROFILE),
        ]
        .into_iter()
        .map(|(label, to)| NavLink {
            label: label.to_string(),
            to: to.to_string(),
        })
        .collect();

        Self {
            greeting: profile.greeting_name(),
            next: (!profile.email_verified)
                .then(|| RedirectHint::new(client_routes::VERIFY_EMAIL, 0)),
            uid: profile.uid,
            display_name: profile.display_name,
            email: profile.email,
            photo_url: profile.photo_url,
            email_verified: profile.email_verified,
            navigation,
        }
    }
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state.identity.lookup(&user.uid, &user.id_token).await?;
    Ok(Json(profile.into()))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub profile: UserResponse,
    pub redirect: RedirectHint,
}

/// Update display name and/or profile image (multipart fields `name`, `image`).
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<ProfileUpdatedResponse>> {
    let mut update = ProfileUpdate::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("name") => {
                let name = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                update.name = Some(name.trim().to_string());
            }
            Some("image") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                if !content_type.starts_with("image/") {
                    return Err(AppError::BadRequest(format!(
                        "Unsupported image type: {}",
                        content_type
                    )));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !bytes.is_empty() {
                    update.image = Some(ProfileImage {
                        bytes: bytes.to_vec(),
                        content_type,
                    });
                }
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown multipart field");
            }
        }
    }

    let profile = state
        .profile
        .update(&user.uid, &user.id_token, update)
        .await?;

    Ok(Json(ProfileUpdatedResponse {
        message: MSG_UPDATED.to_string(),
        profile: profile.into(),
        redirect: RedirectHint::new(client_routes::HOME, state.config.redirect_delay_ms),
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UploadProgressResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub bytes_transferred: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_bytes: u64,
    pub percent: f64,
}

/// Progress of the user's latest profile image upload.
async fn get_upload_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UploadProgressResponse>> {
    let progress = state
        .profile
        .upload_progress(&user.uid)
        .ok_or_else(|| AppError::NotFound("No upload in progress".to_string()))?;

    Ok(Json(UploadProgressResponse {
        bytes_transferred: progress.bytes_transferred,
        total_bytes: progress.total_bytes,
        percent: progress.percent(),
    }))
}

// ─── Email Verification ──────────────────────────────────────

async fn send_verification_email(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MessageResponse>> {
    state
        .identity
        .send_verification_email(&user.uid, &user.id_token)
        .await?;

    Ok(Json(MessageResponse::new("Email sent successfully")))
}
