// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase ID token authentication middleware.

use crate::error::AppError;
use crate::services::TokenError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Cookie holding the client's current ID token.
pub const TOKEN_COOKIE: &str = "cz_token";

/// Authenticated user extracted from the ID token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Firebase Auth UID; every record is stored under it
    pub uid: String,
    /// Raw ID token, forwarded to Identity Toolkit and Storage
    pub id_token: String,
}

/// Middleware that requires a valid Firebase ID token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) => token.to_string(),
            None => return Err(AppError::Unauthorized.into_response()),
        }
    };

    let verified = match state.token_verifier.verify(&token).await {
        Ok(user) => user,
        Err(TokenError::Invalid(reason)) => {
            tracing::debug!(reason = %reason, "Rejected ID token");
            return Err(AppError::InvalidToken.into_response());
        }
        Err(TokenError::Transient(reason)) => {
            tracing::warn!(reason = %reason, "Token verification unavailable");
            return Err(AppError::Unavailable(
                "Token verification is temporarily unavailable".to_string(),
            )
            .into_response());
        }
    };

    request.extensions_mut().insert(AuthUser {
        uid: verified.uid,
        id_token: token,
    });

    Ok(next.run(request).await)
}
