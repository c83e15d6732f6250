// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public authentication routes: session cookie and password reset.
//!
//! Sign-in itself happens in the client against Firebase Auth. The client
//! hands its ID token to `/auth/session` so later requests can authenticate
//! with the `cz_token` cookie instead of a bearer header.

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::{client_routes, MessageResponse, RedirectHint};
use crate::error::{AppError, Result};
use crate::middleware::auth::TOKEN_COOKIE;
use crate::services::TokenError;
use crate::AppState;

/// Delay before the client returns to the login page after a reset mail.
const RESET_REDIRECT_MS: u64 = 2000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/session", post(create_session))
        .route("/auth/logout", post(logout))
        .route("/auth/password-reset", post(password_reset))
}

#[derive(Deserialize, Validate)]
pub struct SessionRequest {
    #[validate(length(min = 1, message = "ID token is required"))]
    id_token: String,
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Verify an ID token and store it in the session cookie.
async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<SessionRequest>,
) -> Result<(CookieJar, Json<MessageResponse>)> {
    body.validate()?;

    let user = state
        .token_verifier
        .verify(&body.id_token)
        .await
        .map_err(|e| match e {
            TokenError::Invalid(_) => AppError::InvalidToken,
            TokenError::Transient(reason) => {
                tracing::warn!(%reason, "Token verification unavailable");
                AppError::Unavailable("Token verification is temporarily unavailable".to_string())
            }
        })?;
    tracing::info!(uid = %user.uid, email = ?user.email, "Session started");

    Ok((
        jar.add(session_cookie(body.id_token)),
        Json(
            MessageResponse::new("Logged in successfully")
                .with_redirect(RedirectHint::new(client_routes::HOME, 0)),
        ),
    ))
}

/// Clear the session cookie. An expired cookie is sent even if none came in.
async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let mut expired = session_cookie(String::new());
    expired.make_removal();
    (
        jar.add(expired),
        Json(
            MessageResponse::new("Logged out")
                .with_redirect(RedirectHint::new(client_routes::LOGIN, 0)),
        ),
    )
}

#[derive(Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Please enter a valid email"))]
    email: String,
}

/// Ask the auth provider to mail a password reset link.
async fn password_reset(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>> {
    body.validate()?;

    state.identity.send_password_reset(body.email.trim()).await?;

    Ok(Json(
        MessageResponse::new("Mail sent successfully")
            .with_redirect(RedirectHint::new(client_routes::LOGIN, RESET_REDIRECT_MS)),
    ))
}
