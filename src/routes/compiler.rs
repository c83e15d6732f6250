// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Code execution panel routes.

use crate::error::Result;
use crate::services::executor::{Buffer, CompilerPanel, Language};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/compiler/languages", get(list_languages))
        .route("/api/compiler/run", post(run_code))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LanguagesResponse {
    pub languages: Vec<Language>,
    pub default: Language,
}

async fn list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: Language::ALL.to_vec(),
        default: Language::default(),
    })
}

/// The panel's Code and Input buffers plus the selected language.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    language: Language,
    #[serde(default)]
    code: String,
    #[serde(default)]
    input: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunResponse {
    pub message: String,
    pub language: Language,
    /// New contents of the Output buffer
    pub output: String,
}

async fn run_code(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RunRequest>,
) -> Result<Json<RunResponse>> {
    let mut panel = CompilerPanel::new(body.language);
    panel.set_buffer(Buffer::Code, body.code);
    panel.set_buffer(Buffer::Input, body.input);

    let message = panel.run(&state.executor).await?;

    Ok(Json(RunResponse {
        message,
        language: panel.language(),
        output: panel.buffer(Buffer::Output).to_string(),
    }))
}
