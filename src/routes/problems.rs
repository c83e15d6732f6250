// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Problem routes: list, add, detail view with inline edits, delete.

use super::{client_routes, MessageResponse, RedirectHint};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    Difficulty, LinkSource, NewProblem, Problem, ProblemField, ProblemPatch, Status, Treatment,
};
use crate::services::problems::{MSG_ADDED, MSG_DELETED};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/problems", get(list_problems).post(create_problem))
        .route(
            "/api/problems/{id}",
            get(get_problem).delete(delete_problem),
        )
        .route("/api/problems/{id}/links", post(append_link))
        .route("/api/problems/{id}/{field}", put(patch_field))
}

// ─── Responses ───────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LinkResponse {
    pub url: String,
    pub source: LinkSource,
}

/// Problem as shown by the list and detail views.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProblemResponse {
    pub id: String,
    pub title: String,
    pub difficulty: String,
    pub difficulty_treatment: Treatment,
    pub status: String,
    pub status_treatment: Treatment,
    pub tags: Vec<String>,
    pub links: Vec<LinkResponse>,
    pub code: String,
    pub notes: String,
    pub description: String,
}

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self {
            difficulty_treatment: Treatment::for_difficulty(&p.difficulty),
            status_treatment: Treatment::for_status(&p.status),
            links: p
                .links
                .into_iter()
                .map(|url| LinkResponse {
                    source: LinkSource::classify(&url),
                    url,
                })
                .collect(),
            id: p.id,
            title: p.title,
            difficulty: p.difficulty,
            status: p.status,
            tags: p.tags,
            code: p.code,
            notes: p.notes,
            description: p.description,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProblemListResponse {
    pub problems: Vec<ProblemResponse>,
}

/// Response to a successful write that returns the stored record.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProblemWriteResponse {
    pub message: String,
    pub problem: ProblemResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectHint>,
}

// ─── List / Detail ───────────────────────────────────────────

async fn list_problems(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProblemListResponse>> {
    let problems = state.problems.list(&user.uid).await?;
    tracing::debug!(uid = %user.uid, count = problems.len(), "Listed problems");

    Ok(Json(ProblemListResponse {
        problems: problems.into_iter().map(ProblemResponse::from).collect(),
    }))
}

async fn get_problem(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ProblemResponse>> {
    let problem = state.problems.get(&user.uid, &id).await?;
    Ok(Json(problem.into()))
}

// ─── Create ──────────────────────────────────────────────────

/// Add-problem form body.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProblemRequest {
    #[validate(length(max = 300, message = "Title is too long"))]
    #[serde(default)]
    title: String,
    difficulty: Option<Difficulty>,
    status: Option<Status>,
    #[serde(default)]
    tags: Vec<String>,
    /// Either a list or one comma separated string
    #[serde(default, deserialize_with = "list_or_comma_separated")]
    links: Vec<String>,
    #[validate(length(max = 200000, message = "Code is too long"))]
    #[serde(default)]
    code: String,
    #[validate(length(max = 200000, message = "Notes are too long"))]
    #[serde(default)]
    notes: String,
    #[validate(length(max = 200000, message = "Description is too long"))]
    #[serde(default)]
    description: String,
}

fn list_or_comma_separated<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Links {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Links::deserialize(deserializer)? {
        Links::List(list) => list,
        Links::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    })
}

async fn create_problem(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateProblemRequest>,
) -> Result<(StatusCode, Json<ProblemWriteResponse>)> {
    body.validate()?;

    let input = NewProblem {
        title: body.title,
        difficulty: body.difficulty,
        status: body.status,
        tags: body.tags,
        links: body.links,
        code: body.code,
        notes: body.notes,
        description: body.description,
    };

    let created = state.problems.create(&user.uid, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProblemWriteResponse {
            message: MSG_ADDED.to_string(),
            problem: created.into(),
            redirect: Some(RedirectHint::new(
                client_routes::PROBLEMS,
                state.config.redirect_delay_ms,
            )),
        }),
    ))
}

// ─── Inline Edit ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PatchFieldRequest {
    #[serde(default)]
    value: serde_json::Value,
}

/// Write one field, answering with the freshly read record.
async fn patch_field(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, field)): Path<(String, String)>,
    Json(body): Json<PatchFieldRequest>,
) -> Result<Json<ProblemWriteResponse>> {
    let field: ProblemField = field.parse().map_err(AppError::BadRequest)?;
    let patch = ProblemPatch::from_value(field, body.value).map_err(AppError::BadRequest)?;
    let label = patch.label();

    let problem = state.problems.patch_field(&user.uid, &id, patch).await?;

    Ok(Json(ProblemWriteResponse {
        message: format!("{} updated successfully", label),
        problem: problem.into(),
        redirect: None,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AppendLinkRequest {
    #[validate(length(max = 2048, message = "Link is too long"))]
    #[serde(default)]
    link: String,
}

async fn append_link(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<AppendLinkRequest>,
) -> Result<Json<ProblemWriteResponse>> {
    body.validate()?;

    let problem = state.problems.append_link(&user.uid, &id, &body.link).await?;

    Ok(Json(ProblemWriteResponse {
        message: "Links updated successfully".to_string(),
        problem: problem.into(),
        redirect: None,
    }))
}

// ─── Delete ──────────────────────────────────────────────────

async fn delete_problem(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.problems.delete(&user.uid, &id).await?;

    Ok(Json(
        MessageResponse::new(MSG_DELETED).with_redirect(RedirectHint::new(
            client_routes::PROBLEMS,
            state.config.redirect_delay_ms,
        )),
    ))
}
