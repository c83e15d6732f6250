// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily task routes and the end-of-day countdown stream.

use super::MessageResponse;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::DailyEntry;
use crate::services::countdown::{self, Remaining};
use crate::services::daily::MSG_ADDED;
use crate::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Extension, Json, Router,
};
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/daily", get(get_today).post(add_to_today))
        .route("/api/daily/countdown", get(countdown_stream))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyResponse {
    /// Day key, e.g. `Mon Oct 19 2026`
    pub day: String,
    pub options: Vec<String>,
    pub titles: Vec<String>,
    pub entries: Vec<DailyEntry>,
    pub remaining: Remaining,
}

async fn get_today(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DailyResponse>> {
    let now = chrono::Utc::now();
    let view = state.daily.today(&user.uid, now).await?;
    let local_now = now.with_timezone(&state.daily.offset()).naive_local();

    Ok(Json(DailyResponse {
        day: view.day.to_string(),
        options: view.options,
        titles: view.titles,
        entries: view.entries,
        remaining: countdown::time_until_end_of_day(local_now),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AddToTodayRequest {
    #[serde(default)]
    title: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AddToTodayResponse {
    #[serde(flatten)]
    pub notification: MessageResponse,
    pub titles: Vec<String>,
}

async fn add_to_today(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AddToTodayRequest>,
) -> Result<Json<AddToTodayResponse>> {
    let task = state
        .daily
        .add_to_today(&user.uid, &body.title, chrono::Utc::now())
        .await?;

    Ok(Json(AddToTodayResponse {
        notification: MessageResponse::new(MSG_ADDED),
        titles: task.problems,
    }))
}

/// Server-sent `countdown` events, one per second.
///
/// The timer belongs to the response stream and stops when the client goes away.
async fn countdown_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>> {
    let events = countdown::countdown(state.daily.offset())
        .map(|remaining| Event::default().event("countdown").json_data(remaining));

    Sse::new(events).keep_alive(KeepAlive::default())
}
