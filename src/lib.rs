// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Code Zone: a personal coding-problem tracker.
//!
//! This crate provides the backend API for recording programming problems,
//! keeping a daily task list, running code snippets through a remote
//! compiler and editing the user's profile.

pub mod config;
pub mod db;
pub mod error;
pub mod markdown;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{
    DailyService, ExecutorClient, FirebaseTokenVerifier, IdentityService, ProblemService,
    ProfileService,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub token_verifier: Arc<FirebaseTokenVerifier>,
    pub identity: IdentityService,
    pub problems: ProblemService,
    pub daily: DailyService,
    pub executor: ExecutorClient,
    pub profile: ProfileService,
}
