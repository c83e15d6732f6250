// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Code Zone API Server
//!
//! Stores each user's coding problems and daily task lists in Firestore and
//! fronts the Firebase Auth, Firebase Storage and remote compiler APIs.

use code_zone::{
    config::Config,
    db::FirestoreDb,
    services::{
        DailyService, ExecutorClient, FirebaseTokenVerifier, IdentityService, ProblemService,
        ProfileService, StorageService,
    },
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Code Zone API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.firebase_project_id).await?;

    let token_verifier = Arc::new(FirebaseTokenVerifier::new(&config)?);

    // Point Identity Toolkit at the Auth emulator when one is configured
    let identity = match std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
        Ok(host) => {
            tracing::info!(host = %host, "Using Firebase Auth emulator");
            IdentityService::with_base_url(
                config.firebase_api_key.clone(),
                format!("http://{}/identitytoolkit.googleapis.com/v1", host),
            )
        }
        Err(_) => IdentityService::new(config.firebase_api_key.clone()),
    };

    let storage = StorageService::new(&config.storage_bucket);
    tracing::info!(bucket = %config.storage_bucket, "Storage service initialized");

    let executor = ExecutorClient::new(&config);

    // Build shared state
    let state = Arc::new(AppState {
        problems: ProblemService::new(db.clone()),
        daily: DailyService::new(db, config.day_offset_minutes),
        profile: ProfileService::new(identity.clone(), storage),
        config: config.clone(),
        token_verifier,
        identity,
        executor,
    });

    // Build router
    let app = code_zone::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("code_zone=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
