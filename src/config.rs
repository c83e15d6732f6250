// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Firebase and RapidAPI credentials are read once at startup and kept in
//! memory for the lifetime of the process.

use std::env;

/// Default RapidAPI online-code-compiler endpoint.
pub const DEFAULT_EXECUTOR_URL: &str = "https://online-code-compiler.p.rapidapi.com/v1/";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Firebase / GCP project ID (also the expected ID token audience)
    pub firebase_project_id: String,
    /// Firebase Storage bucket holding profile images
    pub storage_bucket: String,
    /// Frontend URL (CORS origin)
    pub frontend_url: String,
    /// Code executor endpoint
    pub executor_url: String,
    /// Server port
    pub port: u16,
    /// UTC offset (minutes) used to decide which calendar day "today" is
    pub day_offset_minutes: i32,
    /// Delay the client should wait before following a redirect hint
    pub redirect_delay_ms: u64,

    // --- Secrets ---
    /// Firebase Web API key (Identity Toolkit)
    pub firebase_api_key: String,
    /// RapidAPI key for the code executor
    pub rapid_api_key: String,
    /// RapidAPI host header for the code executor
    pub rapid_api_host: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let firebase_project_id = env::var("FIREBASE_PROJECT_ID")
            .map_err(|_| ConfigError::Missing("FIREBASE_PROJECT_ID"))?;

        let storage_bucket = env::var("FIREBASE_STORAGE_BUCKET")
            .unwrap_or_else(|_| format!("{}.appspot.com", firebase_project_id));

        Ok(Self {
            storage_bucket,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            executor_url: env::var("EXECUTOR_URL")
                .unwrap_or_else(|_| DEFAULT_EXECUTOR_URL.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            day_offset_minutes: parse_day_offset(env::var("DAY_OFFSET_MINUTES").ok())?,
            redirect_delay_ms: env::var("REDIRECT_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),

            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            rapid_api_key: env::var("RAPID_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("RAPID_API_KEY"))?,
            rapid_api_host: env::var("RAPID_API_HOST")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("RAPID_API_HOST"))?,
            firebase_project_id,
        })
    }

    /// Deterministic config for tests only.
    pub fn test_default() -> Self {
        Self {
            firebase_project_id: "test-project".to_string(),
            storage_bucket: "test-project.appspot.com".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            executor_url: DEFAULT_EXECUTOR_URL.to_string(),
            port: 8080,
            day_offset_minutes: 0,
            redirect_delay_ms: 1000,
            firebase_api_key: "test_api_key".to_string(),
            rapid_api_key: "test_rapid_key".to_string(),
            rapid_api_host: "online-code-compiler.p.rapidapi.com".to_string(),
        }
    }
}

/// Parse the day offset, rejecting anything outside a real UTC offset.
fn parse_day_offset(raw: Option<String>) -> Result<i32, ConfigError> {
    let Some(raw) = raw else {
        return Ok(0);
    };

    let minutes: i32 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid("DAY_OFFSET_MINUTES", raw.clone()))?;

    // chrono::FixedOffset accepts strictly less than 24h either way
    if minutes.abs() >= 24 * 60 {
        return Err(ConfigError::Invalid("DAY_OFFSET_MINUTES", raw));
    }

    Ok(minutes)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
