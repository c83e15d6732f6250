// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use code_zone::config::Config;
use code_zone::db::FirestoreDb;
use code_zone::models::UserProfile;
use code_zone::routes::create_router;
use code_zone::services::identity::MockIdentity;
use code_zone::services::storage::StoredObject;
use code_zone::services::{
    DailyService, ExecutorClient, FirebaseTokenVerifier, IdentityService, ProblemService,
    ProfileService, StorageService,
};
use code_zone::AppState;
use dashmap::DashMap;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

#[allow(dead_code)]
pub const TEST_KID: &str = "test-kid";
#[allow(dead_code)]
pub const TEST_SECRET: &[u8] = b"code-zone-test-secret";
/// Nothing listens here; executor calls against it fail to connect.
#[allow(dead_code)]
pub const UNREACHABLE_EXECUTOR: &str = "http://127.0.0.1:9/";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// App wired to in-memory backends, plus handles to inspect them.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub db: FirestoreDb,
    pub identity: Arc<MockIdentity>,
    pub objects: Arc<DashMap<String, StoredObject>>,
}

/// Create a test app with in-memory dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with_executor(UNREACHABLE_EXECUTOR)
}

#[allow(dead_code)]
pub fn create_test_app_with_executor(executor_url: &str) -> TestApp {
    let mut config = Config::test_default();
    config.executor_url = executor_url.to_string();

    let db = FirestoreDb::new_in_memory();
    let (identity, mock_identity) = IdentityService::new_mock();
    let (storage, objects) = StorageService::new_in_memory(&config.storage_bucket);

    let token_verifier = Arc::new(
        FirebaseTokenVerifier::new_with_static_key(
            &config,
            TEST_KID,
            Algorithm::HS256,
            DecodingKey::from_secret(TEST_SECRET),
        )
        .unwrap(),
    );

    let state = Arc::new(AppState {
        problems: ProblemService::new(db.clone()),
        daily: DailyService::new(db.clone(), config.day_offset_minutes),
        profile: ProfileService::new(identity.clone(), storage),
        executor: ExecutorClient::new(&config),
        config,
        token_verifier,
        identity,
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        db,
        identity: mock_identity,
        objects,
    }
}

/// Sign an ID token the test verifier accepts.
#[allow(dead_code)]
pub fn create_test_jwt(uid: &str) -> String {
    #[derive(Serialize)]
    struct Claims<'a> {
        iss: &'a str,
        aud: &'a str,
        sub: &'a str,
        email: String,
        iat: u64,
        exp: u64,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(TEST_KID.to_string());

    encode(
        &header,
        &Claims {
            iss: "https://securetoken.google.com/test-project",
            aud: "test-project",
            sub: uid,
            email: format!("{}@example.com", uid),
            iat: now,
            exp: now + 3600,
        },
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .unwrap()
}

/// Seed an account in the mock auth provider.
#[allow(dead_code)]
pub fn seed_user(identity: &MockIdentity, uid: &str, display_name: Option<&str>) {
    identity.seed(UserProfile {
        uid: uid.to_string(),
        display_name: display_name.map(str::to_string),
        email: Some(format!("{}@example.com", uid)),
        photo_url: None,
        email_verified: true,
    });
}

/// Build a JSON request, optionally authenticated with a bearer token.
#[allow(dead_code)]
pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and decode the JSON response body (Null when empty).
#[allow(dead_code)]
pub async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
