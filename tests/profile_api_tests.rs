// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile, email verification and password reset routes.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use code_zone::error::AuthProviderError;
use code_zone::services::identity::OobRequestType;
use serde_json::json;

mod common;
use common::{create_test_app, create_test_jwt, json_request, seed_user, send};

const BOUNDARY: &str = "code-zone-boundary";

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

fn multipart_request(token: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, content_type, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"me.jpg\"\r\nContent-Type: {}\r\n\r\n",
                        name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::PUT)
        .uri("/api/profile")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_me_greets_by_name_or_email() {
    let app = create_test_app();
    seed_user(&app.identity, "alice", Some("Alice"));
    seed_user(&app.identity, "bob", None);

    let (status, body) = send(
        &app.router,
        json_request(Method::GET, "/api/me", Some(&create_test_jwt("alice")), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["greeting"], "Alice");
    assert_eq!(body["navigation"][0]["to"], "/problems");
    assert!(body.get("next").is_none());

    let (_, body) = send(
        &app.router,
        json_request(Method::GET, "/api/me", Some(&create_test_jwt("bob")), None),
    )
    .await;
    assert_eq!(body["greeting"], "bob@example.com");
}

#[tokio::test]
async fn test_update_name_only() {
    let app = create_test_app();
    seed_user(&app.identity, "alice", Some("Alice"));
    let token = create_test_jwt("alice");

    let (status, body) = send(
        &app.router,
        multipart_request(&token, &[Part::Text("name", "Ada")]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["profile"]["display_name"], "Ada");
    assert_eq!(body["redirect"]["to"], "/");
    assert!(app.objects.is_empty());
}

#[tokio::test]
async fn test_update_image_uploads_and_reports_progress() {
    let app = create_test_app();
    seed_user(&app.identity, "alice", Some("Alice"));
    let token = create_test_jwt("alice");

    let (status, _) = send(
        &app.router,
        json_request(Method::GET, "/api/profile/upload-progress", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let image = vec![0xffu8; 300 * 1024];
    let (status, body) = send(
        &app.router,
        multipart_request(&token, &[Part::File("image", "image/jpeg", &image)]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Name is kept when only an image is sent
    assert_eq!(body["profile"]["display_name"], "Alice");

    let stored = app.objects.get("users/alice/profile.jpg").unwrap();
    assert_eq!(stored.bytes.len(), image.len());
    assert_eq!(stored.content_type, "image/jpeg");

    let photo_url = body["profile"]["photo_url"].as_str().unwrap();
    assert!(photo_url.contains("users%2Falice%2Fprofile.jpg"));
    assert!(photo_url.contains(&format!("token={}", stored.download_token)));

    let (status, progress) = send(
        &app.router,
        json_request(Method::GET, "/api/profile/upload-progress", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["total_bytes"], image.len());
    assert_eq!(progress["bytes_transferred"], image.len());
    assert_eq!(progress["percent"], 100.0);
}

#[tokio::test]
async fn test_non_image_upload_rejected() {
    let app = create_test_app();
    seed_user(&app.identity, "alice", Some("Alice"));
    let token = create_test_jwt("alice");

    let (status, _) = send(
        &app.router,
        multipart_request(&token, &[Part::File("image", "text/plain", b"hello")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.objects.is_empty());
}

#[tokio::test]
async fn test_nothing_to_update() {
    let app = create_test_app();
    seed_user(&app.identity, "alice", Some("Alice"));
    let token = create_test_jwt("alice");

    let (status, body) = send(
        &app.router,
        multipart_request(&token, &[Part::Text("name", "  ")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Please enter a name or upload an image");
}

#[tokio::test]
async fn test_verify_email_sends_mail() {
    let app = create_test_app();
    seed_user(&app.identity, "alice", Some("Alice"));

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/verify-email",
            Some(&create_test_jwt("alice")),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Email sent successfully");

    let sent = app.identity.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].request_type, OobRequestType::VerifyEmail);
}

#[tokio::test]
async fn test_verify_email_session_expired() {
    let app = create_test_app();
    seed_user(&app.identity, "alice", Some("Alice"));
    app.identity.fail_next(AuthProviderError::new(
        AuthProviderError::SESSION_EXPIRED,
        "CREDENTIAL_TOO_OLD_LOGIN_AGAIN",
    ));

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/verify-email",
            Some(&create_test_jwt("alice")),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["details"], "Session expired. Please login again");
    assert!(app.identity.sent_emails().is_empty());
}

#[tokio::test]
async fn test_password_reset() {
    let app = create_test_app();

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/auth/password-reset",
            None,
            Some(json!({ "email": "ada@example.com" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Mail sent successfully");
    assert_eq!(body["redirect"]["to"], "/login");
    assert_eq!(body["redirect"]["after_ms"], 2000);

    let sent = app.identity.sent_emails();
    assert_eq!(sent[0].request_type, OobRequestType::PasswordReset);
    assert_eq!(sent[0].recipient, "ada@example.com");
}

#[tokio::test]
async fn test_password_reset_throttled() {
    let app = create_test_app();
    app.identity.fail_next(AuthProviderError::new(
        AuthProviderError::TOO_MANY_REQUESTS,
        "TOO_MANY_ATTEMPTS_TRY_LATER",
    ));

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/auth/password-reset",
            None,
            Some(json!({ "email": "ada@example.com" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["details"], "Too many requests. Please try again later");
}

#[tokio::test]
async fn test_password_reset_invalid_email() {
    let app = create_test_app();

    let (status, _) = send(
        &app.router,
        json_request(
            Method::POST,
            "/auth/password-reset",
            None,
            Some(json!({ "email": "not-an-email" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.identity.sent_emails().is_empty());
}
