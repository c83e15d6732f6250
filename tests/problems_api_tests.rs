// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Problem routes over in-memory storage: add form, inline edits, delete.

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::{create_test_app, create_test_jwt, json_request, send};

fn two_sum() -> serde_json::Value {
    json!({
        "title": "Two Sum",
        "difficulty": "Easy",
        "status": "Unsolved",
        "tags": ["Array", "Hash Table"],
        "description": "desc"
    })
}

#[tokio::test]
async fn test_create_requires_description_or_links() {
    let app = create_test_app();
    let token = create_test_jwt("alice");

    let mut body = two_sum();
    body["description"] = json!("<!-- Describe the problem -->");
    body["links"] = json!("");

    let (status, resp) = send(
        &app.router,
        json_request(Method::POST, "/api/problems", Some(&token), Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp["details"],
        "Please provide either description or links"
    );
    assert_eq!(app.db.memory_document_count(), Some(0));
}

#[tokio::test]
async fn test_duplicate_title_rejected() {
    let app = create_test_app();
    let token = create_test_jwt("alice");

    let (status, resp) = send(
        &app.router,
        json_request(Method::POST, "/api/problems", Some(&token), Some(two_sum())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["message"], "Problem added successfully");
    assert_eq!(resp["redirect"]["to"], "/problems");
    assert_eq!(resp["redirect"]["after_ms"], 1000);

    let (status, resp) = send(
        &app.router,
        json_request(Method::POST, "/api/problems", Some(&token), Some(two_sum())),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(resp["details"], "Problem with same title already exists");
    assert_eq!(app.db.memory_document_count(), Some(1));
}

#[tokio::test]
async fn test_comments_stripped_on_create() {
    let app = create_test_app();
    let token = create_test_jwt("alice");

    let mut body = two_sum();
    body["description"] = json!("<!-- hint -->Given nums\n<!--\nmore\nhints\n-->return indices");
    body["notes"] = json!("<!-- your notes -->use a map");

    let (status, resp) = send(
        &app.router,
        json_request(Method::POST, "/api/problems", Some(&token), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = resp["problem"]["id"].as_str().unwrap();
    let (_, problem) = send(
        &app.router,
        json_request(Method::GET, &format!("/api/problems/{}", id), Some(&token), None),
    )
    .await;
    assert_eq!(problem["description"], "Given nums\nreturn indices");
    assert_eq!(problem["notes"], "use a map");
}

#[tokio::test]
async fn test_problems_are_scoped_to_user() {
    let app = create_test_app();
    let alice = create_test_jwt("alice");
    let bob = create_test_jwt("bob");

    let (_, resp) = send(
        &app.router,
        json_request(Method::POST, "/api/problems", Some(&alice), Some(two_sum())),
    )
    .await;
    let id = resp["problem"]["id"].as_str().unwrap().to_string();

    let (status, resp) = send(
        &app.router,
        json_request(Method::GET, &format!("/api/problems/{}", id), Some(&bob), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["details"], "Problem not found");

    let (_, list) = send(
        &app.router,
        json_request(Method::GET, "/api/problems", Some(&bob), None),
    )
    .await;
    assert_eq!(list["problems"], json!([]));
}

#[tokio::test]
async fn test_two_sum_status_edit_end_to_end() {
    let app = create_test_app();
    let token = create_test_jwt("alice");

    let (status, created) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/problems",
            Some(&token),
            Some(json!({
                "title": "Two Sum",
                "difficulty": "Easy",
                "status": "Unsolved",
                "description": "desc"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["problem"]["id"].as_str().unwrap().to_string();

    let (_, list) = send(
        &app.router,
        json_request(Method::GET, "/api/problems", Some(&token), None),
    )
    .await;
    let titles: Vec<&str> = list["problems"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Two Sum"]);

    let (_, before) = send(
        &app.router,
        json_request(Method::GET, &format!("/api/problems/{}", id), Some(&token), None),
    )
    .await;
    assert_eq!(before["status_treatment"], "error");

    let (status, resp) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/api/problems/{}/status", id),
            Some(&token),
            Some(json!({ "value": "Solved" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Status updated successfully");

    let (_, after) = send(
        &app.router,
        json_request(Method::GET, &format!("/api/problems/{}", id), Some(&token), None),
    )
    .await;
    assert_eq!(after["status"], "Solved");
    assert_eq!(after["status_treatment"], "success");

    // Nothing but the status (and its treatment) changed
    let mut expected = before.clone();
    expected["status"] = json!("Solved");
    expected["status_treatment"] = json!("success");
    assert_eq!(after, expected);
    assert_eq!(resp["problem"], after);
}

#[tokio::test]
async fn test_patch_rejects_bad_field_and_value() {
    let app = create_test_app();
    let token = create_test_jwt("alice");

    let (_, created) = send(
        &app.router,
        json_request(Method::POST, "/api/problems", Some(&token), Some(two_sum())),
    )
    .await;
    let id = created["problem"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/api/problems/{}/tags", id),
            Some(&token),
            Some(json!({ "value": "Array" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/api/problems/{}/difficulty", id),
            Some(&token),
            Some(json!({ "value": "Impossible" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        json_request(
            Method::PUT,
            "/api/problems/missing/notes",
            Some(&token),
            Some(json!({ "value": "x" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_append_link() {
    let app = create_test_app();
    let token = create_test_jwt("alice");

    let (_, created) = send(
        &app.router,
        json_request(Method::POST, "/api/problems", Some(&token), Some(two_sum())),
    )
    .await;
    let id = created["problem"]["id"].as_str().unwrap().to_string();

    let (status, resp) = send(
        &app.router,
        json_request(
            Method::POST,
            &format!("/api/problems/{}/links", id),
            Some(&token),
            Some(json!({ "link": "https://leetcode.com/problems/two-sum/" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Links updated successfully");
    assert_eq!(
        resp["problem"]["links"],
        json!([{ "url": "https://leetcode.com/problems/two-sum/", "source": "leetcode" }])
    );
}

#[tokio::test]
async fn test_delete_then_fetch_is_absent() {
    let app = create_test_app();
    let token = create_test_jwt("alice");

    let (_, created) = send(
        &app.router,
        json_request(Method::POST, "/api/problems", Some(&token), Some(two_sum())),
    )
    .await;
    let id = created["problem"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/problems/{}", id);

    let (status, resp) = send(
        &app.router,
        json_request(Method::DELETE, &uri, Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Problem deleted successfully");
    assert_eq!(resp["redirect"]["to"], "/problems");

    let (status, _) = send(&app.router, json_request(Method::GET, &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
