//! Router tests driven through `tower::ServiceExt::oneshot` against an
//! in-memory store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use board_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiOptions, api_router};

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(store), ApiOptions::default())
}

async fn send(
  app: &Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut req = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      req = req.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

async fn post_message(app: &Router, text: &str, author: &str) -> Value {
  let (status, body) = send(
    app,
    "POST",
    "/messages",
    Some(json!({ "text": text, "author": author })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  body["data"].clone()
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_returns_201_with_envelope() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/messages",
    Some(json!({ "text": "  Hello world  ", "author": "Alice" })),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["success"], true);
  assert_eq!(body["message"], "Message created successfully");
  let data = &body["data"];
  assert_eq!(data["text"], "Hello world");
  assert_eq!(data["author"], "Alice");
  assert_eq!(data["isActive"], true);
  assert!(data["id"].is_string());
  assert!(data["timestamp"].is_string());
  assert!(data.get("replyTo").is_none());
}

#[tokio::test]
async fn create_with_missing_author_is_rejected() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/messages",
    Some(json!({ "text": "Hello" })),
  )
  .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["success"], false);
  assert_eq!(body["error"], "Both text and author are required");
  assert_eq!(body["details"], json!(["Author name is required"]));

  let (_, list) = send(&app, "GET", "/messages", None).await;
  assert_eq!(list["pagination"]["total"], 0);
}

#[tokio::test]
async fn create_with_overlong_text_lists_the_rule() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/messages",
    Some(json!({ "text": "x".repeat(501), "author": "Alice" })),
  )
  .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Validation failed");
  assert_eq!(
    body["details"],
    json!(["Message cannot exceed 500 characters"])
  );
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
  let app = app().await;
  let req = Request::builder()
    .method("POST")
    .uri("/messages")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn reply_carries_parent_snapshot() {
  let app = app().await;
  let parent = post_message(&app, "original thought", "Alice").await;

  let (status, body) = send(
    &app,
    "POST",
    "/messages",
    Some(json!({
      "text": "a reply",
      "author": "Bob",
      "replyTo": parent["id"],
      "replyToAuthor": "Alice",
      "replyToText": "original thought",
    })),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["data"]["replyTo"], parent["id"]);
  assert_eq!(body["data"]["replyToAuthor"], "Alice");
  assert_eq!(body["data"]["replyToText"], "original thought");
}

// ─── Read ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_one_and_not_found() {
  let app = app().await;
  let created = post_message(&app, "findable", "Alice").await;
  let id = created["id"].as_str().unwrap();

  let (status, body) = send(&app, "GET", &format!("/messages/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], true);
  assert_eq!(body["data"], created);

  let missing = uuid::Uuid::new_v4();
  let (status, body) =
    send(&app, "GET", &format!("/messages/{missing}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body, json!({ "success": false, "error": "Message not found" }));

  let (status, _) = send(&app, "GET", "/messages/not-an-id", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_paginates_and_filters() {
  let app = app().await;
  for i in 0..3 {
    post_message(&app, &format!("alice {i}"), "Alice").await;
  }
  post_message(&app, "bob", "Bob").await;

  let (status, body) =
    send(&app, "GET", "/messages?page=2&limit=3", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], true);
  assert_eq!(body["data"].as_array().unwrap().len(), 1);
  assert_eq!(
    body["pagination"],
    json!({ "current": 2, "limit": 3, "total": 4, "pages": 2 })
  );

  let (_, body) = send(&app, "GET", "/messages?author=ALI", None).await;
  assert_eq!(body["pagination"]["total"], 3);
  assert!(
    body["data"]
      .as_array()
      .unwrap()
      .iter()
      .all(|m| m["author"] == "Alice")
  );
}

#[tokio::test]
async fn list_tolerates_junk_query_values() {
  let app = app().await;
  post_message(&app, "one", "Alice").await;

  let (status, body) =
    send(&app, "GET", "/messages?page=abc&limit=-4", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["pagination"]["current"], 1);
  assert_eq!(body["pagination"]["limit"], 10);

  let (_, body) = send(&app, "GET", "/messages?limit=5000", None).await;
  assert_eq!(body["pagination"]["limit"], 100);
}

#[tokio::test]
async fn list_ignores_an_unparseable_query() {
  let app = app().await;
  post_message(&app, "one", "Alice").await;

  let (status, body) =
    send(&app, "GET", "/messages?page=1&page=2&limit=3", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], true);
  assert_eq!(body["pagination"]["current"], 1);
  assert_eq!(body["pagination"]["limit"], 10);
  assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn writes_to_the_recent_path_are_not_found() {
  let app = app().await;
  for method in ["PUT", "DELETE"] {
    let (status, body) = send(
      &app,
      method,
      "/messages/recent",
      (method == "PUT").then(|| json!({ "text": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
    assert_eq!(body["error"], "Message not found", "{method}");
    assert_eq!(body["success"], false, "{method}");
  }
}

#[tokio::test]
async fn recent_defaults_and_counts() {
  let app = app().await;
  for i in 0..7 {
    post_message(&app, &format!("m{i}"), "Alice").await;
  }

  let (status, body) = send(&app, "GET", "/messages/recent/3", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 3);
  assert_eq!(body["data"][0]["text"], "m6");

  let (_, body) = send(&app, "GET", "/messages/recent", None).await;
  assert_eq!(body["count"], 5);

  let (_, body) = send(&app, "GET", "/messages/recent/nope", None).await;
  assert_eq!(body["count"], 5);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_changes_supplied_fields_only() {
  let app = app().await;
  let created = post_message(&app, "Original message", "Original Author").await;
  let id = created["id"].as_str().unwrap();

  let (status, body) = send(
    &app,
    "PUT",
    &format!("/messages/{id}"),
    Some(json!({ "text": "Updated message" })),
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Message updated successfully");
  assert_eq!(body["data"]["text"], "Updated message");
  assert_eq!(body["data"]["author"], "Original Author");
  assert_eq!(body["data"]["timestamp"], created["timestamp"]);
}

#[tokio::test]
async fn update_rejects_overlong_author_and_unknown_id() {
  let app = app().await;
  let created = post_message(&app, "hi", "Alice").await;
  let id = created["id"].as_str().unwrap();

  let (status, body) = send(
    &app,
    "PUT",
    &format!("/messages/{id}"),
    Some(json!({ "author": "a".repeat(101) })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(
    body["details"],
    json!(["Author name cannot exceed 100 characters"])
  );

  let missing = uuid::Uuid::new_v4();
  let (status, _) = send(
    &app,
    "PUT",
    &format!("/messages/{missing}"),
    Some(json!({ "text": "x" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_on_unknown_id_is_not_found_even_with_bad_body() {
  let app = app().await;
  let missing = uuid::Uuid::new_v4();
  let (status, body) = send(
    &app,
    "PUT",
    &format!("/messages/{missing}"),
    Some(json!({ "author": "a".repeat(101) })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body, json!({ "success": false, "error": "Message not found" }));
}

#[tokio::test]
async fn update_on_deleted_message_is_not_found() {
  let app = app().await;
  let created = post_message(&app, "short lived", "Alice").await;
  let path = format!("/messages/{}", created["id"].as_str().unwrap());
  send(&app, "DELETE", &path, None).await;

  let (status, _) =
    send(&app, "PUT", &path, Some(json!({ "text": "x".repeat(501) }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_is_soft_and_not_repeatable() {
  let app = app().await;
  let created = post_message(&app, "to delete", "Alice").await;
  let id = created["id"].as_str().unwrap();
  let path = format!("/messages/{id}");

  let (status, body) = send(&app, "DELETE", &path, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!({ "success": true, "message": "Message deleted successfully" })
  );

  let (status, _) = send(&app, "GET", &path, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(&app, "DELETE", &path, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (_, list) = send(&app, "GET", "/messages", None).await;
  assert_eq!(list["pagination"]["total"], 0);
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/health", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "OK");
  assert_eq!(body["message"], "Server is running successfully");
  assert!(body["uptime"].as_f64().unwrap() >= 0.0);
  assert!(body["timestamp"].is_string());
}
