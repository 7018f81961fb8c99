//! Handlers for `/messages` endpoints.
//!
//! | Method   | Path                       | Notes |
//! |----------|----------------------------|-------|
//! | `GET`    | `/messages`                | `?page=&limit=&author=` |
//! | `GET`    | `/messages/recent[/{n}]`   | newest `n` (default 5, max 100) |
//! | `GET`    | `/messages/{id}`           | 404 if missing or deleted |
//! | `POST`   | `/messages`                | body: `{"text","author","replyTo?",...}` |
//! | `PUT`    | `/messages/{id}`           | body: `{"text?","author?"}` |
//! | `DELETE` | `/messages/{id}`           | soft delete |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use board_core::{
  Error,
  message::{Message, MessageDraft, MessagePatch, parse_id},
  store::{
    DEFAULT_PAGE_SIZE, DEFAULT_RECENT_COUNT, MAX_PAGE_SIZE, MessageQuery,
    MessageStore,
  },
};
use serde::Deserialize;

use crate::{
  ApiState,
  envelope::{Ack, DataEnvelope, ListEnvelope, RecentEnvelope},
  error::ApiError,
};

/// Headline used when a create payload is missing a required field.
const MISSING_FIELDS: &str = "Both text and author are required";

/// Parse a positive count, falling back to `default` for anything missing,
/// malformed, or zero, and clamping to `max`.
fn parse_count(raw: Option<&str>, default: u32, max: u32) -> u32 {
  raw
    .and_then(|s| s.trim().parse::<u32>().ok())
    .filter(|n| *n > 0)
    .map_or(default, |n| n.min(max))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// Raw query string values. Kept as strings so that junk falls back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub page:   Option<String>,
  pub limit:  Option<String>,
  pub author: Option<String>,
}

impl ListParams {
  pub fn into_query(self) -> MessageQuery {
    MessageQuery {
      page:   parse_count(self.page.as_deref(), 1, u32::MAX),
      limit:  parse_count(self.limit.as_deref(), DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
      author: self
        .author
        .map(|a| a.trim().to_owned())
        .filter(|a| !a.is_empty()),
    }
  }
}

/// `GET /messages[?page=&limit=&author=]`
///
/// A query string that does not deserialise at all (e.g. a repeated key) is
/// treated like an empty one.
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ListEnvelope>, ApiError>
where
  S: MessageStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let params = params.map(|Query(p)| p).unwrap_or_else(|rejection| {
    tracing::debug!(error = %rejection.body_text(), "ignoring unparseable query");
    ListParams::default()
  });
  let query = params.into_query();
  let page = state
    .store
    .list(&query)
    .await
    .map_err(state.store_error("Failed to fetch messages"))?;

  Ok(Json(ListEnvelope {
    success:    true,
    data:       page.items,
    pagination: page.pagination,
  }))
}

// ─── Recent ───────────────────────────────────────────────────────────────────

async fn recent_inner<S>(
  state: &ApiState<S>,
  raw: Option<&str>,
) -> Result<Json<RecentEnvelope>, ApiError>
where
  S: MessageStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let count = parse_count(raw, DEFAULT_RECENT_COUNT, MAX_PAGE_SIZE);
  let data = state
    .store
    .recent(count)
    .await
    .map_err(state.store_error("Failed to fetch recent messages"))?;

  Ok(Json(RecentEnvelope {
    success: true,
    count: data.len(),
    data,
  }))
}

/// `GET /messages/recent/{count}`
pub async fn recent<S>(
  State(state): State<ApiState<S>>,
  Path(count): Path<String>,
) -> Result<Json<RecentEnvelope>, ApiError>
where
  S: MessageStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  recent_inner(&state, Some(&count)).await
}

/// `GET /messages/recent`
pub async fn recent_default<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<RecentEnvelope>, ApiError>
where
  S: MessageStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  recent_inner(&state, None).await
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /messages/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<DataEnvelope<Message>>, ApiError>
where
  S: MessageStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = parse_id(&id)?;
  let message = state
    .store
    .get(id)
    .await
    .map_err(state.store_error("Failed to fetch message"))?
    .ok_or_else(ApiError::not_found)?;
  Ok(Json(DataEnvelope::ok(message)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /messages`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<MessageDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MessageStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(draft) = body?;
  let input = draft.validate().map_err(|e| match e {
    Error::Validation(v) if v.has_missing_field() => {
      ApiError::validation(MISSING_FIELDS, &v)
    }
    other => other.into(),
  })?;

  let message = state
    .store
    .create(input)
    .await
    .map_err(state.store_error("Failed to create message"))?;
  tracing::info!(id = %message.id, reply = message.is_reply(), "message created");

  Ok((
    StatusCode::CREATED,
    Json(DataEnvelope::with_message(message, "Message created successfully")),
  ))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /messages/{id}`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  body: Result<Json<MessagePatch>, JsonRejection>,
) -> Result<Json<DataEnvelope<Message>>, ApiError>
where
  S: MessageStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = parse_id(&id)?;
  let Json(patch) = body?;

  // Absence wins over a bad body.
  state
    .store
    .get(id)
    .await
    .map_err(state.store_error("Failed to update message"))?
    .ok_or_else(ApiError::not_found)?;
  let patch = patch.validate()?;

  let message = state
    .store
    .update(id, patch)
    .await
    .map_err(state.store_error("Failed to update message"))?
    .ok_or_else(ApiError::not_found)?;
  tracing::info!(id = %message.id, "message updated");

  Ok(Json(DataEnvelope::with_message(
    message,
    "Message updated successfully",
  )))
}

// ─── Fallback ─────────────────────────────────────────────────────────────────

/// Any non-`GET` method on `/messages/recent`. That path would otherwise be
/// an id, and `recent` is never a valid one.
pub async fn not_a_message() -> ApiError { ApiError::not_found() }

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /messages/{id}`: marks the message inactive; replies are left
/// untouched.
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError>
where
  S: MessageStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = parse_id(&id)?;
  state
    .store
    .soft_delete(id)
    .await
    .map_err(state.store_error("Failed to delete message"))?
    .ok_or_else(ApiError::not_found)?;
  tracing::info!(%id, "message deleted");

  Ok(Json(Ack {
    success: true,
    message: "Message deleted successfully".to_owned(),
  }))
}
