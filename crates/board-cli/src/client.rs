//! Async HTTP client wrapping the board JSON API.

use std::time::Duration;

use anyhow::Context as _;
use board_core::message::{Message, MessageDraft};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the board API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Page size requested when loading the board.
  pub limit:    u32,
}

#[derive(Debug, Error)]
pub enum ClientError {
  /// Connection refused, timeout, or any other transport failure.
  #[error("network error: {0}")]
  Network(#[source] reqwest::Error),

  /// The server answered with a non-success status.
  #[error("{message} ({status})")]
  Server { status: StatusCode, message: String },

  #[error("unexpected response body: {0}")]
  Decode(#[source] reqwest::Error),
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// `{ "error": ... }` part of a failure envelope.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

#[derive(Deserialize)]
struct DataBody<T> {
  data: T,
}

/// Async HTTP client for the board JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
    let client = Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str { &self.config.base_url }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Turn a non-success response into [`ClientError::Server`], preferring the
  /// server's own `error` text.
  async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = match resp.json::<ErrorBody>().await {
      Ok(body) => body.error,
      Err(_) => status.to_string(),
    };
    Err(ClientError::Server { status, message })
  }

  // ── Messages ──────────────────────────────────────────────────────────────

  /// `GET /api/messages?limit=<n>`
  ///
  /// A body whose `data` is not a message array yields an empty list.
  pub async fn list_messages(&self) -> Result<Vec<Message>> {
    let resp = self
      .client
      .get(self.url("/messages"))
      .query(&[("limit", self.config.limit)])
      .send()
      .await
      .map_err(ClientError::Network)?;
    let body: Value = Self::check(resp)
      .await?
      .json()
      .await
      .map_err(ClientError::Decode)?;

    let data = body.get("data").cloned().unwrap_or(Value::Null);
    match serde_json::from_value::<Vec<Message>>(data) {
      Ok(messages) => Ok(messages),
      Err(e) => {
        tracing::warn!(error = %e, "message list had unexpected shape; showing none");
        Ok(Vec::new())
      }
    }
  }

  /// `POST /api/messages`
  pub async fn create_message(&self, draft: &MessageDraft) -> Result<Message> {
    let resp = self
      .client
      .post(self.url("/messages"))
      .json(draft)
      .send()
      .await
      .map_err(ClientError::Network)?;
    let body: DataBody<Message> = Self::check(resp)
      .await?
      .json()
      .await
      .map_err(ClientError::Decode)?;
    Ok(body.data)
  }

  /// `DELETE /api/messages/<id>`
  pub async fn delete_message(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/messages/{id}")))
      .send()
      .await
      .map_err(ClientError::Network)?;
    Self::check(resp).await?;
    Ok(())
  }
}
