//! JSON response envelopes.
//!
//! Every message endpoint answers with `{"success": bool, ...}`; the
//! remaining fields depend on the endpoint.

use board_core::{message::Message, store::Pagination};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `{ success, data, message? }`: single-record responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
  pub success: bool,
  pub data:    T,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl<T> DataEnvelope<T> {
  pub fn ok(data: T) -> Self {
    Self { success: true, data, message: None }
  }

  pub fn with_message(data: T, message: &str) -> Self {
    Self { success: true, data, message: Some(message.to_owned()) }
  }
}

/// `{ success, data, pagination }`: `GET /messages`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEnvelope {
  pub success:    bool,
  pub data:       Vec<Message>,
  pub pagination: Pagination,
}

/// `{ success, data, count }`: `GET /messages/recent/{count}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecentEnvelope {
  pub success: bool,
  pub data:    Vec<Message>,
  pub count:   usize,
}

/// `{ success, message }`: acknowledgements without a payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
  pub success: bool,
  pub message: String,
}

/// `{ success: false, error, details?, message? }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
  pub success: bool,
  pub error:   String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub details: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl ErrorEnvelope {
  pub fn new(error: impl Into<String>) -> Self {
    Self {
      success: false,
      error:   error.into(),
      details: Vec::new(),
      message: None,
    }
  }
}

/// `GET /health` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
  pub status:    String,
  pub message:   String,
  pub timestamp: DateTime<Utc>,
  /// Seconds since the router was built.
  pub uptime:    f64,
}
