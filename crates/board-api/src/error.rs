//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use board_core::error::ValidationError;
use thiserror::Error;

use crate::envelope::ErrorEnvelope;

pub const MESSAGE_NOT_FOUND: &str = "Message not found";

/// Message shown in place of a store failure's detail in production mode.
const GENERIC_FAILURE: &str = "Something went wrong!";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(&'static str),

  /// Field rules broken by a create or update payload.
  #[error("validation failed: {error}")]
  Validation {
    error:   String,
    details: Vec<String>,
  },

  /// A body that could not be parsed at all.
  #[error("bad request: {error}")]
  BadRequest {
    error:   String,
    details: Vec<String>,
  },

  /// The store failed. `detail` is only populated when the server is
  /// allowed to expose internals.
  #[error("{context}")]
  Store {
    context: &'static str,
    detail:  Option<String>,
  },
}

impl ApiError {
  pub fn not_found() -> Self { Self::NotFound(MESSAGE_NOT_FOUND) }

  /// A validation failure reported under `headline`, one detail per
  /// violation.
  pub fn validation(headline: &str, err: &ValidationError) -> Self {
    Self::Validation {
      error:   headline.to_owned(),
      details: err.violations().iter().map(ToString::to_string).collect(),
    }
  }
}

impl From<board_core::Error> for ApiError {
  fn from(err: board_core::Error) -> Self {
    match err {
      board_core::Error::Validation(v) => Self::validation("Validation failed", &v),
      // A malformed id cannot name an existing message.
      board_core::Error::InvalidId(_) => Self::not_found(),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest {
      error:   "Invalid request body".to_owned(),
      details: vec![rejection.body_text()],
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, ErrorEnvelope::new(m)),
      ApiError::Validation { error, details }
      | ApiError::BadRequest { error, details } => (
        StatusCode::BAD_REQUEST,
        ErrorEnvelope { details, ..ErrorEnvelope::new(error) },
      ),
      ApiError::Store { context, detail } => (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorEnvelope {
          message: Some(detail.unwrap_or_else(|| GENERIC_FAILURE.to_owned())),
          ..ErrorEnvelope::new(context)
        },
      ),
    };
    (status, Json(body)).into_response()
  }
}
