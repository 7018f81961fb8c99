//! JSON REST API for the message board.
//!
//! Exposes an axum [`Router`] backed by any [`board_core::store::MessageStore`].
//! CORS, request tracing, and the listener are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", board_api::api_router(store.clone(), ApiOptions::default()))
//! ```

pub mod envelope;
pub mod error;
pub mod health;
pub mod messages;

use std::{sync::Arc, time::Instant};

use axum::{Router, routing::get};
use board_core::store::MessageStore;

pub use error::ApiError;

/// Knobs that change how the API reports failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiOptions {
  /// Include the underlying store error text in 500 responses.
  pub expose_errors: bool,
}

/// Shared handler state.
pub struct ApiState<S> {
  pub store:         Arc<S>,
  pub started_at:    Instant,
  pub expose_errors: bool,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:         Arc::clone(&self.store),
      started_at:    self.started_at,
      expose_errors: self.expose_errors,
    }
  }
}

impl<S> ApiState<S> {
  /// Map a store failure to a 500 reported under `context`, logging the
  /// underlying error.
  pub fn store_error<E>(&self, context: &'static str) -> impl FnOnce(E) -> ApiError
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let expose = self.expose_errors;
    move |err| {
      tracing::error!(error = %err, "{context}");
      ApiError::Store {
        context,
        detail: expose.then(|| err.to_string()),
      }
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, options: ApiOptions) -> Router<()>
where
  S: MessageStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let state = ApiState {
    store,
    started_at: Instant::now(),
    expose_errors: options.expose_errors,
  };

  Router::new()
    .route(
      "/messages",
      get(messages::list::<S>).post(messages::create::<S>),
    )
    .route(
      "/messages/recent",
      get(messages::recent_default::<S>).fallback(messages::not_a_message),
    )
    .route("/messages/recent/{count}", get(messages::recent::<S>))
    .route(
      "/messages/{id}",
      get(messages::get_one::<S>)
        .put(messages::update::<S>)
        .delete(messages::delete::<S>),
    )
    .route("/health", get(health::handler::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
