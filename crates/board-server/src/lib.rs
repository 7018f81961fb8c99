//! HTTP front for the message board.
//!
//! Mounts [`board_api`] under `/api`, adds a service banner at `/`, a JSON
//! 404 fallback, request tracing, and permissive CORS.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::{
  Json, Router,
  extract::OriginalUri,
  http::{Method, StatusCode},
  routing::get,
};
use board_api::ApiOptions;
use board_core::{
  message::MessageDraft,
  store::{MessageQuery, MessageStore},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Deployment mode. Development exposes store error detail in 500 bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
  #[default]
  Development,
  Production,
}

/// Runtime server configuration, deserialised from `board.toml` and
/// `BOARD_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  pub store_path:  PathBuf,
  pub environment: Environment,
  /// Insert the welcome messages into an empty store at startup.
  pub seed:        bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:        "0.0.0.0".to_owned(),
      port:        5000,
      store_path:  PathBuf::from("board.db"),
      environment: Environment::Development,
      seed:        false,
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router for `store`.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: MessageStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let options = ApiOptions {
    expose_errors: config.environment == Environment::Development,
  };

  Router::new()
    .route("/", get(banner))
    .nest("/api", board_api::api_router(store, options))
    .fallback(route_not_found)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}

async fn banner() -> Json<Value> {
  Json(json!({
    "message": "Message Board API",
    "version": env!("CARGO_PKG_VERSION"),
    "endpoints": {
      "health": "/api/health",
      "messages": "/api/messages",
    },
  }))
}

async fn route_not_found(
  method: Method,
  OriginalUri(uri): OriginalUri,
) -> (StatusCode, Json<Value>) {
  (
    StatusCode::NOT_FOUND,
    Json(json!({
      "error": "Route not found",
      "message": format!("Cannot {method} {}", uri.path()),
    })),
  )
}

// ─── Seeding ──────────────────────────────────────────────────────────────────

const WELCOME: [(&str, &str); 3] = [
  (
    "Welcome to the message board! This message was created when the \
     database was first seeded.",
    "System",
  ),
  (
    "This is a sample message. Messages can be posted, edited, replied to, \
     and deleted through the API.",
    "Demo User",
  ),
  (
    "The terminal client reads from the same API. Try posting a message of \
     your own!",
    "Developer",
  ),
];

/// Insert the welcome messages if `store` holds no active messages.
///
/// Returns the number of messages inserted.
pub async fn seed_if_empty<S>(store: &S) -> anyhow::Result<usize>
where
  S: MessageStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let first = MessageQuery { limit: 1, ..MessageQuery::default() };
  let existing = store
    .list(&first)
    .await
    .context("failed to count messages")?
    .pagination
    .total;
  if existing > 0 {
    tracing::debug!(existing, "store already populated; skipping seed");
    return Ok(0);
  }

  for (text, author) in WELCOME {
    let input = MessageDraft::new(text, author).validate()?;
    store
      .create(input)
      .await
      .context("failed to insert seed message")?;
  }
  tracing::info!(count = WELCOME.len(), "seeded welcome messages");
  Ok(WELCOME.len())
}

// ─── Shutdown ─────────────────────────────────────────────────────────────────

/// Resolve on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for ctrl-c");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut s) => {
        s.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to install SIGTERM handler");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }
  tracing::info!("shutdown signal received");
}
