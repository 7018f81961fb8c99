//! `GET /health`: liveness check.

use axum::{Json, extract::State};
use chrono::Utc;

use crate::{ApiState, envelope::Health};

pub async fn handler<S>(State(state): State<ApiState<S>>) -> Json<Health> {
  Json(Health {
    status:    "OK".to_owned(),
    message:   "Server is running successfully".to_owned(),
    timestamp: Utc::now(),
    uptime:    state.started_at.elapsed().as_secs_f64(),
  })
}
