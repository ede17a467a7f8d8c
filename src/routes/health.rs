//! Health check endpoint for container orchestration.
//!
//! Liveness probe only: it answers as long as the process can serve HTTP.

use axum::Json;
use serde::Serialize;

use crate::config::SERVICE_NAME;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub service: &'static str,
}

/// Health check handler.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        ok: true,
        service: SERVICE_NAME,
    })
}
