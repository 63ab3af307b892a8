use crate::todo::TodoGateway;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SERVICE_NAME: &str = "todo-api";

/// Body of `GET /health`.
///
/// `database` is `"healthy"` or `"unhealthy: <detail>"`. The endpoint itself
/// always answers 200, even when storage is unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub database: String,
}

#[tracing::instrument(skip(gateway))]
pub async fn health_check_handler(
    State(gateway): State<Arc<dyn TodoGateway>>,
) -> Json<HealthResponse> {
    let database = match gateway.ping().await {
        Ok(()) => "healthy".to_string(),
        Err(err) => {
            tracing::warn!("Database health check failed: {}", err);
            format!("unhealthy: {}", err)
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        database,
    })
}
