use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: i64,
}

// GET /health - Liveness plus a database round trip
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!("Health check failed to reach database: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let response = HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    };

    (code, Json(response))
}
