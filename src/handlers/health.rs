use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::{db, AppState};

/// Liveness and database reachability probe.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match db::check_connection(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "database": "unreachable",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
    }
}
