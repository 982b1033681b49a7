//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::HealthResponse;
use crate::state::AppState;

/// Reports service health.
///
/// # Endpoint
///
/// `GET /api/healthz`
///
/// # Response Codes
///
/// - **200 OK**: store reachable
/// - **503 Service Unavailable**: store ping failed
///
/// ```json
/// { "ok": true, "version": "0.1.0" }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let ok = match state.registry.check_store().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            false
        }
    };

    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            ok,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}
