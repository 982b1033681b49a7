//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`   - Short code redirect
//! - `/api/*`         - Link management, health and debug endpoints
//!
//! Every request passes through the tracing layer.

use crate::api;
use crate::api::handlers::redirect_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}
