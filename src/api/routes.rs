//! API route configuration.

use crate::api::handlers::{
    create_link_handler, debug_handler, delete_link_handler, get_link_handler, health_handler,
    list_links_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All routes mounted under `/api`.
///
/// # Endpoints
///
/// - `GET    /links`          - List links, newest first
/// - `POST   /links`          - Create a link
/// - `GET    /links/{code}`   - Show a link with its statistics
/// - `DELETE /links/{code}`   - Delete a link
/// - `GET    /healthz`        - Health check
/// - `GET    /debug`          - Compact dump of all links
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{code}",
            get(get_link_handler).delete(delete_link_handler),
        )
        .route("/healthz", get(health_handler))
        .route("/debug", get(debug_handler))
}
