//! Handlers for link management endpoints (create, list, show, delete).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::links::{
    CreateLinkRequest, DebugLink, DebugResponse, DeleteResponse, LinkResponse,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::normalize_code;

/// Creates a link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "code": "my-link" }
/// ```
///
/// `code` is optional; without it a 7-character code is generated.
///
/// # Errors
///
/// - 400 if the body is not JSON, the URL is invalid, or the code format is invalid
/// - 409 if the code is already taken
/// - 500 if no unique code could be generated or the store failed
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_json(rejection),
    };

    let url = request.url.as_deref().unwrap_or_default();

    match state.registry.create(url, request.custom_code()).await {
        Ok(link) => (StatusCode::CREATED, Json(LinkResponse::from(link))).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Lists all links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.registry.list_all().await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// Returns a single link with its click statistics.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if no link has the code.
pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.registry.get_by_code(&code).await?;

    Ok(Json(link.into()))
}

/// Deletes every link with the code.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if nothing was deleted.
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, AppError> {
    let removed = state.registry.delete_by_code(&code).await?;

    if removed == 0 {
        return Err(AppError::NotFound {
            code: normalize_code(&code),
        });
    }

    Ok(Json(DeleteResponse { ok: true }))
}

/// Dumps a compact view of every link.
///
/// # Endpoint
///
/// `GET /api/debug`
pub async fn debug_handler(
    State(state): State<AppState>,
) -> Result<Json<DebugResponse>, AppError> {
    let links: Vec<DebugLink> = state
        .registry
        .list_all()
        .await?
        .into_iter()
        .map(DebugLink::from)
        .collect();

    Ok(Json(DebugResponse {
        count: links.len(),
        links,
    }))
}

fn invalid_json(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection, "rejected request body");

    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": {
                "code": "invalid_json",
                "message": "Invalid JSON",
                "details": {}
            }
        })),
    )
        .into_response()
}
