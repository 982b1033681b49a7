//! Handler for short code redirects.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// The code is matched case-insensitively. Each successful redirect counts as
/// a click; a failed click update does not block the redirect.
///
/// # Errors
///
/// - 404 Not Found if no link has the code
/// - 500 if the stored URL cannot be expressed as a `Location` header
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let resolution = state.registry.resolve(&code).await?;

    debug!(
        code = %resolution.link.code,
        target = %resolution.target_url,
        hit_recorded = resolution.hit_recorded,
        "redirecting"
    );

    let location = HeaderValue::from_str(&resolution.target_url).map_err(|e| {
        AppError::internal(format!(
            "stored url for {} is not a valid Location header: {}",
            resolution.link.code, e
        ))
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
