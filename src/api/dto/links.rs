//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Link;

/// Request to create a link.
///
/// Both fields are optional at the wire level so that a missing `url` is
/// reported as an invalid URL rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateLinkRequest {
    /// Target URL (absolute http/https).
    pub url: Option<String>,

    /// Optional custom code, lowercased by the registry.
    pub code: Option<String>,
}

impl CreateLinkRequest {
    /// The custom code, with an empty string treated as absent.
    pub fn custom_code(&self) -> Option<&str> {
        self.code.as_deref().filter(|code| !code.is_empty())
    }
}

/// JSON representation of a stored link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub code: String,
    pub url: String,
    pub clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            code: link.code,
            url: link.url,
            clicks: link.clicks,
            last_clicked: link.last_clicked,
            created_at: link.created_at,
        }
    }
}

/// Acknowledgement returned after a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
}

/// Compact listing used by the debug endpoint.
#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub count: usize,
    pub links: Vec<DebugLink>,
}

#[derive(Debug, Serialize)]
pub struct DebugLink {
    pub id: i64,
    pub code: String,
    pub url: String,
    pub clicks: i64,
}

impl From<Link> for DebugLink {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            code: link.code,
            url: link.url,
            clicks: link.clicks,
        }
    }
}
