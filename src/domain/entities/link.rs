//! Link entity representing a code-to-URL mapping with click statistics.

use chrono::{DateTime, Utc};

use crate::utils::url_normalizer::ensure_absolute_url;

/// A stored link record.
///
/// `code` and `url` never change after creation; only `clicks` and
/// `last_clicked` move, and only when the link is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub url: String,
    pub clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        url: String,
        clicks: i64,
        last_clicked: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            url,
            clicks,
            last_clicked,
            created_at,
        }
    }

    /// Serialized redirect target, with `https://` assumed when the stored URL has no scheme.
    pub fn target_url(&self) -> String {
        ensure_absolute_url(&self.url)
    }
}

/// Input data for creating a new link.
///
/// `code` must already be normalized and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub url: String,
}
