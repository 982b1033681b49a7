//! Repository trait for link storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;

/// Store contract behind the link registry.
///
/// Every method is a single atomic store call. Codes passed in are already
/// normalized; implementations compare them exactly.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with `clicks = 0` and no last click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeTaken`] if the store's uniqueness constraint
    /// rejects the code. Returns [`AppError::StoreUnavailable`] on store errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its exact code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Adds one click and sets the last-click time, relative to the stored value.
    ///
    /// Returns the updated link, or `None` if no link has this code anymore.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn record_hit(
        &self,
        code: &str,
        clicked_at: DateTime<Utc>,
    ) -> Result<Option<Link>, AppError>;

    /// Returns every link, newest first (`created_at` desc, then `id` desc).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn list_newest_first(&self) -> Result<Vec<Link>, AppError>;

    /// Deletes every link with this code and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn delete_by_code(&self, code: &str) -> Result<u64, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if it is not.
    async fn ping(&self) -> Result<(), AppError>;
}
