//! The code registry: creation, resolution, lookup, listing and deletion of links.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, normalize_code, validate_custom_code};
use crate::utils::url_normalizer::validate_url;

/// Upper bound on generated candidates tried for a single create.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Outcome of a successful [`LinkRegistry::resolve`].
///
/// The lookup decides whether a code resolves; the click increment only
/// decides `hit_recorded`. A visitor who reached an existing link is
/// redirected even when the increment fails, or finds the record already
/// deleted by a concurrent `delete_by_code`. In both cases the visit happened
/// against a link that existed when it was looked up, so the redirect is
/// served from that read and only the statistic is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Serialized absolute redirect target (`https://` assumed for schemeless stored URLs).
    pub target_url: String,
    /// The record after the hit, or as read before it if the hit was not recorded.
    pub link: Link,
    /// False when the increment failed or matched no record.
    pub hit_recorded: bool,
}

/// Maps short codes to URLs on top of an injected [`LinkRepository`].
///
/// Holds no state besides the store handle, so one instance can be shared by
/// any number of concurrent tasks. All codes are normalized before they reach
/// the store.
pub struct LinkRegistry<R: LinkRepository + ?Sized> {
    repository: Arc<R>,
    generate: fn() -> String,
}

impl<R: LinkRepository + ?Sized> LinkRegistry<R> {
    /// Creates a registry over the given store.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            generate: generate_code,
        }
    }

    /// Replaces the random code source.
    pub fn with_generator(mut self, generate: fn() -> String) -> Self {
        self.generate = generate;
        self
    }

    /// Creates a link for `url`, using `code` if given or a generated one otherwise.
    ///
    /// Both inputs are validated before the store is touched. A caller-supplied
    /// code is lowercased first.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if `url` is not an absolute http(s) URL
    /// - [`AppError::InvalidFormat`] if the normalized code is not `[a-z0-9-]{1,32}`
    /// - [`AppError::CodeTaken`] if the code is already owned, including when a
    ///   concurrent creator wins the insert
    /// - [`AppError::GenerationExhausted`] if every generated candidate collided
    /// - [`AppError::StoreUnavailable`] on store errors
    pub async fn create(&self, url: &str, code: Option<&str>) -> Result<Link, AppError> {
        validate_url(url).map_err(|e| AppError::InvalidUrl {
            reason: e.to_string(),
        })?;

        let custom_code = code.map(validate_custom_code).transpose()?;

        match custom_code {
            Some(code) => self.create_with_code(url, code).await,
            None => self.create_with_generated_code(url).await,
        }
    }

    async fn create_with_code(&self, url: &str, code: String) -> Result<Link, AppError> {
        if self.repository.find_by_code(&code).await?.is_some() {
            return Err(AppError::CodeTaken { code });
        }

        let link = self
            .repository
            .insert(NewLink {
                code,
                url: url.to_string(),
            })
            .await?;

        info!(code = %link.code, id = link.id, "link created");
        Ok(link)
    }

    /// Tries up to [`MAX_GENERATION_ATTEMPTS`] candidates.
    ///
    /// A candidate counts as a collision when it already exists or when the
    /// insert loses a race on the unique constraint.
    async fn create_with_generated_code(&self, url: &str) -> Result<Link, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = normalize_code(&(self.generate)());

            if self.repository.find_by_code(&code).await?.is_some() {
                warn!(attempt, %code, "generated code collided");
                continue;
            }

            let new_link = NewLink {
                code,
                url: url.to_string(),
            };

            match self.repository.insert(new_link).await {
                Ok(link) => {
                    info!(code = %link.code, id = link.id, attempt, "link created");
                    return Ok(link);
                }
                Err(AppError::CodeTaken { code }) => {
                    warn!(attempt, %code, "generated code taken concurrently");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Resolves a code to its redirect target and records the visit.
    ///
    /// The click increment is best effort: if it fails, the resolution still
    /// succeeds with `hit_recorded = false` and the record as it was read.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no link has the normalized code
    /// - [`AppError::StoreUnavailable`] if the lookup itself fails
    pub async fn resolve(&self, raw_code: &str) -> Result<Resolution, AppError> {
        let code = normalize_code(raw_code);
        if !is_storable_code(&code) {
            debug!(code = ?code, "resolve miss on unstorable code");
            return Err(AppError::NotFound { code });
        }

        let Some(found) = self.repository.find_by_code(&code).await? else {
            debug!(%code, "resolve miss");
            return Err(AppError::NotFound { code });
        };

        let (link, hit_recorded) = match self.repository.record_hit(&code, Utc::now()).await {
            Ok(Some(updated)) => (updated, true),
            Ok(None) => {
                warn!(%code, "link removed before its hit was recorded");
                (found, false)
            }
            Err(e) => {
                warn!(%code, error = %e, "failed to record hit");
                (found, false)
            }
        };

        let target_url = link.target_url();
        if target_url != link.url {
            debug!(%code, stored = %link.url, %target_url, "redirect target derived from stored url");
        }

        Ok(Resolution {
            target_url,
            link,
            hit_recorded,
        })
    }

    /// Fetches a link without touching its statistics.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has the normalized code.
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    pub async fn get_by_code(&self, raw_code: &str) -> Result<Link, AppError> {
        let code = normalize_code(raw_code);
        if !is_storable_code(&code) {
            return Err(AppError::NotFound { code });
        }

        self.repository
            .find_by_code(&code)
            .await?
            .ok_or(AppError::NotFound { code })
    }

    /// Returns every link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    pub async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        self.repository.list_newest_first().await
    }

    /// Deletes every link with the normalized code.
    ///
    /// Returns the number of removed records; `0` means nothing matched and is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    pub async fn delete_by_code(&self, raw_code: &str) -> Result<u64, AppError> {
        let code = normalize_code(raw_code);
        if !is_storable_code(&code) {
            debug!(code = ?code, "delete skipped for unstorable code");
            return Ok(0);
        }
        let removed = self.repository.delete_by_code(&code).await?;

        if removed > 0 {
            info!(%code, removed, "link deleted");
        } else {
            debug!(%code, "delete matched nothing");
        }

        Ok(removed)
    }

    /// Checks that the underlying store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if it is not.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

/// Whether a lookup key can exist in the store at all.
///
/// PostgreSQL text cannot hold NUL, and binding one fails the query. Other
/// characters are passed through so stored codes from before the current
/// format rules stay reachable.
fn is_storable_code(code: &str) -> bool {
    !code.contains('\0')
}
