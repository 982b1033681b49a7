//! In-process implementation of the link repository.
//!
//! Behaves like the PostgreSQL store for everything the registry relies on:
//! ids are monotonic, codes are unique, and every method runs under a single
//! lock acquisition so increments are never lost.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    links: HashMap<String, Link>,
}

/// Mutex-guarded map keyed by code.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    inner: Mutex<Inner>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record verbatim, bypassing validation.
    ///
    /// Stands in for rows written before the current rules existed, such as
    /// URLs without a scheme.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeTaken`] if the code is already present.
    pub fn seed(&self, code: &str, url: &str, created_at: DateTime<Utc>) -> Result<Link, AppError> {
        let mut inner = self.lock()?;
        Self::insert_locked(&mut inner, code.to_string(), url.to_string(), created_at)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::store_unavailable("mutex poisoned"))
    }

    fn insert_locked(
        inner: &mut Inner,
        code: String,
        url: String,
        created_at: DateTime<Utc>,
    ) -> Result<Link, AppError> {
        if inner.links.contains_key(&code) {
            return Err(AppError::CodeTaken { code });
        }

        inner.next_id += 1;
        let link = Link::new(inner.next_id, code.clone(), url, 0, None, created_at);
        inner.links.insert(code, link.clone());

        Ok(link)
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut inner = self.lock()?;
        Self::insert_locked(&mut inner, new_link.code, new_link.url, Utc::now())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.lock()?.links.get(code).cloned())
    }

    async fn record_hit(
        &self,
        code: &str,
        clicked_at: DateTime<Utc>,
    ) -> Result<Option<Link>, AppError> {
        let mut inner = self.lock()?;

        Ok(inner.links.get_mut(code).map(|link| {
            link.clicks += 1;
            link.last_clicked = Some(clicked_at);
            link.clone()
        }))
    }

    async fn list_newest_first(&self) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self.lock()?.links.values().cloned().collect();
        links.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(links)
    }

    async fn delete_by_code(&self, code: &str) -> Result<u64, AppError> {
        Ok(u64::from(self.lock()?.links.remove(code).is_some()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::Duration;

    fn new_link(code: &str) -> NewLink {
        NewLink {
            code: code.to_string(),
            url: "https://example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_monotonic_ids() {
        let repo = InMemoryLinkRepository::new();

        let first = repo.insert(new_link("a")).await.unwrap();
        let second = repo.insert(new_link("b")).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.clicks, 0);
        assert!(first.last_clicked.is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_code() {
        let repo = InMemoryLinkRepository::new();
        repo.insert(new_link("dup")).await.unwrap();

        let err = repo.insert(new_link("dup")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CodeTaken);
    }

    #[tokio::test]
    async fn test_lookup_is_exact() {
        let repo = InMemoryLinkRepository::new();
        repo.insert(new_link("abc")).await.unwrap();

        assert!(repo.find_by_code("abc").await.unwrap().is_some());
        assert!(repo.find_by_code("ABC").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_hit_increments() {
        let repo = InMemoryLinkRepository::new();
        repo.insert(new_link("hit")).await.unwrap();
        let at = Utc::now();

        repo.record_hit("hit", at).await.unwrap();
        let link = repo.record_hit("hit", at).await.unwrap().unwrap();

        assert_eq!(link.clicks, 2);
        assert_eq!(link.last_clicked, Some(at));
    }

    #[tokio::test]
    async fn test_record_hit_missing_code() {
        let repo = InMemoryLinkRepository::new();
        assert!(repo.record_hit("none", Utc::now()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = InMemoryLinkRepository::new();
        let now = Utc::now();

        repo.seed("old", "https://a.com", now - Duration::hours(2))
            .unwrap();
        repo.seed("new", "https://b.com", now).unwrap();
        repo.seed("mid", "https://c.com", now - Duration::hours(1))
            .unwrap();

        let codes: Vec<String> = repo
            .list_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.code)
            .collect();

        assert_eq!(codes, ["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_list_breaks_ties_by_id() {
        let repo = InMemoryLinkRepository::new();
        let now = Utc::now();

        repo.seed("first", "https://a.com", now).unwrap();
        repo.seed("second", "https://b.com", now).unwrap();

        let links = repo.list_newest_first().await.unwrap();

        assert_eq!(links[0].code, "second");
        assert_eq!(links[1].code, "first");
    }

    #[tokio::test]
    async fn test_delete_by_code() {
        let repo = InMemoryLinkRepository::new();
        repo.insert(new_link("bye")).await.unwrap();

        assert_eq!(repo.delete_by_code("bye").await.unwrap(), 1);
        assert_eq!(repo.delete_by_code("bye").await.unwrap(), 0);
        assert!(repo.find_by_code("bye").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ping() {
        assert!(InMemoryLinkRepository::new().ping().await.is_ok());
    }
}
