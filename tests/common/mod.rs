#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use link_registry::domain::entities::{Link, NewLink};
use link_registry::domain::repositories::LinkRepository;
use link_registry::error::AppError;
use link_registry::infrastructure::persistence::InMemoryLinkRepository;
use link_registry::routes::app_router;
use link_registry::state::AppState;

pub fn create_test_state() -> (AppState, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let state = AppState::new(repo.clone());
    (state, repo)
}

pub fn create_test_server() -> (TestServer, Arc<InMemoryLinkRepository>) {
    let (state, repo) = create_test_state();
    let server = TestServer::new(app_router(state)).unwrap();
    (server, repo)
}

pub fn seed_link(repo: &InMemoryLinkRepository, code: &str, url: &str) -> Link {
    repo.seed(code, url, Utc::now()).unwrap()
}

pub fn seed_link_at(
    repo: &InMemoryLinkRepository,
    code: &str,
    url: &str,
    created_at: DateTime<Utc>,
) -> Link {
    repo.seed(code, url, created_at).unwrap()
}

/// A store whose every call fails, as if the database were down.
pub struct UnavailableRepository;

#[async_trait]
impl LinkRepository for UnavailableRepository {
    async fn insert(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(AppError::store_unavailable("connection refused"))
    }

    async fn find_by_code(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Err(AppError::store_unavailable("connection refused"))
    }

    async fn record_hit(
        &self,
        _code: &str,
        _clicked_at: DateTime<Utc>,
    ) -> Result<Option<Link>, AppError> {
        Err(AppError::store_unavailable("connection refused"))
    }

    async fn list_newest_first(&self) -> Result<Vec<Link>, AppError> {
        Err(AppError::store_unavailable("connection refused"))
    }

    async fn delete_by_code(&self, _code: &str) -> Result<u64, AppError> {
        Err(AppError::store_unavailable("connection refused"))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::store_unavailable("connection refused"))
    }
}

pub fn create_unavailable_server() -> TestServer {
    let state = AppState::new(Arc::new(UnavailableRepository));
    TestServer::new(app_router(state)).unwrap()
}
