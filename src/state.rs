//! Shared state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::LinkRegistry;
use crate::domain::repositories::LinkRepository;

/// Registry over a type-erased store, shared by all handlers.
pub type SharedRegistry = Arc<LinkRegistry<dyn LinkRepository>>;

#[derive(Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
}

impl AppState {
    /// Builds the state around a store handle.
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self {
            registry: Arc::new(LinkRegistry::new(repository)),
        }
    }
}
