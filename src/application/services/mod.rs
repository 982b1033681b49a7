//! Business logic services for the application layer.

pub mod link_registry;

pub use link_registry::{LinkRegistry, MAX_GENERATION_ATTEMPTS, Resolution};
