//! Domain layer: the link entity and the store contract.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependency on HTTP or on a concrete store. The
//! registry itself lives in [`crate::application::services`].

pub mod entities;
pub mod repositories;
