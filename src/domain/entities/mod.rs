//! Core domain entities.
//!
//! - [`Link`] - A stored code-to-URL mapping with click statistics
//! - [`NewLink`] - Input for creating a link

pub mod link;

pub use link::{Link, NewLink};
