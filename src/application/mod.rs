//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a transport-independent API
//! for the HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_registry::LinkRegistry`] - Code generation, resolution and link management

pub mod services;
