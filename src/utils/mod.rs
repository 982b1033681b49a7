//! Utility functions for code handling, URL checks, and store error classification.
//!
//! - [`code_generator`] - Short code generation, normalization and validation
//! - [`url_normalizer`] - Target URL validation and redirect-time completion
//! - [`db_error`] - PostgreSQL error classification

pub mod code_generator;
pub mod db_error;
pub mod url_normalizer;
