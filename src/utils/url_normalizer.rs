//! Target URL validation and redirect-time completion.
//!
//! New links must carry an absolute `http`/`https` URL with a host, written
//! exactly as it should be stored: no surrounding or embedded whitespace and no
//! control characters, since the URL parser would silently strip or encode
//! them. Records already in the store may predate these rules, so redirects
//! tolerate a missing scheme and assume `https://`.

use url::Url;

/// Reasons a candidate target URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Checks a candidate target URL for new links.
///
/// # Errors
///
/// - [`UrlValidationError::Empty`] for empty input
/// - [`UrlValidationError::InvalidFormat`] for malformed or schemeless input, or
///   input containing whitespace or control characters
/// - [`UrlValidationError::UnsupportedProtocol`] for non-HTTP(S) schemes
/// - [`UrlValidationError::MissingHost`] when the host is empty
pub fn validate_url(input: &str) -> Result<Url, UrlValidationError> {
    if input.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(UrlValidationError::InvalidFormat(
            "contains whitespace or control characters".to_string(),
        ));
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}

/// Returns true if `input` is acceptable as the target of a new link.
pub fn is_valid_url(input: &str) -> bool {
    validate_url(input).is_ok()
}

/// Derives the redirect target from a stored URL.
///
/// A stored value that parses as an absolute URL is returned in its serialized
/// form (punycode host, percent-encoded path). Anything else gets an `https://`
/// prefix and is serialized the same way when that parses. The result is never
/// written back.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(ensure_absolute_url("example.com/page"), "https://example.com/page");
/// assert_eq!(ensure_absolute_url("http://example.com"), "http://example.com/");
/// ```
pub fn ensure_absolute_url(stored: &str) -> String {
    if let Ok(url) = Url::parse(stored) {
        return url.into();
    }

    let completed = format!("https://{stored}");
    match Url::parse(&completed) {
        Ok(url) => url.into(),
        Err(_) => completed,
    }
}
