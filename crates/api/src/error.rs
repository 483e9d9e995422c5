//! Error type for LMS operations.

use std::fmt;

/// Longest response-body excerpt carried inside an error or outcome
/// message. Bodies can be whole HTML error pages; nobody needs more
/// than this to diagnose a failure.
pub const BODY_EXCERPT_MAX: usize = 500;

#[derive(Debug)]
pub enum LmsError {
    /// No stored credentials; `marksync login` has not been run.
    NotAuthenticated,
    /// Transport failure (DNS, timeout, connection refused).
    Network(String),
    /// Non-2xx HTTP status. `body` is an excerpt, never the full body.
    Http { status: u16, body: String },
    /// Response body was not the JSON shape we expected.
    Parse(String),
    /// A URL could not be built from the configured domain.
    InvalidUrl(String),
    /// The server's pagination chain never terminated (repeated next
    /// link or page cap exceeded).
    PaginationStuck(String),
}

impl fmt::Display for LmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => {
                write!(f, "not authenticated — run `marksync login` first")
            }
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http { status, body } => write!(f, "HTTP {status}: {body}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::InvalidUrl(msg) => write!(f, "invalid URL: {msg}"),
            Self::PaginationStuck(msg) => write!(f, "pagination stuck: {msg}"),
        }
    }
}

impl std::error::Error for LmsError {}

/// Truncate a response body for inclusion in an error message.
pub fn body_excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= BODY_EXCERPT_MAX {
        return trimmed.to_string();
    }
    let mut end = BODY_EXCERPT_MAX;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}
