//! GitHub API error types.
//!
//! The taxonomy distinguishes exactly one thing: whether the remote said
//! "that resource does not exist". Several reconciliation reads treat a 404
//! as a valid absent state (no hooks configured, no branch protection, no
//! CONTRIBUTING.md) rather than a failure, so `NotFound` is split out and
//! everything else is `Other`. Nothing here is retried within an invocation;
//! the sweep timer and GitHub's webhook redelivery are the only retry
//! mechanisms.

use std::fmt;
use thiserror::Error;

/// The kind of GitHub API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// HTTP 404 - the resource does not exist. Valid "absent" state at call
    /// sites that expect it; a real error everywhere else.
    NotFound,

    /// Any other non-2xx response, transport failure, or undecodable body.
    Other,
}

/// A GitHub API error with enough categorization to recognize absence.
#[derive(Debug, Error)]
pub struct ApiError {
    /// The kind of error.
    pub kind: ApiErrorKind,

    /// The HTTP status code, if one was available.
    pub status: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying octocrab error, if available.
    #[source]
    pub source: Option<octocrab::Error>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "GitHub API error (HTTP {}): {}", code, self.message),
            None => write!(f, "GitHub API error: {}", self.message),
        }
    }
}

impl ApiError {
    /// Returns true if the remote reported the resource missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ApiErrorKind::NotFound)
    }

    /// Creates an error for a response that arrived but could not be used
    /// (bad base64, non-UTF-8 content).
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Other,
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Categorizes an octocrab error.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        let status = extract_status_code(&err);
        let kind = if status == Some(404) {
            ApiErrorKind::NotFound
        } else {
            ApiErrorKind::Other
        };

        Self {
            kind,
            status,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Extracts the HTTP status code from an octocrab error, if present.
///
/// API-level errors carry the code directly. Transport-level variants do not,
/// so the message is checked for the one pattern that must be recognized
/// (404 on raw routes) before giving up.
fn extract_status_code(err: &octocrab::Error) -> Option<u16> {
    if let octocrab::Error::GitHub { source, .. } = err {
        return Some(source.status_code.as_u16());
    }

    let err_str = err.to_string();
    if err_str.contains("404") && err_str.to_lowercase().contains("not found") {
        return Some(404);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_kind_is_recognized() {
        let err = ApiError {
            kind: ApiErrorKind::NotFound,
            status: Some(404),
            message: "Not Found".to_string(),
            source: None,
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn other_kind_is_not_not_found() {
        let err = ApiError {
            kind: ApiErrorKind::Other,
            status: Some(500),
            message: "Internal Server Error".to_string(),
            source: None,
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn invalid_response_has_no_status() {
        let err = ApiError::invalid_response("bad base64");
        assert_eq!(err.kind, ApiErrorKind::Other);
        assert_eq!(err.status, None);
        assert_eq!(format!("{}", err), "GitHub API error: bad base64");
    }

    #[test]
    fn display_includes_status_when_present() {
        let err = ApiError {
            kind: ApiErrorKind::NotFound,
            status: Some(404),
            message: "Not Found".to_string(),
            source: None,
        };
        assert_eq!(format!("{}", err), "GitHub API error (HTTP 404): Not Found");
    }
}
