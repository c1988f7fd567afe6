//! Error taxonomy for the Saltbox client.
//!
//! Expected absences ("no cart yet") are never errors; they surface as
//! `Ok(None)` from the operations that anticipate them. Everything here
//! is a genuine failure the presentation layer may want to retry.
//!
//! Upstream error text is classified by substring matching in exactly one
//! place ([`classify_error_text`]) so a move to structured error codes
//! touches nothing else.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the Saltbox client.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Credential issuance and refresh both failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// Genuine absence of a requested single resource.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unclassified non-2xx upstream response.
    #[error("upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    /// Malformed response body.
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Malformed caller-supplied query clause. Queries recover from this
    /// by dropping the clause; the variant exists for callers that parse
    /// clauses directly.
    #[error("invalid query clause: {0}")]
    InvalidQuery(String),

    /// Persistent key-value store failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CommerceError {
    /// Best-effort advisory category for presentation-layer decisions.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Auth(_) => ErrorCategory::Auth,
            Self::Network(text) => {
                if classify_error_text(text) == ErrorCategory::Timeout {
                    ErrorCategory::Timeout
                } else {
                    ErrorCategory::Network
                }
            }
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Upstream { message, .. } => classify_error_text(message),
            Self::Parse(_) | Self::InvalidQuery(_) | Self::Storage(_) => ErrorCategory::Unknown,
        }
    }

    /// A short human-readable message suitable for direct display.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Auth => "We couldn't authorize your session. Please try again.",
            ErrorCategory::Network => "We couldn't reach the store. Check your connection.",
            ErrorCategory::Timeout => "The store took too long to respond. Please try again.",
            ErrorCategory::NotFound => "That item is no longer available.",
            ErrorCategory::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<reqwest::Error> for CommerceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("request timed out: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Advisory error category derived from upstream error text.
///
/// Classification is best-effort, never exhaustive; unrecognized text maps
/// to [`ErrorCategory::Unknown`], whose user message suggests a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Timeout,
    Auth,
    NotFound,
    Unknown,
}

/// Substring-match upstream error text into an advisory category.
///
/// Kept as the single classification point per the adapter-boundary rule:
/// when the platform ships structured error codes, only this function
/// changes.
#[must_use]
pub fn classify_error_text(text: &str) -> ErrorCategory {
    let lower = text.to_lowercase();

    if lower.contains("timeout") || lower.contains("timed out") || lower.contains("deadline") {
        ErrorCategory::Timeout
    } else if lower.contains("unauthorized")
        || lower.contains("forbidden")
        || lower.contains("token")
        || lower.contains("401")
        || lower.contains("403")
    {
        ErrorCategory::Auth
    } else if lower.contains("not found") || lower.contains("not_found") || lower.contains("404") {
        ErrorCategory::NotFound
    } else if lower.contains("connection")
        || lower.contains("network")
        || lower.contains("unreachable")
        || lower.contains("dns")
    {
        ErrorCategory::Network
    } else {
        ErrorCategory::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_timeouts_before_network() {
        assert_eq!(
            classify_error_text("connection timed out after 30s"),
            ErrorCategory::Timeout
        );
    }

    #[test]
    fn classifies_auth_text() {
        assert_eq!(
            classify_error_text("Unauthorized: token expired"),
            ErrorCategory::Auth
        );
    }

    #[test]
    fn classifies_absence_text() {
        assert_eq!(
            classify_error_text("resource NOT_FOUND"),
            ErrorCategory::NotFound
        );
    }

    #[test]
    fn unrecognized_text_is_unknown() {
        assert_eq!(
            classify_error_text("flux capacitor misaligned"),
            ErrorCategory::Unknown
        );
    }

    #[test]
    fn unknown_message_suggests_retry() {
        let err = CommerceError::Upstream {
            status: 500,
            message: "flux capacitor misaligned".to_string(),
        };
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }

    #[test]
    fn error_display() {
        let err = CommerceError::NotFound("item item-9".to_string());
        assert_eq!(err.to_string(), "not found: item item-9");

        let err = CommerceError::Upstream {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "upstream error (HTTP 502): bad gateway");
    }
}
