//! Anonymous visitor credential.

use serde::{Deserialize, Serialize};

/// An anonymous access credential issued by the commerce platform.
///
/// Credentials are created whole by token issuance, replaced whole by
/// refresh, and never partially mutated. `expires_at` is epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer token attached to every API call.
    pub access_token: String,
    /// One-time-use token for obtaining a replacement credential.
    ///
    /// Absent when the platform issued a non-refreshable credential;
    /// the lifecycle manager falls back to a fresh issue in that case.
    pub refresh_token: Option<String>,
    /// Expiry instant in epoch seconds.
    pub expires_at: i64,
}

impl Credential {
    /// Whether the credential is still usable at `now_secs`.
    ///
    /// A credential inside the `buffer_secs` window before real expiry is
    /// treated as unusable even though the platform would still accept it,
    /// so that a request never races its own token expiry mid-flight.
    #[must_use]
    pub const fn is_usable(&self, now_secs: i64, buffer_secs: i64) -> bool {
        self.expires_at - now_secs >= buffer_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(expires_at: i64) -> Credential {
        Credential {
            access_token: "tok".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at,
        }
    }

    #[test]
    fn usable_outside_buffer() {
        assert!(credential(1_000).is_usable(600, 300));
    }

    #[test]
    fn unusable_inside_buffer() {
        // 299 seconds of life left, 300 second buffer.
        assert!(!credential(899).is_usable(600, 300));
    }

    #[test]
    fn boundary_is_usable() {
        assert!(credential(900).is_usable(600, 300));
    }

    #[test]
    fn expired_is_unusable() {
        assert!(!credential(100).is_usable(600, 300));
    }

    #[test]
    fn serde_round_trip() {
        let cred = credential(42);
        let json = serde_json::to_string(&cred).expect("serialize");
        let back: Credential = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(cred, back);
    }
}
