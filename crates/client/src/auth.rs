//! Anonymous credential lifecycle.
//!
//! Every API call must carry a credential with at least the configured
//! buffer of remaining life. [`TokenManager::ensure_valid`] guarantees
//! that: it returns the current credential while usable, refreshes it
//! once it enters the buffer window, and falls back to issuing a brand
//! new one when refresh is impossible or fails.
//!
//! The state mutex is held across the refresh-or-issue network attempt,
//! so concurrent callers that both observe a stale credential coalesce
//! into a single attempt; refresh tokens are one-time-use and must never
//! be consumed twice.

use std::sync::Arc;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use saltbox_core::Credential;

use crate::clock::Clock;
use crate::error::CommerceError;
use crate::http::wire::{IssueTokenRequest, RefreshTokenRequest, TokenResponse};
use crate::http::{ApiRequest, Transport};
use crate::storage::KeyValueStore;

/// Storage key the persisted credential lives under.
pub(crate) const CREDENTIAL_STORAGE_KEY: &str = "saltbox.credential";

const ISSUE_PATH: &str = "auth/visitor/token";
const REFRESH_PATH: &str = "auth/visitor/refresh";

/// Issues, persists, validates, and refreshes anonymous credentials.
pub(crate) struct TokenManager {
    transport: Arc<dyn Transport>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    api_key: SecretString,
    buffer_secs: i64,
    /// `None` until first use or after invalidation. Guarded writes only;
    /// the lock is held across refresh/issue so attempts never overlap.
    state: Mutex<Option<Credential>>,
}

impl TokenManager {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        api_key: SecretString,
        buffer_secs: i64,
    ) -> Self {
        Self {
            transport,
            store,
            clock,
            api_key,
            buffer_secs,
            state: Mutex::new(None),
        }
    }

    /// Return a credential guaranteed to outlive the buffer window.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Auth`] only when refresh (if possible)
    /// and fresh issuance both fail.
    #[instrument(skip(self))]
    pub(crate) async fn ensure_valid(&self) -> Result<Credential, CommerceError> {
        let mut state = self.state.lock().await;

        if state.is_none() {
            *state = self.load_persisted().await;
        }

        let now = self.clock.now_secs();
        if let Some(credential) = state.as_ref()
            && credential.is_usable(now, self.buffer_secs)
        {
            return Ok(credential.clone());
        }

        // Stale or absent. Try refresh first; its failure is a signal to
        // fall back, never an error in itself.
        if let Some(refresh_token) = state.as_ref().and_then(|c| c.refresh_token.clone())
            && let Some(credential) = self.refresh(&refresh_token).await
        {
            self.persist(&credential).await;
            *state = Some(credential.clone());
            return Ok(credential);
        }

        // A failed issue leaves any prior credential in place untouched.
        let credential = self.issue().await?;
        self.persist(&credential).await;
        *state = Some(credential.clone());
        Ok(credential)
    }

    /// Drop the credential so the next call re-authenticates. Used when
    /// the platform rejects a credential we considered valid; the
    /// persisted copy goes too, or it would just rehydrate.
    pub(crate) async fn invalidate(&self) {
        *self.state.lock().await = None;
        if let Err(e) = self
            .store
            .remove_many(&[CREDENTIAL_STORAGE_KEY.to_string()])
            .await
        {
            warn!(error = %e, "could not remove rejected credential");
        }
    }

    /// Forget the credential in memory and in persistent storage.
    pub(crate) async fn clear(&self) -> Result<(), CommerceError> {
        *self.state.lock().await = None;
        self.store
            .remove_many(&[CREDENTIAL_STORAGE_KEY.to_string()])
            .await?;
        Ok(())
    }

    /// Request a brand-new anonymous credential.
    async fn issue(&self) -> Result<Credential, CommerceError> {
        let body = serde_json::to_value(IssueTokenRequest {
            api_key: self.api_key.expose_secret(),
        })?;

        let response = self
            .transport
            .execute(ApiRequest {
                method: Method::POST,
                path: ISSUE_PATH.to_string(),
                bearer: None,
                body: Some(body),
            })
            .await
            .map_err(|e| CommerceError::Auth(format!("credential issuance failed: {e}")))?;

        if !(200..300).contains(&response.status) {
            return Err(CommerceError::Auth(format!(
                "credential issuance rejected (HTTP {}): {}",
                response.status,
                response.body.chars().take(200).collect::<String>()
            )));
        }

        let token: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| CommerceError::Auth(format!("malformed token response: {e}")))?;

        debug!(expires_in = token.expires_in, "issued anonymous credential");
        Ok(self.credential_from(token))
    }

    /// Exchange a refresh token for a replacement credential.
    ///
    /// Returns `None` on any failure; the caller falls back to `issue`.
    async fn refresh(&self, refresh_token: &str) -> Option<Credential> {
        let body = serde_json::to_value(RefreshTokenRequest { refresh_token }).ok()?;

        let response = self
            .transport
            .execute(ApiRequest {
                method: Method::POST,
                path: REFRESH_PATH.to_string(),
                bearer: None,
                body: Some(body),
            })
            .await;

        let response = match response {
            Ok(r) if (200..300).contains(&r.status) => r,
            Ok(r) => {
                warn!(status = r.status, "credential refresh rejected, will re-issue");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "credential refresh failed, will re-issue");
                return None;
            }
        };

        match serde_json::from_str::<TokenResponse>(&response.body) {
            Ok(token) => {
                debug!(expires_in = token.expires_in, "refreshed credential");
                Some(self.credential_from(token))
            }
            Err(e) => {
                warn!(error = %e, "malformed refresh response, will re-issue");
                None
            }
        }
    }

    fn credential_from(&self, token: TokenResponse) -> Credential {
        Credential {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: self.clock.now_secs() + token.expires_in,
        }
    }

    async fn load_persisted(&self) -> Option<Credential> {
        let raw = match self.store.get(CREDENTIAL_STORAGE_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "could not read persisted credential");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(credential) => Some(credential),
            Err(e) => {
                warn!(error = %e, "discarding unreadable persisted credential");
                None
            }
        }
    }

    /// Persist after every successful issue/refresh. Storage failures are
    /// logged and swallowed: a credential we cannot persist still works
    /// for this session.
    async fn persist(&self, credential: &Credential) {
        let serialized = match serde_json::to_string(credential) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "could not serialize credential");
                return;
            }
        };

        if let Err(e) = self.store.set(CREDENTIAL_STORAGE_KEY, &serialized).await {
            warn!(error = %e, "could not persist credential");
        }
    }
}
