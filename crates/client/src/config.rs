//! Client configuration.
//!
//! All knobs are constructor parameters; the SDK reads no environment
//! variables. Hosts construct one [`ClientConfig`] at session startup and
//! hand it to [`crate::CommerceClient::new`].

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// How long cached catalog reads stay fresh (10 minutes).
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_millis(600_000);

/// Safety margin before real token expiry (5 minutes). A credential with
/// less remaining life than this is treated as already stale.
pub const DEFAULT_TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(300);

/// Ceiling on how many items one broad fetch may request for local
/// fallback filtering.
pub const DEFAULT_OVER_FETCH_LIMIT: usize = 100;

/// Currency assumed when an upstream item carries no currency at all.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Configuration for one [`crate::CommerceClient`] instance.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the commerce platform API.
    pub base_url: Url,
    /// Tenant API key presented when issuing anonymous credentials.
    pub api_key: SecretString,
    /// Staleness bound for cached catalog reads.
    pub cache_duration: Duration,
    /// Margin before real expiry at which a credential counts as stale.
    pub token_expiry_buffer: Duration,
    /// Ceiling on broad-fetch page size for local fallback filtering.
    pub over_fetch_limit: usize,
    /// Currency assumed for items the upstream left currency-less.
    pub default_currency: String,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the endpoint and key.
    #[must_use]
    pub fn new(base_url: Url, api_key: SecretString) -> Self {
        Self {
            base_url,
            api_key,
            cache_duration: DEFAULT_CACHE_DURATION,
            token_expiry_buffer: DEFAULT_TOKEN_EXPIRY_BUFFER,
            over_fetch_limit: DEFAULT_OVER_FETCH_LIMIT,
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// Override the cache staleness bound.
    #[must_use]
    pub const fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.cache_duration = duration;
        self
    }

    /// Override the token expiry buffer.
    #[must_use]
    pub const fn with_token_expiry_buffer(mut self, buffer: Duration) -> Self {
        self.token_expiry_buffer = buffer;
        self
    }

    /// Override the broad-fetch ceiling.
    #[must_use]
    pub const fn with_over_fetch_limit(mut self, limit: usize) -> Self {
        self.over_fetch_limit = limit;
        self
    }

    /// Override the fallback currency.
    #[must_use]
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("cache_duration", &self.cache_duration)
            .field("token_expiry_buffer", &self.token_expiry_buffer)
            .field("over_fetch_limit", &self.over_fetch_limit)
            .field("default_currency", &self.default_currency)
            .finish()
    }
}
