//! Saltbox client - data-access layer for the Saltbox commerce platform.
//!
//! # Architecture
//!
//! - The platform is the source of truth - no local sync, direct API calls
//! - Anonymous visitor credentials are issued, persisted, and refreshed
//!   transparently; no call ever sees an expiring token
//! - Catalog reads go through a TTL cache (10 minute staleness bound)
//! - Filtering, sorting, and pagination the platform's query endpoint
//!   lacks are reproduced locally over an over-fetched page
//! - Cart operations always go live
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use saltbox_client::{ClientConfig, CommerceClient, MemoryKeyValueStore, QuerySpec};
//!
//! let config = ClientConfig::new(base_url, api_key);
//! let client = CommerceClient::new(config, Arc::new(MemoryKeyValueStore::new()));
//!
//! // Query the catalog
//! let page = client.catalog().query(&QuerySpec::with_limit(20)).await?;
//!
//! // Read the cart ("no cart yet" is Ok(None), not an error)
//! let cart = client.cart().current().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod auth;
mod cache;
pub mod cart;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod storage;

use std::sync::Arc;

pub use saltbox_core::*;

pub use cart::CartService;
pub use catalog::Catalog;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ClientConfig;
pub use error::{CommerceError, ErrorCategory};
pub use http::{ApiRequest, HttpTransport, RawResponse, Transport};
pub use storage::{KeyValueStore, MemoryKeyValueStore, StorageError};

use auth::TokenManager;
use cache::TtlCache;
use http::Executor;

/// The Saltbox commerce client.
///
/// An explicitly constructed, owned instance: create one per session at
/// startup, drop it at shutdown. There is no global state.
pub struct CommerceClient {
    catalog: Catalog,
    cart: CartService,
    tokens: Arc<TokenManager>,
}

impl CommerceClient {
    /// Build a client over HTTPS with the host-provided credential store.
    #[must_use]
    pub fn new(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let transport = Arc::new(HttpTransport::new(config.base_url.clone()));
        Self::with_transport(config, store, transport)
    }

    /// Build a client over a custom [`Transport`] (tests, instrumentation,
    /// alternative HTTP stacks).
    #[must_use]
    pub fn with_transport(
        config: ClientConfig,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let buffer_secs =
            i64::try_from(config.token_expiry_buffer.as_secs()).unwrap_or(i64::MAX);
        let ttl_millis = i64::try_from(config.cache_duration.as_millis()).unwrap_or(i64::MAX);

        let tokens = Arc::new(TokenManager::new(
            transport.clone(),
            store,
            clock.clone(),
            config.api_key,
            buffer_secs,
        ));

        let executor = Arc::new(Executor::new(transport, tokens.clone()));

        let catalog = Catalog::new(
            executor.clone(),
            TtlCache::new(ttl_millis, clock),
            config.over_fetch_limit,
            config.default_currency.clone(),
        );
        let cart = CartService::new(executor, config.default_currency);

        Self {
            catalog,
            cart,
            tokens,
        }
    }

    /// Catalog read operations.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Cart read and mutation operations.
    #[must_use]
    pub const fn cart(&self) -> &CartService {
        &self.cart
    }

    /// Forget the session: drop the credential (memory and storage) and
    /// every cached read.
    ///
    /// # Errors
    ///
    /// Propagates storage failures from credential removal.
    pub async fn clear_session(&self) -> Result<(), CommerceError> {
        self.tokens.clear().await?;
        self.catalog.refresh().await;
        Ok(())
    }
}
