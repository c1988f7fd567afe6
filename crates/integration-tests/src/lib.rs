//! Shared test harness for Saltbox integration tests.
//!
//! [`FakeTransport`] answers the platform's endpoints from canned
//! responses and counts calls per path, so scenario tests can assert
//! "exactly one network call" properties without a real server. Token
//! endpoints are served out of the box with a long-lived credential.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::Mutex;
use url::Url;

use saltbox_client::{
    ApiRequest, ClientConfig, CommerceClient, CommerceError, KeyValueStore, MemoryKeyValueStore,
    RawResponse, Transport,
};

/// Path of the token issuance endpoint, as the client requests it.
pub const ISSUE_PATH: &str = "auth/visitor/token";
/// Path of the token refresh endpoint.
pub const REFRESH_PATH: &str = "auth/visitor/refresh";
/// Path of the catalog query endpoint.
pub const ITEMS_QUERY_PATH: &str = "catalog/items/query";

#[derive(Clone)]
struct CannedResponse {
    status: u16,
    body: String,
}

/// A programmable in-memory [`Transport`].
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, CannedResponse>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with `status` for every request to `path`.
    pub async fn respond(&self, path: &str, status: u16, body: impl Into<String>) {
        self.routes.lock().await.insert(
            path.to_string(),
            CannedResponse {
                status,
                body: body.into(),
            },
        );
    }

    /// How many requests hit `path` so far.
    pub async fn calls_to(&self, path: &str) -> usize {
        self.calls.lock().await.get(path).copied().unwrap_or(0)
    }

    fn token_body() -> String {
        r#"{"accessToken": "fake-access", "refreshToken": "fake-refresh", "expiresIn": 3600}"#
            .to_string()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, CommerceError> {
        {
            let mut calls = self.calls.lock().await;
            *calls.entry(request.path.clone()).or_insert(0) += 1;
        }

        if let Some(canned) = self.routes.lock().await.get(&request.path) {
            return Ok(RawResponse {
                status: canned.status,
                body: canned.body.clone(),
            });
        }

        // Token endpoints work out of the box so most tests need no setup.
        if request.path == ISSUE_PATH || request.path == REFRESH_PATH {
            return Ok(RawResponse {
                status: 200,
                body: Self::token_body(),
            });
        }

        Ok(RawResponse {
            status: 500,
            body: format!(r#"{{"message": "no fake route for {}"}}"#, request.path),
        })
    }
}

/// A client wired to a [`FakeTransport`] and an in-memory store.
pub struct TestClient {
    pub client: CommerceClient,
    pub transport: Arc<FakeTransport>,
    pub store: Arc<MemoryKeyValueStore>,
}

/// Build a test client with default configuration.
#[must_use]
pub fn test_client() -> TestClient {
    test_client_with(|config| config)
}

/// Build a test client, letting the caller adjust the configuration.
#[must_use]
pub fn test_client_with(adjust: impl FnOnce(ClientConfig) -> ClientConfig) -> TestClient {
    let store = Arc::new(MemoryKeyValueStore::new());
    test_client_on(store.clone(), adjust)
}

/// Build a test client over an existing store (for cross-session tests).
#[must_use]
pub fn test_client_on(
    store: Arc<MemoryKeyValueStore>,
    adjust: impl FnOnce(ClientConfig) -> ClientConfig,
) -> TestClient {
    // Honors RUST_LOG when debugging a failing scenario; a no-op otherwise.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let transport = Arc::new(FakeTransport::new());
    let config = adjust(ClientConfig::new(
        Url::parse("https://api.saltbox.test/v1/").expect("valid url"),
        SecretString::from("sk_test"),
    ));

    let kv: Arc<dyn KeyValueStore> = store.clone();
    let client = CommerceClient::with_transport(config, kv, transport.clone());

    TestClient {
        client,
        transport,
        store,
    }
}

/// JSON for one catalog item in the modern (structured) encoding.
#[must_use]
pub fn item_json(id: &str, name: &str, amount: &str, in_stock: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "price": {"amount": amount, "currency": "USD"},
        "stock": {"inStock": in_stock},
    })
}

/// JSON body for an items-query response.
#[must_use]
pub fn items_body(items: &[serde_json::Value]) -> String {
    serde_json::json!({ "items": items }).to_string()
}

/// Convenience: a zero-duration cache so every read goes to the network.
#[must_use]
pub fn no_cache(config: ClientConfig) -> ClientConfig {
    config.with_cache_duration(Duration::ZERO)
}
