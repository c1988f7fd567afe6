//! Authenticated HTTP execution and outcome classification.
//!
//! [`Transport`] is the lowest seam: one HTTP exchange, no auth, no
//! interpretation. [`Executor`] sits above it and owns the request
//! contract every API call shares: attach a valid bearer credential,
//! send, then classify the outcome as success, expected absence, or a
//! typed error.

pub(crate) mod wire;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use crate::auth::TokenManager;
use crate::error::CommerceError;

use wire::RawErrorBody;

/// Upstream error codes that signal a domain-normal "nothing exists yet"
/// rather than a failure.
const ABSENCE_CODES: &[&str] = &["NOT_FOUND", "CART_NOT_FOUND", "OWNED_CART_NOT_FOUND"];

/// One HTTP request, already reduced to transport concerns.
#[derive(Debug)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL.
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// The raw result of one HTTP exchange.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// A single HTTP exchange against the platform.
///
/// Implemented by [`HttpTransport`] in production; tests inject fakes
/// with canned responses and call counters.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, CommerceError>;
}

/// `reqwest`-backed [`Transport`].
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, CommerceError> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|e| CommerceError::Network(format!("invalid request url: {e}")))?;

        let mut builder = self.client.request(request.method, url);
        if let Some(bearer) = &request.bearer {
            builder = builder.bearer_auth(bearer);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

/// Classified outcome of one authenticated call.
#[derive(Debug)]
pub(crate) enum Outcome<T> {
    Success(T),
    /// A recognizable, domain-normal absence. Callers decide whether it
    /// is an expected absence (`Ok(None)`) or a genuine `NotFound` error.
    Absent,
}

/// Performs authenticated calls and classifies their outcomes.
pub(crate) struct Executor {
    transport: Arc<dyn Transport>,
    tokens: Arc<TokenManager>,
}

impl Executor {
    pub(crate) fn new(transport: Arc<dyn Transport>, tokens: Arc<TokenManager>) -> Self {
        Self { transport, tokens }
    }

    /// Send one authenticated request and classify the response.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Outcome<T>, CommerceError> {
        let credential = self.tokens.ensure_valid().await?;

        let response = self
            .transport
            .execute(ApiRequest {
                method,
                path: path.to_string(),
                bearer: Some(credential.access_token),
                body,
            })
            .await?;

        if (200..300).contains(&response.status) {
            let value = serde_json::from_str(&response.body)?;
            return Ok(Outcome::Success(value));
        }

        let parsed: Option<RawErrorBody> = serde_json::from_str(&response.body).ok();
        let code = parsed.as_ref().and_then(|e| e.code.as_deref());

        if Self::is_expected_absence(response.status, code) {
            debug!(path, status = response.status, code, "expected absence");
            return Ok(Outcome::Absent);
        }

        let message = parsed
            .and_then(|e| e.message)
            .unwrap_or_else(|| response.body.chars().take(200).collect());

        match response.status {
            401 | 403 => {
                // The platform rejected a credential we thought was valid;
                // drop it so the next call re-issues.
                self.tokens.invalidate().await;
                Err(CommerceError::Auth(message))
            }
            408 => Err(CommerceError::Network(format!("request timed out: {message}"))),
            status => {
                error!(path, status, %message, "upstream returned non-success status");
                Err(CommerceError::Upstream { status, message })
            }
        }
    }

    fn is_expected_absence(status: u16, code: Option<&str>) -> bool {
        status == 404 || code.is_some_and(|c| ABSENCE_CODES.contains(&c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absence_by_status_or_code() {
        assert!(Executor::is_expected_absence(404, None));
        assert!(Executor::is_expected_absence(400, Some("OWNED_CART_NOT_FOUND")));
        assert!(!Executor::is_expected_absence(400, Some("INVALID_QUANTITY")));
        assert!(!Executor::is_expected_absence(500, None));
    }
}
