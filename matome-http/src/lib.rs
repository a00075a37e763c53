//! matome-http
//!
//! Production [`ServiceFetcher`] backed by `reqwest`. Performs exactly one
//! GET per call with the descriptor's query parameters and headers, a finite
//! client-side timeout, and no retries.
#![warn(missing_docs)]

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use matome_core::{MatomeError, RequestDescriptor, ServiceFetcher, ServiceName};

/// Shared, reentrant HTTP fetcher; safe for concurrent use by all workers.
pub struct HttpFetcher {
    client: reqwest::Client,
}

/// Builder for [`HttpFetcher`].
pub struct HttpFetcherBuilder {
    timeout: Duration,
    verify_tls: bool,
}

impl Default for HttpFetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcherBuilder {
    /// Builder with a 5 s timeout and TLS verification disabled.
    ///
    /// Verification is off by default because the upstream TLS endpoints
    /// serve self-signed certificates.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            verify_tls: false,
        }
    }

    /// Client-side timeout applied to every request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Re-enable TLS certificate verification.
    #[must_use]
    pub const fn verify_tls(mut self, yes: bool) -> Self {
        self.verify_tls = yes;
        self
    }

    /// Build the fetcher.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the underlying client cannot be constructed.
    pub fn build(self) -> Result<HttpFetcher, MatomeError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(!self.verify_tls)
            .build()
            .map_err(|e| MatomeError::InvalidArg(format!("http client: {e}")))?;
        Ok(HttpFetcher { client })
    }
}

impl HttpFetcher {
    /// Start building a fetcher.
    #[must_use]
    pub const fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::new()
    }

    /// Fetcher with default settings.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the underlying client cannot be constructed.
    pub fn new_default() -> Result<Self, MatomeError> {
        Self::builder().build()
    }
}

#[async_trait]
impl ServiceFetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "matome-http"
    }

    async fn fetch(
        &self,
        service: ServiceName,
        descriptor: &RequestDescriptor,
    ) -> Result<Value, MatomeError> {
        let mut req = self.client.get(&descriptor.uri).query(&descriptor.query);
        for (name, value) in &descriptor.headers {
            req = req.header(name, value);
        }

        let started = Instant::now();
        let response = req
            .send()
            .await
            .map_err(|e| MatomeError::upstream(service, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MatomeError::upstream(
                service,
                format!("unexpected status {status} from {}", descriptor.uri),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MatomeError::upstream(service, e.to_string()))?;

        debug!(
            %service,
            uri = %descriptor.uri,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "upstream fetch",
        );

        serde_json::from_str(&body)
            .map_err(|e| MatomeError::upstream(service, format!("invalid JSON body: {e}")))
    }
}
