use reqwest::{Client, ClientBuilder, RequestBuilder};
use std::{sync::Arc, time::Duration};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::errors::QueryError;

const MAX_ERROR_BODY_CHARS: usize = 256;

/// Configuration for HTTP client concurrency and timeout behavior.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum number of concurrent node requests allowed
    pub concurrent_limit: usize,
    /// Permit acquisition timeout in milliseconds
    pub permit_timeout_ms: u64,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self { concurrent_limit: 100, permit_timeout_ms: 5_000, connect_timeout: Duration::from_secs(5) }
    }
}

/// HTTP client shared by every chain transport, with semaphore-based concurrency control.
///
/// Requests are never retried here: retry and fallback belong to the caller.
pub struct HttpClient {
    client: Client,
    concurrent_limit: Arc<Semaphore>,
    config: HttpClientConfig,
}

/// RAII guard ensuring semaphore permits are always released.
struct PermitGuard {
    _permit: OwnedSemaphorePermit,
    semaphore: Arc<Semaphore>,
}

impl PermitGuard {
    fn new(permit: OwnedSemaphorePermit, semaphore: Arc<Semaphore>) -> Self {
        Self { _permit: permit, semaphore }
    }
}

impl Drop for PermitGuard {
    fn drop(&mut self) {
        tracing::trace!(
            available_permits = self.semaphore.available_permits(),
            "permit guard dropped"
        );
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn new() -> Result<Self, QueryError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Creates a new HTTP client with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, QueryError> {
        let client = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(30))
            .connect_timeout(config.connect_timeout)
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::limited(3))
            .user_agent(concat!("andromeda-core/", env!("CARGO_PKG_VERSION")))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http client");
                QueryError::InvalidConfig(format!("HTTP client build failed: {e}"))
            })?;

        Ok(Self { client, concurrent_limit: Arc::new(Semaphore::new(config.concurrent_limit)), config })
    }

    /// Sanitizes network errors to prevent information disclosure.
    fn sanitize_network_error(error: &reqwest::Error) -> String {
        if error.is_connect() {
            "connection refused or unreachable".to_string()
        } else if error.is_timeout() {
            "connection timed out".to_string()
        } else if error.is_request() {
            "request failed".to_string()
        } else if error.is_body() {
            "response body error".to_string()
        } else if error.is_decode() {
            "response decode error".to_string()
        } else if error.is_redirect() {
            "too many redirects".to_string()
        } else {
            "network error".to_string()
        }
    }

    fn truncate_body(raw: &str) -> String {
        if raw.chars().count() > MAX_ERROR_BODY_CHARS {
            let head: String = raw.chars().take(MAX_ERROR_BODY_CHARS).collect();
            format!("{head}... (truncated)")
        } else {
            raw.to_string()
        }
    }

    /// Sends a JSON `POST` (used by the RPC transport).
    ///
    /// # Errors
    ///
    /// - [`QueryError::Timeout`] if permit acquisition or the request times out
    /// - [`QueryError::HttpError`] for non-success HTTP status codes
    /// - [`QueryError::ConnectionFailed`] for other network failures
    pub async fn post_json(
        &self,
        url: &str,
        body: bytes::Bytes,
        timeout: Duration,
    ) -> Result<bytes::Bytes, QueryError> {
        let request = self.client.post(url).header("content-type", "application/json").body(body);
        self.execute(url, request, timeout).await
    }

    /// Sends a `GET` (used by the LCD transport).
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::post_json`].
    pub async fn get(&self, url: &str, timeout: Duration) -> Result<bytes::Bytes, QueryError> {
        let request = self.client.get(url).header("accept", "application/json");
        self.execute(url, request, timeout).await
    }

    async fn execute(
        &self,
        url: &str,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<bytes::Bytes, QueryError> {
        let permit = tokio::time::timeout(
            Duration::from_millis(self.config.permit_timeout_ms),
            Arc::clone(&self.concurrent_limit).acquire_owned(),
        )
        .await
        .map_err(|_| {
            tracing::warn!(
                available_permits = self.concurrent_limit.available_permits(),
                "http client semaphore acquisition timeout"
            );
            QueryError::Timeout
        })?
        .map_err(|_| QueryError::ConnectionFailed("http client closed".to_string()))?;

        let _permit_guard = PermitGuard::new(permit, self.concurrent_limit.clone());

        let response = request.timeout(timeout).send().await.map_err(|e| {
            tracing::debug!(url = url, error = %e, "node request failed");
            if e.is_timeout() {
                QueryError::Timeout
            } else {
                QueryError::ConnectionFailed(Self::sanitize_network_error(&e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let raw_text = response.text().await.unwrap_or_default();
            tracing::trace!(status = status.as_u16(), "node request returned error status");
            return Err(QueryError::HttpError(status.as_u16(), Self::truncate_body(&raw_text)));
        }

        response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                QueryError::Timeout
            } else {
                QueryError::ConnectionFailed(Self::sanitize_network_error(&e))
            }
        })
    }

    #[cfg(test)]
    #[must_use]
    pub fn available_permits(&self) -> usize {
        self.concurrent_limit.available_permits()
    }
}
