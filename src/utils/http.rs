//! HTTP client utilities.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with sensible defaults
///
/// Wraps one pooled [`reqwest::Client`] so consecutive calls reuse connections.
/// The timeout bounds connecting and each read, not a whole transfer, so a
/// large body that keeps arriving is never cut off. Callers that want an
/// overall deadline set it per request with [`HttpClient::timeout`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with a custom user agent
    pub fn with_user_agent(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .read_timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            timeout,
        })
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Per-request timeout this client was built with
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
