//! INSPIRE-HEP REST client implementation.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

use crate::client::{ClientError, LiteratureApi};
use crate::config::ClientConfig;
use crate::models::{LiteratureRecord, SearchQuery, SearchResult};
use crate::utils::{HttpClient, DEFAULT_USER_AGENT};

/// Base URL for the INSPIRE-HEP API
pub const BASE_URL: &str = "https://inspirehep.net/api";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// INSPIRE-HEP literature client
///
/// Supports:
/// - Search by query (`/literature?q=...`)
/// - Record lookup (`/literature/{id}`)
/// - Streaming file downloads
#[derive(Debug, Clone)]
pub struct InspireClient {
    http: HttpClient,
    base_url: Url,
}

impl InspireClient {
    /// Create a client against the public API with the default timeout
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client against the public API with a custom timeout
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ClientError> {
        Self::with_base_url(BASE_URL, Duration::from_secs(timeout_secs))
    }

    /// Create a client against another endpoint (mirrors, test servers)
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Self::build(base_url, DEFAULT_USER_AGENT, timeout)
    }

    /// Create a client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::build(
            &config.base_url,
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn build(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = HttpClient::with_user_agent(user_agent, timeout)
            .map_err(|e| ClientError::transport(base_url.as_str(), e))?;

        Ok(Self { http, base_url })
    }

    /// The API endpoint all requests are made against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.http.timeout()
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a JSON request and decode the body
    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<T, ClientError> {
        tracing::debug!(url = %url, "GET");

        let response = request
            .header(ACCEPT, "application/json")
            .timeout(self.http.timeout())
            .send()
            .await
            .map_err(|e| ClientError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::status(url.as_str(), status));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::transport(url.as_str(), e))?;

        serde_json::from_slice(&bytes).map_err(|source| ClientError::Parse {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl LiteratureApi for InspireClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, ClientError> {
        let url = self.endpoint(&["literature"])?;
        let params = [
            ("q", query.query.clone()),
            ("size", query.size.to_string()),
            ("page", query.page.to_string()),
        ];

        let request = self.http.client().get(url.clone()).query(&params);
        let result: SearchResult = self.get_json(request, &url).await?;

        tracing::debug!(
            query = %query.query,
            total = result.total(),
            returned = result.hits().len(),
            "search completed"
        );
        Ok(result)
    }

    async fn fetch_record(&self, record_id: &str) -> Result<LiteratureRecord, ClientError> {
        let url = self.endpoint(&["literature", record_id])?;
        let request = self.http.client().get(url.clone());
        self.get_json(request, &url).await
    }

    async fn stream_download(&self, url: &str, destination: &Path) -> Result<u64, ClientError> {
        tracing::debug!(url, destination = %destination.display(), "streaming download");

        let response = self
            .http
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::status(url, status));
        }

        let file = tokio::fs::File::create(destination)
            .await
            .map_err(|e| ClientError::io(destination, e))?;
        let mut writer = BufWriter::new(file);
        let mut stream = response.bytes_stream();
        let mut bytes_written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ClientError::transport(url, e))?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| ClientError::io(destination, e))?;
            bytes_written += chunk.len() as u64;
        }

        writer
            .flush()
            .await
            .map_err(|e| ClientError::io(destination, e))?;

        tracing::debug!(bytes_written, "download finished");
        Ok(bytes_written)
    }
}
