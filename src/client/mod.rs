//! Client for the INSPIRE-HEP literature API.
//!
//! The [`LiteratureApi`] trait is the seam between the download operations and
//! the network. [`InspireClient`] talks to the real service over HTTP;
//! [`MockClient`] serves canned records for tests.
//!
//! Two lookups are derived from a record fetch and come with default
//! implementations:
//!
//! - [`LiteratureApi::resolve_pdf_url`]: first `.pdf` document, else the arXiv
//!   PDF for the first eprint, else `None`
//! - [`LiteratureApi::get_formatted_metadata`]: the flattened
//!   [`FormattedMetadata`] view
//!
//! Client methods never swallow their own errors; every transport, status,
//! parse or local I/O failure is returned to the caller unchanged.

mod inspire;
pub mod mock;

pub use inspire::{InspireClient, BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use mock::MockClient;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::models::{FormattedMetadata, LiteratureRecord, SearchQuery, SearchResult};

/// Operations offered by a literature database backend
#[async_trait]
pub trait LiteratureApi: Send + Sync + std::fmt::Debug {
    /// Free-text search, one page of results
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, ClientError>;

    /// Fetch a single raw record
    async fn fetch_record(&self, record_id: &str) -> Result<LiteratureRecord, ClientError>;

    /// Stream `url` to `destination`, returning the number of bytes written.
    ///
    /// A partially written file is left in place if the transfer fails midway.
    async fn stream_download(&self, url: &str, destination: &Path) -> Result<u64, ClientError>;

    /// Find a PDF location for a record; `Ok(None)` means none is available
    async fn resolve_pdf_url(&self, record_id: &str) -> Result<Option<String>, ClientError> {
        let record = self.fetch_record(record_id).await?;
        Ok(record.metadata.pdf_url())
    }

    /// Fetch a record and flatten it
    async fn get_formatted_metadata(
        &self,
        record_id: &str,
    ) -> Result<FormattedMetadata, ClientError> {
        let record = self.fetch_record(record_id).await?;
        Ok(FormattedMetadata::from_record(record_id, &record.metadata))
    }
}

/// Errors that can occur when talking to the API
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure or non-success HTTP status
    #[error("Request to {url} failed: {reason}")]
    Request {
        url: String,
        status: Option<reqwest::StatusCode>,
        reason: String,
    },

    /// Response body was not the expected JSON
    #[error("Failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Local filesystem failure while saving a download
    #[error("IO error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured endpoint is not a usable base URL
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    pub(crate) fn transport(url: impl Into<String>, err: reqwest::Error) -> Self {
        ClientError::Request {
            url: url.into(),
            status: err.status(),
            reason: describe_transport(&err),
        }
    }

    pub(crate) fn status(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        ClientError::Request {
            url: url.into(),
            status: Some(status),
            reason: format!("server returned status {}", status),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ClientError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// HTTP status of a failed request, if the server answered at all
    pub fn http_status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ClientError::Request { status, .. } => *status,
            _ => None,
        }
    }
}

/// The reqwest message followed by its causes, marked when a timeout fired
fn describe_transport(err: &reqwest::Error) -> String {
    let mut reason = err.to_string();
    let mut cause = std::error::Error::source(err);
    while let Some(inner) = cause {
        reason.push_str(": ");
        reason.push_str(&inner.to_string());
        cause = inner.source();
    }
    if err.is_timeout() && !reason.contains("timed out") {
        reason.push_str(" (timed out)");
    }
    reason
}
