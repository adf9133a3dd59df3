//! Mock client for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::client::{ClientError, LiteratureApi};
use crate::models::{LiteratureRecord, SearchQuery, SearchResult};

/// Bytes written by [`MockClient::stream_download`] unless overridden
pub const MOCK_PDF_BYTES: &[u8] = b"%PDF-1.4\n% mock document\n";

/// A mock client that serves predefined records and counts every call.
#[derive(Debug, Default)]
pub struct MockClient {
    records: Mutex<HashMap<String, LiteratureRecord>>,
    search_response: Mutex<Option<SearchResult>>,
    downloads: Mutex<Vec<(String, PathBuf)>>,
    calls: AtomicUsize,
}

impl MockClient {
    /// Create a new mock client with no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `record` for `record_id`.
    pub fn insert_record(&self, record_id: &str, record: LiteratureRecord) {
        let mut guard = self.records.lock().unwrap();
        guard.insert(record_id.to_string(), record);
    }

    /// Serve a record given as raw API JSON.
    pub fn insert_json(
        &self,
        record_id: &str,
        record: serde_json::Value,
    ) -> Result<(), serde_json::Error> {
        let record = serde_json::from_value(record)?;
        self.insert_record(record_id, record);
        Ok(())
    }

    /// Set the search response to return.
    pub fn set_search_response(&self, response: SearchResult) {
        let mut guard = self.search_response.lock().unwrap();
        *guard = Some(response);
    }

    /// Total number of API calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URL and destination of every download performed.
    pub fn downloads(&self) -> Vec<(String, PathBuf)> {
        self.downloads.lock().unwrap().clone()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LiteratureApi for MockClient {
    async fn search(&self, _query: &SearchQuery) -> Result<SearchResult, ClientError> {
        self.record_call();
        let guard = self.search_response.lock().unwrap();
        Ok(guard.clone().unwrap_or_default())
    }

    async fn fetch_record(&self, record_id: &str) -> Result<LiteratureRecord, ClientError> {
        self.record_call();
        let guard = self.records.lock().unwrap();
        guard.get(record_id).cloned().ok_or_else(|| {
            ClientError::status(
                format!("mock://literature/{}", record_id),
                reqwest::StatusCode::NOT_FOUND,
            )
        })
    }

    async fn stream_download(&self, url: &str, destination: &Path) -> Result<u64, ClientError> {
        self.record_call();
        tokio::fs::write(destination, MOCK_PDF_BYTES)
            .await
            .map_err(|e| ClientError::io(destination, e))?;

        self.downloads
            .lock()
            .unwrap()
            .push((url.to_string(), destination.to_path_buf()));
        Ok(MOCK_PDF_BYTES.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_record_is_not_found() {
        let client = MockClient::new();
        let err = client.fetch_record("missing").await.unwrap_err();
        assert_eq!(err.http_status(), Some(reqwest::StatusCode::NOT_FOUND));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_serves_inserted_record() {
        let client = MockClient::new();
        client
            .insert_json("1", json!({"id": "1", "metadata": {"titles": [{"title": "T"}]}}))
            .unwrap();

        let record = client.fetch_record("1").await.unwrap();
        assert_eq!(record.metadata.first_title(), Some("T"));
    }

    #[tokio::test]
    async fn test_default_search_is_empty() {
        let client = MockClient::new();
        let result = client.search(&SearchQuery::new("anything")).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total(), 0);
    }
}
