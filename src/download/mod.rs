//! Download operations: turn API lookups into files on disk.
//!
//! [`Downloader`] wraps any [`LiteratureApi`] and produces:
//!
//! - `{id}.pdf` via [`Downloader::download_pdf`]
//! - `{id}_metadata.{json,txt}` via [`Downloader::download_metadata`]
//! - both via [`Downloader::download_record`], which tolerates one of them failing
//!
//! Output directories are created on demand. Existing files are overwritten.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::client::{ClientError, InspireClient, LiteratureApi};
use crate::config::ClientConfig;
use crate::models::{DownloadResult, DownloadTargets, MetadataFormat};

/// Errors raised by download operations
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The record has neither a PDF document nor an arXiv eprint
    #[error("No PDF available for record {record_id}")]
    NoPdfAvailable { record_id: String },

    /// Metadata format outside `json` / `txt`
    #[error("Unsupported format: {0}. Use 'json' or 'txt'")]
    UnsupportedFormat(String),

    /// Failure reported by the API client
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Local filesystem failure
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata could not be encoded as JSON
    #[error("Failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DownloadError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        DownloadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Default PDF filename for a record
pub fn pdf_filename(record_id: &str) -> String {
    format!("{}.pdf", record_id)
}

/// Default metadata filename for a record
pub fn metadata_filename(record_id: &str, format: MetadataFormat) -> String {
    format!("{}_metadata.{}", record_id, format)
}

/// Orchestrates the API client to save PDFs and metadata
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Arc<dyn LiteratureApi>,
}

impl Downloader {
    /// Create a downloader over any API implementation
    pub fn new(client: Arc<dyn LiteratureApi>) -> Self {
        Self { client }
    }

    /// Create a downloader backed by [`InspireClient`]
    pub fn from_config(config: &ClientConfig) -> Result<Self, DownloadError> {
        let client = InspireClient::from_config(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// The underlying API client
    pub fn client(&self) -> &Arc<dyn LiteratureApi> {
        &self.client
    }

    /// Download the PDF for a record.
    ///
    /// Fails with [`DownloadError::NoPdfAvailable`] before touching the
    /// filesystem when the record has no resolvable PDF.
    pub async fn download_pdf(
        &self,
        record_id: &str,
        output_dir: &Path,
        filename: Option<&str>,
    ) -> Result<PathBuf, DownloadError> {
        let pdf_url = self
            .client
            .resolve_pdf_url(record_id)
            .await?
            .ok_or_else(|| DownloadError::NoPdfAvailable {
                record_id: record_id.to_string(),
            })?;

        ensure_dir(output_dir).await?;

        let output_path = match filename {
            Some(name) => output_dir.join(name),
            None => output_dir.join(pdf_filename(record_id)),
        };

        tracing::info!(record_id, url = %pdf_url, "Downloading PDF");
        let bytes = self.client.stream_download(&pdf_url, &output_path).await?;
        tracing::info!(path = %output_path.display(), bytes, "PDF saved");

        Ok(output_path)
    }

    /// Download formatted metadata for a record.
    ///
    /// `format` must be `json` or `txt`; anything else fails with
    /// [`DownloadError::UnsupportedFormat`] before any request is made.
    pub async fn download_metadata(
        &self,
        record_id: &str,
        output_dir: &Path,
        filename: Option<&str>,
        format: &str,
    ) -> Result<PathBuf, DownloadError> {
        let format: MetadataFormat = format.parse().map_err(DownloadError::UnsupportedFormat)?;
        self.save_metadata(record_id, output_dir, filename, format)
            .await
    }

    async fn save_metadata(
        &self,
        record_id: &str,
        output_dir: &Path,
        filename: Option<&str>,
        format: MetadataFormat,
    ) -> Result<PathBuf, DownloadError> {
        tracing::info!(record_id, "Fetching metadata");
        let metadata = self.client.get_formatted_metadata(record_id).await?;

        ensure_dir(output_dir).await?;

        let output_path = match filename {
            Some(name) => output_dir.join(name),
            None => output_dir.join(metadata_filename(record_id, format)),
        };

        let contents = metadata.render(format)?;
        tokio::fs::write(&output_path, contents)
            .await
            .map_err(|e| DownloadError::io(&output_path, e))?;

        tracing::info!(path = %output_path.display(), %format, "Metadata saved");
        Ok(output_path)
    }

    /// Download the requested artifacts for a record.
    ///
    /// Metadata is fetched first, then the PDF. A failure in one is logged
    /// and recorded as `None` without stopping the other.
    pub async fn download_record(
        &self,
        record_id: &str,
        output_dir: &Path,
        targets: DownloadTargets,
        format: MetadataFormat,
    ) -> DownloadResult {
        let mut result = DownloadResult::default();

        if targets.contains(DownloadTargets::METADATA) {
            match self
                .save_metadata(record_id, output_dir, None, format)
                .await
            {
                Ok(path) => result.metadata = Some(path),
                Err(e) => tracing::warn!(record_id, "Could not download metadata: {}", e),
            }
        }

        if targets.contains(DownloadTargets::PDF) {
            match self.download_pdf(record_id, output_dir, None).await {
                Ok(path) => result.pdf = Some(path),
                Err(e) => tracing::warn!(record_id, "Could not download PDF: {}", e),
            }
        }

        result
    }
}

async fn ensure_dir(dir: &Path) -> Result<(), DownloadError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| DownloadError::io(dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{MockClient, MOCK_PDF_BYTES};
    use crate::models::FormattedMetadata;
    use serde_json::json;

    fn mock_with_record(record: serde_json::Value) -> Arc<MockClient> {
        let client = Arc::new(MockClient::new());
        client.insert_json("12345", record).unwrap();
        client
    }

    fn paper_record() -> serde_json::Value {
        json!({
            "metadata": {
                "titles": [{"title": "Test Paper"}],
                "authors": [{"full_name": "John Doe"}],
                "abstracts": [{"value": "Test abstract"}],
                "preprint_date": "2023",
                "arxiv_eprints": [{"value": "1234.5678"}],
                "dois": [{"value": "10.1234/test"}],
                "citation_count": 10,
                "keywords": [{"value": "test"}]
            }
        })
    }

    #[test]
    fn test_default_filenames() {
        assert_eq!(pdf_filename("12345"), "12345.pdf");
        assert_eq!(
            metadata_filename("12345", MetadataFormat::Json),
            "12345_metadata.json"
        );
        assert_eq!(
            metadata_filename("12345", MetadataFormat::Txt),
            "12345_metadata.txt"
        );
    }

    #[tokio::test]
    async fn test_download_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let client = mock_with_record(paper_record());
        let downloader = Downloader::new(client.clone());

        let path = downloader
            .download_pdf("12345", dir.path(), None)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("12345.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), MOCK_PDF_BYTES);
        assert_eq!(
            client.downloads()[0].0,
            "https://arxiv.org/pdf/1234.5678.pdf"
        );
    }

    #[tokio::test]
    async fn test_download_pdf_custom_name_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let downloader = Downloader::new(mock_with_record(paper_record()));

        let path = downloader
            .download_pdf("12345", &nested, Some("paper.pdf"))
            .await
            .unwrap();

        assert_eq!(path, nested.join("paper.pdf"));
        assert!(path.is_file());
    }

    #[tokio::test]
    async fn test_download_pdf_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never-created");
        let client = mock_with_record(json!({"metadata": {"documents": [], "arxiv_eprints": []}}));
        let downloader = Downloader::new(client.clone());

        let err = downloader
            .download_pdf("12345", &out, None)
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::NoPdfAvailable { ref record_id } if record_id == "12345"));
        assert!(!out.exists());
        assert!(client.downloads().is_empty());
    }

    #[tokio::test]
    async fn test_download_metadata_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let client = mock_with_record(paper_record());
        let downloader = Downloader::new(client.clone());

        let path = downloader
            .download_metadata("12345", dir.path(), None, "json")
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("12345_metadata.json"));

        let expected = client.get_formatted_metadata("12345").await.unwrap();
        let written: FormattedMetadata =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, expected);
    }

    #[tokio::test]
    async fn test_download_metadata_txt() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(mock_with_record(paper_record()));

        let path = downloader
            .download_metadata("12345", dir.path(), Some("notes.txt"), "txt")
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("INSPIRE-HEP Record: 12345\n"));
        assert!(content.contains("Title: Test Paper"));
        assert!(content.contains("Authors: John Doe"));
        assert!(content.contains("Keywords: test"));
    }

    #[tokio::test]
    async fn test_download_metadata_rejects_format_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockClient::new());
        let downloader = Downloader::new(client.clone());

        let err = downloader
            .download_metadata("12345", dir.path(), None, "xml")
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::UnsupportedFormat(ref f) if f == "xml"));
        assert_eq!(client.call_count(), 0);
        assert!(err.to_string().contains("Unsupported format: xml"));
    }

    #[tokio::test]
    async fn test_download_record_both() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(mock_with_record(paper_record()));

        let result = downloader
            .download_record("12345", dir.path(), DownloadTargets::all(), MetadataFormat::Json)
            .await;

        assert_eq!(result.pdf, Some(dir.path().join("12345.pdf")));
        assert_eq!(result.metadata, Some(dir.path().join("12345_metadata.json")));
        assert!(result.is_complete(DownloadTargets::all()));
    }

    #[tokio::test]
    async fn test_download_record_pdf_missing_keeps_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let client = mock_with_record(json!({"metadata": {"titles": [{"title": "No PDF"}]}}));
        let downloader = Downloader::new(client);

        let result = downloader
            .download_record("12345", dir.path(), DownloadTargets::all(), MetadataFormat::Txt)
            .await;

        assert_eq!(result.pdf, None);
        assert_eq!(result.metadata, Some(dir.path().join("12345_metadata.txt")));
    }

    #[tokio::test]
    async fn test_download_record_unknown_record() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(Arc::new(MockClient::new()));

        let result = downloader
            .download_record("404", dir.path(), DownloadTargets::all(), MetadataFormat::Json)
            .await;

        assert_eq!(result, DownloadResult::default());
    }

    #[tokio::test]
    async fn test_download_record_respects_targets() {
        let dir = tempfile::tempdir().unwrap();
        let client = mock_with_record(paper_record());
        let downloader = Downloader::new(client.clone());

        let result = downloader
            .download_record("12345", dir.path(), DownloadTargets::METADATA, MetadataFormat::Json)
            .await;
        assert!(result.pdf.is_none());
        assert!(result.metadata.is_some());
        assert!(client.downloads().is_empty());

        let before = client.call_count();
        let result = downloader
            .download_record("12345", dir.path(), DownloadTargets::empty(), MetadataFormat::Json)
            .await;
        assert_eq!(result, DownloadResult::default());
        assert_eq!(client.call_count(), before);
    }
}
