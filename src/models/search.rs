//! Search request and download outcome models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Search query parameters for `/literature`
///
/// The query string is passed to the server verbatim, so INSPIRE syntax
/// such as `author:witten` or `t supersymmetry` works as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Main search query string
    pub query: String,

    /// Number of hits per page
    pub size: usize,

    /// 1-based page number
    pub page: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            size: 10,
            page: 1,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set page size
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set page number
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

bitflags::bitflags! {
    /// Artifacts to fetch for a record
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DownloadTargets: u8 {
        const PDF = 1 << 0;
        const METADATA = 1 << 1;
    }
}

impl DownloadTargets {
    /// Derive targets from the CLI's `--pdf-only` / `--metadata-only` switches.
    ///
    /// PDF is wanted unless `metadata_only`, metadata unless `pdf_only`.
    /// Passing both yields an empty set, so nothing is downloaded.
    pub fn from_flags(pdf_only: bool, metadata_only: bool) -> Self {
        let mut targets = DownloadTargets::empty();
        if !metadata_only {
            targets |= DownloadTargets::PDF;
        }
        if !pdf_only {
            targets |= DownloadTargets::METADATA;
        }
        targets
    }
}

/// Outcome of a combined record download.
///
/// `None` marks an artifact that was not requested or could not be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResult {
    pub pdf: Option<PathBuf>,
    pub metadata: Option<PathBuf>,
}

impl DownloadResult {
    /// Whether every requested artifact was saved
    pub fn is_complete(&self, targets: DownloadTargets) -> bool {
        (!targets.contains(DownloadTargets::PDF) || self.pdf.is_some())
            && (!targets.contains(DownloadTargets::METADATA) || self.metadata.is_some())
    }
}
