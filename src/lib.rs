//! # INSPIRE Downloader
//!
//! Fetch bibliographic metadata and PDFs from the INSPIRE-HEP literature
//! database, by record identifier or free-text search.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Record, search and metadata data structures
//! - [`client`]: The [`LiteratureApi`] trait and its HTTP implementation
//! - [`download`]: Operations that save PDFs and metadata to disk
//! - [`config`]: Configuration management
//! - [`ui`]: Console formatting for the command-line tool
//! - [`utils`]: HTTP client construction
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use inspire_downloader::{Downloader, InspireClient};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = Downloader::new(Arc::new(InspireClient::new()?));
//! let path = downloader
//!     .download_metadata("451647", Path::new("papers"), None, "json")
//!     .await?;
//! println!("saved {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod download;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use client::{ClientError, InspireClient, LiteratureApi};
pub use download::{DownloadError, Downloader};
pub use models::{FormattedMetadata, SearchQuery, SearchResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
