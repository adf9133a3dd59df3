//! Core data models for literature records, metadata and search operations.

mod metadata;
mod record;
mod search;

pub use metadata::{FormattedMetadata, MetadataFormat, INSPIRE_LITERATURE_URL, SENTINEL};
pub use record::{
    ArxivEprint, Author, Document, LiteratureRecord, PublicationInfo, RecordMetadata,
    SearchHit, SearchHits, SearchResult, TextValue, Title, ARXIV_PDF_URL,
};
pub use search::{DownloadResult, DownloadTargets, SearchQuery};
