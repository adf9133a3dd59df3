//! Wire types for INSPIRE literature records and search responses.
//!
//! Every field is optional: the API omits whatever a record does not carry,
//! and absence is the normal case rather than an error.

use serde::{Deserialize, Deserializer, Serialize};

/// Base URL for arXiv PDFs
pub const ARXIV_PDF_URL: &str = "https://arxiv.org/pdf";

/// A single literature record as returned by `/literature/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiteratureRecord {
    /// Record identifier (string or number on the wire)
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub id: Option<String>,

    /// Bibliographic payload
    #[serde(default)]
    pub metadata: RecordMetadata,
}

/// The `metadata` object shared by record lookups and search hits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default)]
    pub titles: Vec<Title>,

    #[serde(default)]
    pub authors: Vec<Author>,

    #[serde(default)]
    pub abstracts: Vec<TextValue>,

    #[serde(default)]
    pub arxiv_eprints: Vec<ArxivEprint>,

    #[serde(default)]
    pub dois: Vec<TextValue>,

    #[serde(default)]
    pub keywords: Vec<TextValue>,

    #[serde(default)]
    pub documents: Vec<Document>,

    #[serde(default)]
    pub publication_info: Vec<PublicationInfo>,

    #[serde(default)]
    pub citation_count: Option<u64>,

    #[serde(default, deserialize_with = "scalar_as_string")]
    pub preprint_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Title {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Entries of the form `{"value": "..."}` (abstracts, DOIs, keywords)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArxivEprint {
    #[serde(default)]
    pub value: Option<String>,
}

/// An attached file; `key` is the stored filename
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationInfo {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub year: Option<String>,
}

impl RecordMetadata {
    /// Resolve where the full text of this record can be fetched.
    ///
    /// The first document whose key ends in `.pdf` and carries a URL wins.
    /// Otherwise the first arXiv eprint is turned into a canonical arXiv PDF
    /// link. `None` means the record simply has no PDF.
    pub fn pdf_url(&self) -> Option<String> {
        let from_documents = self
            .documents
            .iter()
            .filter(|doc| doc.key.as_deref().is_some_and(|key| key.ends_with(".pdf")))
            .find_map(|doc| doc.url.clone());

        if from_documents.is_some() {
            return from_documents;
        }

        self.first_eprint()
            .map(|arxiv_id| format!("{}/{}.pdf", ARXIV_PDF_URL, arxiv_id))
    }

    /// First arXiv identifier, if any
    pub fn first_eprint(&self) -> Option<&str> {
        self.arxiv_eprints
            .first()
            .and_then(|e| e.value.as_deref())
            .filter(|v| !v.is_empty())
    }

    /// First title text, if any
    pub fn first_title(&self) -> Option<&str> {
        self.titles.first().and_then(|t| t.title.as_deref())
    }
}

/// Body of a `/literature?q=...` search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub hits: SearchHits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHits {
    /// Total number of matching records on the server
    #[serde(default)]
    pub total: u64,

    /// The records on the requested page, in response order
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub id: Option<String>,

    #[serde(default)]
    pub metadata: RecordMetadata,
}

impl SearchResult {
    /// Total matches reported by the server
    pub fn total(&self) -> u64 {
        self.hits.total
    }

    /// Hits on this page
    pub fn hits(&self) -> &[SearchHit] {
        &self.hits.hits
    }

    pub fn is_empty(&self) -> bool {
        self.hits.hits.is_empty()
    }
}

/// Accepts either a JSON string or a JSON number and keeps it as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Number(number) => number.to_string(),
    }))
}
