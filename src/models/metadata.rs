//! Flattened record metadata and its on-disk renderings.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

use super::record::RecordMetadata;

/// Placeholder for textual fields the record does not carry
pub const SENTINEL: &str = "N/A";

/// Public landing page for a literature record
pub const INSPIRE_LITERATURE_URL: &str = "https://inspirehep.net/literature";

/// The flat, defaulted projection of a literature record.
///
/// Textual scalars are never empty: they hold either real content or
/// [`SENTINEL`]. `citations` is numeric and defaults to `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedMetadata {
    pub record_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub r#abstract: String,
    pub publication_date: String,
    pub arxiv_id: String,
    pub doi: String,
    pub citations: u64,
    pub keywords: Vec<String>,
    pub inspire_url: String,
}

impl FormattedMetadata {
    /// Flatten raw record metadata for `record_id`
    pub fn from_record(record_id: &str, metadata: &RecordMetadata) -> Self {
        let authors = metadata
            .authors
            .iter()
            .map(|author| or_sentinel(author.full_name.as_deref()))
            .collect();

        let publication_date = metadata
            .preprint_date
            .as_deref()
            .filter(|date| !date.is_empty())
            .or_else(|| {
                metadata
                    .publication_info
                    .first()
                    .and_then(|info| info.year.as_deref())
            });

        let keywords = metadata
            .keywords
            .iter()
            .filter_map(|kw| kw.value.as_deref())
            .filter(|kw| !kw.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            record_id: record_id.to_string(),
            title: or_sentinel(metadata.first_title()),
            authors,
            r#abstract: or_sentinel(metadata.abstracts.first().and_then(|a| a.value.as_deref())),
            publication_date: or_sentinel(publication_date),
            arxiv_id: or_sentinel(metadata.arxiv_eprints.first().and_then(|e| e.value.as_deref())),
            doi: or_sentinel(metadata.dois.first().and_then(|d| d.value.as_deref())),
            citations: metadata.citation_count.unwrap_or(0),
            keywords,
            inspire_url: format!("{}/{}", INSPIRE_LITERATURE_URL, record_id),
        }
    }

    /// Pretty JSON with two-space indentation; non-ASCII is kept literal.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report used for `.txt` metadata files
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "INSPIRE-HEP Record: {}", self.record_id);
        let _ = writeln!(out, "{}\n", "=".repeat(80));
        let _ = writeln!(out, "Title: {}\n", self.title);
        let _ = writeln!(out, "Authors: {}\n", self.authors.join(", "));
        let _ = writeln!(out, "Publication Date: {}", self.publication_date);
        let _ = writeln!(out, "arXiv ID: {}", self.arxiv_id);
        let _ = writeln!(out, "DOI: {}", self.doi);
        let _ = writeln!(out, "Citations: {}", self.citations);
        let _ = writeln!(out, "INSPIRE URL: {}\n", self.inspire_url);
        if !self.keywords.is_empty() {
            let _ = writeln!(out, "Keywords: {}\n", self.keywords.join(", "));
        }
        let _ = writeln!(out, "Abstract:\n{}", self.r#abstract);

        out
    }

    /// Render in the requested on-disk format
    pub fn render(&self, format: MetadataFormat) -> Result<String, serde_json::Error> {
        match format {
            MetadataFormat::Json => self.to_json(),
            MetadataFormat::Txt => Ok(self.to_text()),
        }
    }
}

fn or_sentinel(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => SENTINEL.to_string(),
    }
}

/// Supported metadata file formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetadataFormat {
    #[default]
    Json,
    Txt,
}

impl MetadataFormat {
    /// File extension and CLI spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataFormat::Json => "json",
            MetadataFormat::Txt => "txt",
        }
    }
}

impl std::fmt::Display for MetadataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(MetadataFormat::Json),
            "txt" => Ok(MetadataFormat::Txt),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_metadata() -> RecordMetadata {
        serde_json::from_value(json!({
            "titles": [{"title": "Test Paper"}, {"title": "Ignored"}],
            "authors": [{"full_name": "Doe, John"}, {}, {"full_name": "Müller, Anna"}],
            "abstracts": [{"value": "Test abstract"}],
            "preprint_date": "2023-01-15",
            "publication_info": [{"year": 2024}],
            "arxiv_eprints": [{"value": "1234.5678"}],
            "dois": [{"value": "10.1234/test"}],
            "citation_count": 10,
            "keywords": [{"value": "test"}, {"schema": "INSPIRE"}, {"value": "qcd"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_from_record_full() {
        let meta = FormattedMetadata::from_record("12345", &full_metadata());

        assert_eq!(meta.record_id, "12345");
        assert_eq!(meta.title, "Test Paper");
        assert_eq!(meta.authors, vec!["Doe, John", "N/A", "Müller, Anna"]);
        assert_eq!(meta.r#abstract, "Test abstract");
        assert_eq!(meta.publication_date, "2023-01-15");
        assert_eq!(meta.arxiv_id, "1234.5678");
        assert_eq!(meta.doi, "10.1234/test");
        assert_eq!(meta.citations, 10);
        assert_eq!(meta.keywords, vec!["test", "qcd"]);
        assert_eq!(meta.inspire_url, "https://inspirehep.net/literature/12345");
    }

    #[test]
    fn test_from_record_empty_uses_sentinels() {
        let meta = FormattedMetadata::from_record("7", &RecordMetadata::default());

        assert_eq!(meta.title, SENTINEL);
        assert_eq!(meta.r#abstract, SENTINEL);
        assert_eq!(meta.publication_date, SENTINEL);
        assert_eq!(meta.arxiv_id, SENTINEL);
        assert_eq!(meta.doi, SENTINEL);
        assert_eq!(meta.citations, 0);
        assert!(meta.authors.is_empty());
        assert!(meta.keywords.is_empty());
    }

    #[test]
    fn test_citations_serialize_as_number() {
        let meta = FormattedMetadata::from_record("7", &RecordMetadata::default());
        let value: serde_json::Value = serde_json::from_str(&meta.to_json().unwrap()).unwrap();

        assert!(value["citations"].is_u64());
        assert_eq!(value["citations"], json!(0));
        assert!(value["title"].is_string());
        assert!(value["authors"].is_array());
    }

    #[test]
    fn test_publication_date_falls_back_to_year() {
        let meta: RecordMetadata = serde_json::from_value(json!({
            "preprint_date": "",
            "publication_info": [{"year": 1998}, {"year": 2001}]
        }))
        .unwrap();

        let formatted = FormattedMetadata::from_record("1", &meta);
        assert_eq!(formatted.publication_date, "1998");
    }

    #[test]
    fn test_empty_strings_become_sentinel() {
        let meta: RecordMetadata = serde_json::from_value(json!({
            "titles": [{"title": ""}],
            "dois": [{}]
        }))
        .unwrap();

        let formatted = FormattedMetadata::from_record("1", &meta);
        assert_eq!(formatted.title, SENTINEL);
        assert_eq!(formatted.doi, SENTINEL);
    }

    #[test]
    fn test_json_keeps_non_ascii_and_indent() {
        let meta = FormattedMetadata::from_record("12345", &full_metadata());
        let text = meta.to_json().unwrap();

        assert!(text.contains("Müller"));
        assert!(text.contains("\n  \"record_id\": \"12345\""));
    }

    #[test]
    fn test_json_field_order() {
        let meta = FormattedMetadata::from_record("12345", &full_metadata());
        let text = meta.to_json().unwrap();

        let order = [
            "\"record_id\"",
            "\"title\"",
            "\"authors\"",
            "\"abstract\"",
            "\"publication_date\"",
            "\"arxiv_id\"",
            "\"doi\"",
            "\"citations\"",
            "\"keywords\"",
            "\"inspire_url\"",
        ];
        let positions: Vec<usize> = order.iter().map(|k| text.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_text_template() {
        let meta = FormattedMetadata::from_record("12345", &full_metadata());
        let text = meta.to_text();

        let expected = format!(
            "INSPIRE-HEP Record: 12345\n{}\n\n\
             Title: Test Paper\n\n\
             Authors: Doe, John, N/A, Müller, Anna\n\n\
             Publication Date: 2023-01-15\n\
             arXiv ID: 1234.5678\n\
             DOI: 10.1234/test\n\
             Citations: 10\n\
             INSPIRE URL: https://inspirehep.net/literature/12345\n\n\
             Keywords: test, qcd\n\n\
             Abstract:\nTest abstract\n",
            "=".repeat(80)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_text_template_omits_empty_keywords() {
        let meta = FormattedMetadata::from_record("9", &RecordMetadata::default());
        let text = meta.to_text();

        assert!(!text.contains("Keywords:"));
        assert!(text.contains("INSPIRE URL: https://inspirehep.net/literature/9\n\nAbstract:\nN/A\n"));
    }

    #[test]
    fn test_metadata_format_parse() {
        assert_eq!("json".parse::<MetadataFormat>(), Ok(MetadataFormat::Json));
        assert_eq!("txt".parse::<MetadataFormat>(), Ok(MetadataFormat::Txt));
        assert_eq!("xml".parse::<MetadataFormat>(), Err("xml".to_string()));
        assert_eq!("JSON".parse::<MetadataFormat>(), Err("JSON".to_string()));
        assert_eq!(MetadataFormat::default().to_string(), "json");
    }
}
