//! Basic usage example for the INSPIRE Downloader library.
//!
//! Searches the literature database, prints metadata for one record and then
//! downloads its PDF and metadata. Needs network access to inspirehep.net.

use inspire_downloader::models::{DownloadTargets, MetadataFormat, SearchQuery};
use inspire_downloader::{Downloader, InspireClient, LiteratureApi};
use std::path::Path;
use std::sync::Arc;

/// A well-known record: Maldacena, "The Large N limit of superconformal field theories"
const RECORD_ID: &str = "451647";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(InspireClient::new()?);
    let downloader = Downloader::new(client.clone());

    // Example 1: search by author
    println!("{}", "=".repeat(80));
    println!("Example 1: Searching for literature");
    println!("{}", "=".repeat(80));

    match client.search(&SearchQuery::new("author:witten").size(3)).await {
        Ok(results) => {
            println!("Found {} papers by Witten", results.total());
            println!("Showing first {} results:\n", results.hits().len());
            for (i, hit) in results.hits().iter().enumerate() {
                println!(
                    "{}. [{}] {}",
                    i + 1,
                    hit.id.as_deref().unwrap_or("N/A"),
                    hit.metadata.first_title().unwrap_or("N/A")
                );
            }
        }
        Err(e) => eprintln!("Search failed: {}", e),
    }
    println!();

    // Example 2: formatted metadata for one record
    println!("{}", "=".repeat(80));
    println!("Example 2: Getting metadata");
    println!("{}", "=".repeat(80));

    match client.get_formatted_metadata(RECORD_ID).await {
        Ok(metadata) => {
            println!("Record ID: {}", metadata.record_id);
            println!("Title: {}", metadata.title);
            let first_authors: Vec<&str> =
                metadata.authors.iter().take(3).map(String::as_str).collect();
            println!("Authors: {}", first_authors.join(", "));
            if metadata.authors.len() > 3 {
                println!("  (and {} more authors)", metadata.authors.len() - 3);
            }
            println!("Publication Date: {}", metadata.publication_date);
            println!("arXiv ID: {}", metadata.arxiv_id);
            println!("Citations: {}", metadata.citations);
        }
        Err(e) => eprintln!("Error getting metadata: {}", e),
    }
    println!();

    // Example 3: the PDF on its own
    println!("{}", "=".repeat(80));
    println!("Example 3: Downloading a PDF");
    println!("{}", "=".repeat(80));

    let output_dir = Path::new("./examples_output");
    match downloader.download_pdf(RECORD_ID, output_dir, None).await {
        Ok(path) => println!("PDF downloaded: {}", path.display()),
        Err(e) => eprintln!("PDF download failed: {}", e),
    }
    println!();

    // Example 4: PDF and metadata together; either may be missing
    println!("{}", "=".repeat(80));
    println!("Example 4: Downloading PDF and metadata");
    println!("{}", "=".repeat(80));

    let result = downloader
        .download_record(RECORD_ID, output_dir, DownloadTargets::all(), MetadataFormat::Txt)
        .await;
    match &result.pdf {
        Some(path) => println!("✓ PDF downloaded: {}", path.display()),
        None => println!("✗ PDF not available"),
    }
    match &result.metadata {
        Some(path) => println!("✓ Metadata downloaded: {}", path.display()),
        None => println!("✗ Metadata not available"),
    }

    println!("\nExamples completed!");
    Ok(())
}
