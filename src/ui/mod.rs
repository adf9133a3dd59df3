//! Console output for the command-line tool.
//!
//! Formatting functions return plain strings so listings can be tested;
//! colour is only added when writing to an interactive terminal.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::models::{Author, SearchHit, SearchResult, SENTINEL};

/// Number of authors listed before the "(and N more)" suffix
pub const MAX_LISTED_AUTHORS: usize = 3;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Download,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Download => "↓",
        Status::Search => "🔍",
    }
}

/// Print a status line to stdout, with a coloured icon on terminals.
pub fn print_status(status: Status, msg: &str) {
    if !is_terminal() {
        println!("{}", msg);
        return;
    }

    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Error => println!("{} {}", icon.red().bold(), msg),
        Status::Warning => println!("{} {}", icon.yellow().bold(), msg),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
        Status::Download => println!("{} {}", icon.magenta(), msg),
        Status::Search => println!("{} {}", icon.yellow(), msg),
    }
}

/// Print an error message to stderr.
pub fn print_error(msg: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{} {}", status_icon(Status::Error).red().bold(), msg);
    } else {
        eprintln!("{}", msg);
    }
}

/// Comma-separated names of the first three authors, with a count of the rest
pub fn format_author_summary(authors: &[Author]) -> String {
    let mut names = authors
        .iter()
        .take(MAX_LISTED_AUTHORS)
        .map(|a| a.full_name.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(", ");

    if authors.len() > MAX_LISTED_AUTHORS {
        names.push_str(&format!(
            " (and {} more)",
            authors.len() - MAX_LISTED_AUTHORS
        ));
    }
    names
}

/// One numbered entry of a search listing (1-based `index`)
pub fn format_hit(index: usize, hit: &SearchHit) -> String {
    let record_id = hit.id.as_deref().unwrap_or(SENTINEL);
    let title = hit.metadata.first_title().unwrap_or(SENTINEL);

    format!(
        "{}. [{}] {}\n   Authors: {}\n",
        index,
        record_id,
        title,
        format_author_summary(&hit.metadata.authors)
    )
}

/// Full listing for a page of search results, in response order
pub fn format_search_listing(result: &SearchResult) -> String {
    if result.is_empty() {
        return "No results found.\n".to_string();
    }

    let mut out = format!(
        "\nFound {} results (showing {}):\n\n",
        result.total(),
        result.hits().len()
    );
    for (i, hit) in result.hits().iter().enumerate() {
        out.push_str(&format_hit(i + 1, hit));
        out.push('\n');
    }
    out
}

/// Get a human-readable file size.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// A spinner on stderr; indicatif hides it when stderr is not a terminal.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        let style = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");
        pb.set_style(style);
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Remove the spinner from the terminal.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}
