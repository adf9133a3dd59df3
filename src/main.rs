use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use inspire_downloader::config::{
    find_config_file, get_config, load_config, Config, DownloadConfig,
};
use inspire_downloader::models::{DownloadTargets, MetadataFormat, SearchQuery};
use inspire_downloader::ui::{self, Status};
use inspire_downloader::{DownloadError, Downloader, LiteratureApi};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EXAMPLES: &str = "\
Examples:
  # Download both PDF and metadata for a record
  inspire-download 12345

  # Download only PDF
  inspire-download 12345 --pdf-only

  # Download only metadata
  inspire-download 12345 --metadata-only

  # Download to a specific directory
  inspire-download 12345 --output-dir /path/to/dir

  # Save metadata as text file
  inspire-download 12345 --format txt

  # Search for records
  inspire-download --search \"author:witten\" --size 5";

/// Download PDFs and metadata from inspirehep.net
#[derive(Parser, Debug)]
#[command(name = "inspire-download")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Download PDFs and metadata from inspirehep.net", long_about = None)]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// INSPIRE-HEP record ID
    record_id: Option<String>,

    /// Output directory for downloaded files (default: current directory)
    #[arg(long, short)]
    output_dir: Option<PathBuf>,

    /// Download only the PDF
    #[arg(long)]
    pdf_only: bool,

    /// Download only the metadata
    #[arg(long)]
    metadata_only: bool,

    /// Metadata format (default: json)
    #[arg(long, short, value_parser = ["json", "txt"])]
    format: Option<String>,

    /// Search query instead of record ID (e.g., 'author:witten')
    #[arg(long, short)]
    search: Option<String>,

    /// Number of search results to display
    #[arg(long, default_value_t = 10)]
    size: usize,

    /// Page of search results to display
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Request timeout in seconds (default: 30)
    #[arg(long)]
    timeout: Option<u64>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging (can be used multiple times: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short)]
    quiet: bool,
}

/// Exit status for any handled failure, including a missing record id
const EXIT_FAILURE: u8 = 1;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            ui::print_error(&format!("Error: {:#}", e));
            return ExitCode::FAILURE;
        }
    };

    let downloader = match Downloader::from_config(&config.client) {
        Ok(downloader) => downloader,
        Err(e) => {
            ui::print_error(&format!("Error: {}", e));
            return ExitCode::FAILURE;
        }
    };

    ExitCode::from(run(&cli, &downloader, &config.downloads).await)
}

/// Dispatch to search or download mode and return the exit status
async fn run(cli: &Cli, downloader: &Downloader, defaults: &DownloadConfig) -> u8 {
    // Handle search mode
    if let Some(query) = &cli.search {
        let query = SearchQuery::new(query).size(cli.size).page(cli.page);
        return match run_search(downloader.client().as_ref(), &query).await {
            Ok(()) => 0,
            Err(e) => {
                ui::print_error(&format!("Error during search: {}", e));
                EXIT_FAILURE
            }
        };
    }

    // Handle download mode
    let Some(record_id) = cli.record_id.as_deref() else {
        let _ = Cli::command().print_help();
        return EXIT_FAILURE;
    };

    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| defaults.output_dir.clone());
    let format = cli
        .format
        .clone()
        .unwrap_or_else(|| defaults.format.clone());
    let targets = DownloadTargets::from_flags(cli.pdf_only, cli.metadata_only);

    match run_download(downloader, record_id, &output_dir, &format, targets).await {
        Ok(()) => 0,
        Err(e) => {
            ui::print_error(&format!("Error: {:#}", e));
            EXIT_FAILURE
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let level = if quiet { "error" } else { level };

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!("inspire_downloader={level},inspire_download={level}")
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Defaults, then config file and environment, then command-line flags
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(path) = &cli.config {
        load_config(path).with_context(|| format!("loading {}", path.display()))?
    } else if let Some(path) = find_config_file() {
        tracing::info!("Using config file: {}", path.display());
        load_config(&path).with_context(|| format!("loading {}", path.display()))?
    } else {
        get_config().context("reading environment configuration")?
    };

    if let Some(timeout) = cli.timeout {
        config.client.timeout_secs = timeout;
    }
    Ok(config)
}

async fn run_search(client: &dyn LiteratureApi, query: &SearchQuery) -> Result<()> {
    ui::print_status(Status::Search, &format!("Searching for: {}", query.query));
    let result = client.search(query).await?;
    print!("{}", ui::format_search_listing(&result));
    Ok(())
}

async fn run_download(
    downloader: &Downloader,
    record_id: &str,
    output_dir: &Path,
    format: &str,
    targets: DownloadTargets,
) -> Result<()> {
    if targets == DownloadTargets::METADATA {
        ui::print_status(
            Status::Info,
            &format!("Fetching metadata for record {}...", record_id),
        );
        let path = downloader
            .download_metadata(record_id, output_dir, None, format)
            .await?;
        ui::print_status(
            Status::Success,
            &format!("Metadata saved to {}", path.display()),
        );
    } else if targets == DownloadTargets::PDF {
        let path = download_pdf(downloader, record_id, output_dir).await?;
        report_pdf(&path).await;
    } else if targets.is_empty() {
        // --pdf-only together with --metadata-only selects nothing.
        tracing::debug!(record_id, "no artifacts selected");
    } else {
        let format: MetadataFormat = format.parse().map_err(DownloadError::UnsupportedFormat)?;

        ui::print_status(Status::Info, &format!("Downloading record {}...", record_id));
        let spinner = ui::Spinner::new(&format!("Fetching record {}", record_id));
        let result = downloader
            .download_record(record_id, output_dir, targets, format)
            .await;
        spinner.finish();

        match &result.metadata {
            Some(path) => ui::print_status(
                Status::Success,
                &format!("Metadata saved to {}", path.display()),
            ),
            None => ui::print_status(Status::Warning, "Metadata not available"),
        }
        match &result.pdf {
            Some(path) => report_pdf(path).await,
            None => ui::print_status(Status::Warning, "PDF not available"),
        }
        if !result.is_complete(targets) {
            tracing::warn!(record_id, "record was only partially downloaded");
        }
    }

    Ok(())
}

async fn download_pdf(
    downloader: &Downloader,
    record_id: &str,
    output_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    ui::print_status(
        Status::Download,
        &format!("Downloading PDF for record {}...", record_id),
    );
    let spinner = ui::Spinner::new("Downloading PDF");
    let result = downloader.download_pdf(record_id, output_dir, None).await;
    spinner.finish();
    result
}

async fn report_pdf(path: &Path) {
    let size = tokio::fs::metadata(path)
        .await
        .map(|m| format!(" ({})", ui::format_file_size(m.len())))
        .unwrap_or_default();
    ui::print_status(
        Status::Success,
        &format!("PDF saved to {}{}", path.display(), size),
    );
}
