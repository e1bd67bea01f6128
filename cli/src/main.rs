//! Command-line front end for the text-search API.
//!
//! Each subcommand maps to one client operation and prints the payload as
//! pretty JSON (plain text for `ping`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use search_client_core::{ClientConfig, DocId, SearchClient, UploadFile};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "search-cli")]
#[command(about = "Upload, list, delete, and search documents on a text-search backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the API, including any mount prefix
    /// [default: $TEXT_SEARCH_API_URL or http://localhost:8000/api]
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Abort requests that take longer than this many seconds
    /// [default: $TEXT_SEARCH_TIMEOUT_SECS, otherwise no limit]
    #[arg(long, global = true, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Upload text files; each document is named after its file
    Upload {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// List uploaded documents
    List,
    /// Delete one document by id
    Delete { id: DocId },
    /// Delete every document
    DeleteAll,
    /// Count occurrences of each word across documents
    Search {
        #[arg(required = true, value_name = "WORD")]
        words: Vec<String>,
    },
    /// Show document and word totals
    Stats,
    /// Check that the backend is reachable
    Ping,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let client = SearchClient::new(client_config(&cli, ClientConfig::from_env()?));
    debug!(base_url = client.config().base_url(), "client configured");

    match cli.command {
        Commands::Upload { files } => {
            let files = read_upload_files(&files)?;
            print_json(&client.upload_documents(&files)?)
        }
        Commands::List => print_json(&client.list_documents()?),
        Commands::Delete { id } => print_json(&client.delete_document(id)?),
        Commands::DeleteAll => print_json(&client.delete_all_documents()?),
        Commands::Search { words } => print_json(&client.search(&words)?),
        Commands::Stats => print_json(&client.stats()?),
        Commands::Ping => {
            println!("{}", client.hello()?);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("search_client_core={level},search_cli={level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Flags override the environment-derived `fallback`.
fn client_config(cli: &Cli, fallback: ClientConfig) -> ClientConfig {
    let config = match &cli.base_url {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::new(fallback.base_url()),
    };
    match cli.timeout_secs.map(Duration::from_secs).or(fallback.timeout()) {
        Some(timeout) => config.with_timeout(timeout),
        None => config,
    }
}

/// Read each path as UTF-8 text, naming the document after the file.
fn read_upload_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    paths.iter().map(|path| read_upload_file(path)).collect()
}

fn read_upload_file(path: &Path) -> Result<UploadFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("{} has no usable file name", path.display()))?
        .to_string();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(UploadFile { name, content })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
