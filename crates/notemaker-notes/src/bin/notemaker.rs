//! notemaker: inspect stored notes and clean up the media they own.
//!
//! Each command reads a note document (JSON with `content` and optional
//! `attachments`) and prints its result as JSON on stdout. Logs go to
//! stderr, or to `LOG_FILE` when set.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notemaker_assets::{CloudinaryAssetStore, InMemoryAssetStore};
use notemaker_core::{collect_references, defaults, preview, purge, AssetStore, NoteInput, PurgeOptions};

#[derive(Parser)]
#[command(name = "notemaker")]
#[command(author, version, about = "Media reference tools for notemaker notes")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the deduplicated remote assets a note owns
    Refs {
        /// Note document (JSON)
        note: PathBuf,
    },

    /// Delete the remote assets a note owns
    Purge {
        /// Note document (JSON)
        note: PathBuf,

        /// Record deletions in memory instead of calling the asset store
        #[arg(long)]
        dry_run: bool,

        /// Maximum delete calls in flight
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        concurrency: Option<u64>,

        /// Deadline for each delete call, in seconds
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout_secs: Option<u64>,
    },

    /// Print the list-view preview of a note
    Preview {
        /// Note document (JSON)
        note: PathBuf,

        /// Maximum preview length in characters
        #[arg(short, long, default_value_t = defaults::PREVIEW_LENGTH)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing from the environment.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, daily rotation)
///   RUST_LOG    - standard env filter (default: "notemaker=info")
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "notemaker=info,notemaker_core=info,notemaker_assets=info,notemaker_notes=info".into()
    });
    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = log_file {
        let file_dir = Path::new(path).parent().unwrap_or(Path::new("."));
        let file_name = Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("notemaker.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(non_blocking),
                )
                .init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        None
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Refs { note } => {
            let note = load_note(&note)?;
            let refs = collect_references(&note.content, &note.attachments);
            println!("{}", serde_json::to_string_pretty(&refs)?);
        }
        Commands::Purge {
            note,
            dry_run,
            concurrency,
            timeout_secs,
        } => {
            let note = load_note(&note)?;
            let mut options = PurgeOptions::from_env();
            if let Some(n) = concurrency {
                options.concurrency = n as usize;
            }
            if let Some(secs) = timeout_secs {
                options.call_timeout = Duration::from_secs(secs);
            }

            let store: Arc<dyn AssetStore> = if dry_run {
                Arc::new(InMemoryAssetStore::new())
            } else {
                Arc::new(CloudinaryAssetStore::from_env().context("asset store configuration")?)
            };

            let refs = collect_references(&note.content, &note.attachments);
            info!(reference_count = refs.len(), dry_run, "Purging note assets");
            let report = purge(&refs, store.as_ref(), &options).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Preview { note, limit } => {
            let note = load_note(&note)?;
            println!("{}", preview(&note.content, limit));
        }
    }
    Ok(())
}

fn load_note(path: &Path) -> anyhow::Result<NoteInput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
