//! # Aacify - Remote Audio Migration CLI
//!
//! A simple, concurrent CLI tool that migrates remote episode audio from
//! .mp3 to AAC (.m4a): download from an S3-compatible store, transcode with
//! FFmpeg, re-upload, and patch the episode record.
//!
//! ## Features
//!
//! - **Bounded Concurrency**: A fixed-size worker pool drains a shared queue
//! - **Per-Item Isolation**: One episode's failure never aborts the batch
//! - **Scoped Workspaces**: Temporary files are removed on every exit path
//! - **All-or-Nothing Records**: An episode's record is only updated after
//!   every branch of its migration succeeded
//! - **Configurable**: Store and record credentials via environment variables
//!
//! ## Usage
//!
//! ```bash
//! # List the episodes a run would migrate
//! aacify plan --language de
//!
//! # Migrate all matching episodes with 5 workers
//! aacify run --language de --concurrency 5
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod ffmpeg;
mod item;
mod pipeline;
mod records;
mod store;
mod worker;

use commands::{plan::PlanCommand, run::RunCommand};

/// Aacify - A simple, concurrent remote-audio migration CLI
#[derive(Parser)]
#[command(
    name = "aacify",
    about = "A simple, concurrent remote-audio migration CLI tool",
    long_about = "Migrates remote episode audio from .mp3 to AAC: download, transcode with FFmpeg, re-upload, and update the episode record.",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Migrate every episode matching the candidate filter
    Run {
        /// Target language tag episodes must carry
        #[arg(long, short = 'l', env = "TARGET_LANGUAGE", default_value = "de")]
        language: String,
        /// Destination namespace for transcoded objects
        #[arg(long, short = 'n', env = "DEST_NAMESPACE", default_value = "de-episodes-audio")]
        namespace: String,
        /// Number of concurrent workers
        #[arg(long, short = 'c', env = "CONCURRENCY", default_value_t = 5)]
        concurrency: usize,
        /// Parent directory for temporary workspaces (defaults to the system temp dir)
        #[arg(long, short = 'w', env = "WORK_DIR")]
        work_dir: Option<PathBuf>,
    },
    /// List the episodes a run would migrate
    Plan {
        /// Target language tag episodes must carry
        #[arg(long, short = 'l', env = "TARGET_LANGUAGE", default_value = "de")]
        language: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aacify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            language,
            namespace,
            concurrency,
            work_dir,
        } => {
            let work_root = work_dir.unwrap_or_else(|| std::env::temp_dir().join("aacify"));
            info!(
                "Starting run command for language: {}, namespace: {}, concurrency: {}",
                language, namespace, concurrency
            );
            RunCommand::new(language, namespace, concurrency, work_root)
                .execute()
                .await
        }
        Commands::Plan { language } => {
            info!("Starting plan command for language: {}", language);
            PlanCommand::new(language).execute().await
        }
    };

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
