//! # Notecase CLI (`notes`)
//!
//! Searches a tree of Markdown notes by comma-separated keywords and serves
//! the same search, plus the tag list, over JSON HTTP.
//!
//! ## Usage
//!
//! ```bash
//! notes --config ./config/notecase.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `notes search "<keywords>"` | Search notes; prints the JSON result |
//! | `notes tags` | Print tag and folder names as JSON |
//! | `notes cache stats` | Summarize the on-disk search cache |
//! | `notes cache clear` | Delete every cached search result |
//! | `notes serve` | Start the JSON HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Notes whose path or text contains both "invoices" and "paid"
//! notes search "invoices,paid"
//!
//! # Same search, listing paths instead of identifiers, skipping the cache
//! notes search "invoices,paid" --paths --no-cache
//!
//! # Start the server
//! notes serve --config ./config/notecase.toml
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` to change the level.

use clap::{Parser, Subcommand};
use notecase::{cache_cmd, config, search, server, tags};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Notecase: cached keyword search over Markdown notes.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/notecase.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "notes",
    about = "Notecase: cached keyword search over Markdown notes",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/notecase.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search notes by comma-separated keywords.
    ///
    /// Every keyword must appear, case-insensitively, in the note's path or
    /// in its text. Prints `[]` for an empty query, otherwise the pattern
    /// and the identifiers of the matching notes.
    Search {
        /// Comma-separated keywords, e.g. `invoices,paid`.
        query: String,

        /// Skip the cache lookup. The fresh result is still written back
        /// when caching is enabled.
        #[arg(long)]
        no_cache: bool,

        /// Print matching relative paths, one per line, instead of JSON.
        /// Always scans; the cache is not consulted.
        #[arg(long)]
        paths: bool,
    },

    /// Print tag and folder names used for autocomplete.
    Tags,

    /// Inspect or clear the search cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Start the JSON HTTP server on `[server].bind`.
    Serve,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show record count, size and age of the cache.
    Stats,
    /// Delete every cached search result.
    Clear,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notecase=info,notecase_core=info".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Search {
            query,
            no_cache,
            paths,
        } => {
            search::run_search(&cfg, &query, no_cache, paths)?;
        }
        Commands::Tags => {
            tags::run_tags(&cfg)?;
        }
        Commands::Cache { action } => match action {
            CacheAction::Stats => cache_cmd::run_cache_stats(&cfg)?,
            CacheAction::Clear => cache_cmd::run_cache_clear(&cfg)?,
        },
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
