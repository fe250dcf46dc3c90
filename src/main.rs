//! # App Gallery CLI (`gallery`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `gallery list` | Print apps, optionally filtered by query, category, and tag |
//! | `gallery facets` | Print categories with counts and all tags |
//! | `gallery check` | Verify configuration and store access |
//! | `gallery serve` | Start the HTTP gallery |
//!
//! ## Examples
//!
//! ```bash
//! gallery --config ./config/gallery.toml list --query chat
//! gallery list --category Creative --json
//! gallery serve
//! ```
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=debug` for
//! more detail.

use app_gallery::{check, config, list, server};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// App Gallery: browse a curated directory of apps.
#[derive(Parser)]
#[command(
    name = "gallery",
    about = "App Gallery: a searchable, filterable directory of apps",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/gallery.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List apps passing the given filters.
    ///
    /// Filters combine: a listed app's title contains the query
    /// (case-insensitive) AND it has the category AND it carries the tag.
    /// Pass `all` to a filter to clear it.
    List {
        /// Case-insensitive substring of the app title.
        #[arg(long, short)]
        query: Option<String>,

        /// Exact category, or `all`.
        #[arg(long, short)]
        category: Option<String>,

        /// Exact tag, or `all`.
        #[arg(long, short)]
        tag: Option<String>,

        /// Print the render model as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show every category with its app count, and every tag.
    Facets,

    /// Check configuration and store access, and report malformed records.
    Check,

    /// Start the HTTP gallery on `[server].bind`.
    Serve,
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    install_tracing();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::List {
            query,
            category,
            tag,
            json,
        } => {
            list::run_list(&cfg, query, category, tag, json).await?;
        }
        Commands::Facets => {
            list::run_facets(&cfg).await?;
        }
        Commands::Check => {
            check::run_check(&cfg).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
