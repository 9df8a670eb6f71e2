//! # Guardados CLI (`guardados`)
//!
//! Browse, search, and page through saved messages.
//!
//! ## Usage
//!
//! ```bash
//! guardados --config ./config/guardados.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `guardados list` | Filtered, sorted, paginated message listing |
//! | `guardados authors` | Every author with saved messages |
//! | `guardados topics` | Most used topics with counts |
//! | `guardados stats` | Totals for the loaded archive |
//! | `guardados export` | Aggregated messages as JSON |
//!
//! ## Examples
//!
//! ```bash
//! # Most saved messages tagged "madrid" in any spelling
//! guardados list --topic Madrid
//!
//! # Newest messages from the last week mentioning "bici"
//! guardados list --search bici --time week --sort date-desc
//!
//! # Use a local export without a config file
//! guardados --data ./data/guardados.json stats
//! ```

use clap::{Parser, Subcommand};
use guardados::config::{self, Config};
use guardados::{browse, catalog, export, stats};
use guardados_core::query::{FilterState, SortOrder, TimeWindow};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Guardados — browse a community's saved messages.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/guardados.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "guardados",
    about = "Guardados — browse, search, and page through saved messages",
    version,
    long_about = "Guardados loads a saved-messages export (one row per user bookmark), \
    merges the rows into one entry per message, unifies differently spelled topic tags, \
    and lets you search, filter, sort, and page through the result."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/guardados.toml`. Source, browsing, and topic
    /// settings are read from this file.
    #[arg(long, global = true, default_value = "./config/guardados.toml")]
    config: PathBuf,

    /// Local JSON export to read instead of the configured source.
    ///
    /// When the config file does not exist, built-in defaults are used.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// List messages.
    ///
    /// Filters compose: a message must match the search text, author,
    /// topic, and time window together. Pages are 1-based; a page past the
    /// end falls back to page 1.
    List {
        /// Case-insensitive text to look for in content, author, and topics.
        #[arg(long, default_value = "")]
        search: String,

        /// Exact author display name.
        #[arg(long)]
        author: Option<String>,

        /// Topic in any spelling (`Madrid`, `madrid`, `Mádrid` are the same).
        #[arg(long)]
        topic: Option<String>,

        /// Time window: `all`, `week` (last 7 days), or `month` (last 30 days).
        #[arg(long, default_value = "all")]
        time: TimeWindow,

        /// Sort order: `saves-desc`, `saves-asc`, `date-desc`, or `date-asc`.
        /// Defaults to `browse.default_sort`.
        #[arg(long)]
        sort: Option<SortOrder>,

        /// Page to show (1-based).
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Messages per page. Defaults to `browse.per_page`.
        #[arg(long)]
        per_page: Option<usize>,

        /// Print the page as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List every author with at least one saved message.
    Authors,

    /// List the most used topics across all messages.
    ///
    /// Counts are summed over messages; ties are ordered alphabetically
    /// with Spanish collation.
    Topics {
        /// Maximum number of topics to print. Defaults to `topics.popular_limit`.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show archive totals: messages, saves, authors, and topics.
    Stats,

    /// Export the aggregated messages as JSON.
    Export {
        /// Output file. Writes to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut cfg = match &cli.data {
        Some(_) if !cli.config.exists() => Config::minimal(),
        _ => config::load_config(&cli.config)?,
    };
    if let Some(data) = &cli.data {
        cfg.source.path = Some(data.clone());
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = resolve_config(&cli)?;

    match cli.command {
        Commands::List {
            search,
            author,
            topic,
            time,
            sort,
            page,
            per_page,
            json,
        } => {
            let filters = FilterState {
                search_term: search,
                author,
                topic,
                time_window: time,
                sort_order: sort.unwrap_or_else(|| cfg.browse.sort_order()),
            };
            browse::run_list(&cfg, &filters, page, per_page, json).await?;
        }
        Commands::Authors => {
            catalog::run_authors(&cfg).await?;
        }
        Commands::Topics { limit } => {
            catalog::run_topics(&cfg, limit).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Export { output } => {
            export::run_export(&cfg, output.as_deref()).await?;
        }
    }

    Ok(())
}
