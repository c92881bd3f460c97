//! # Rigveda Explorer CLI (`rv`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rv serve` | Start the HTTP API |
//! | `rv verse <m> <s> <r>` | Fetch and print one normalized verse |
//! | `rv explain <m> <s> <r>` | Fetch a verse and print AI commentary |
//! | `rv samples` | List well-known sample verses |
//!
//! ## Examples
//!
//! ```bash
//! rv --config ./config/rv.toml serve
//! rv verse 3 62 10
//! OPENAI_API_KEY=sk-... rv explain 1 1 1 --significance
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use rigveda_explorer::{commentary, config, lookup, samples, server};

/// Rigveda Explorer: VedaWeb verse lookup with AI commentary.
#[derive(Parser)]
#[command(
    name = "rv",
    about = "Rigveda Explorer: verse lookup and AI commentary over HTTP",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Built-in defaults are used when the file does not exist.
    #[arg(long, global = true, default_value = "./config/rv.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server on `[server].bind`.
    Serve,

    /// Fetch one verse from VedaWeb and print the normalized record.
    Verse {
        /// Book (1–10).
        mandala: String,
        /// Hymn number within the book.
        sukta: String,
        /// Verse number within the hymn.
        rik: String,
    },

    /// Fetch a verse and print AI commentary on it.
    ///
    /// Uses the key named by `[llm].api_key_env`.
    Explain {
        mandala: String,
        sukta: String,
        rik: String,

        /// Ask for thematic significance instead of an explanation.
        #[arg(long)]
        significance: bool,
    },

    /// List curated sample verses.
    Samples,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = if cli.config.exists() {
        config::load_config(&cli.config)?
    } else {
        tracing::debug!(path = %cli.config.display(), "config file not found, using defaults");
        config::Config::minimal()
    };

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Verse {
            mandala,
            sukta,
            rik,
        } => {
            lookup::run_verse(&cfg, &mandala, &sukta, &rik).await?;
        }
        Commands::Explain {
            mandala,
            sukta,
            rik,
            significance,
        } => {
            commentary::run_explain(&cfg, &mandala, &sukta, &rik, significance).await?;
        }
        Commands::Samples => {
            samples::run_samples();
        }
    }

    Ok(())
}
