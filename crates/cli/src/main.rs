//! Noah's Market CLI - Solve the Hanukkah of Data puzzles.
//!
//! # Usage
//!
//! ```bash
//! # Solve every puzzle of an edition
//! hod solve --edition 5784 --data-dir data/5784
//!
//! # Solve one puzzle (and anything it builds on) without network access
//! hod solve --edition 5783 --puzzle 3 --offline
//!
//! # Dial a word on a phone keypad
//! hod encode Tannenbaum
//!
//! # Row counts per table
//! hod stats --data-dir data/5784
//! ```
//!
//! # Commands
//!
//! - `solve` - Solve one puzzle or a whole edition
//! - `encode` - Letter-to-digit keypad encoding
//! - `stats` - Table row counts
//!
//! Settings not given on the command line come from the environment; see
//! [`noahs_query::config`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use noahs_query::{Edition, LogFormat, Puzzle, SolverConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "hod")]
#[command(author, version, about = "Noah's Market puzzle solver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one puzzle or a whole edition
    Solve {
        /// Edition to solve (5783, 5784, 5784-speedrun, 5785)
        #[arg(short, long)]
        edition: Edition,

        /// Puzzle number; solves all eight when omitted
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=8))]
        puzzle: Option<u8>,

        /// Directory holding the CSV tables (overrides `HOD_DATA_DIR`)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Use built-in zodiac tables instead of fetching them
        #[arg(long)]
        offline: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Encode text as phone keypad digits
    Encode {
        /// Text to encode
        text: String,
    },
    /// Show row counts per table
    Stats {
        /// Directory holding the CSV tables (overrides `HOD_DATA_DIR`)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

/// How answers are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One phone number per line
    Text,
    /// A JSON array of answers
    Json,
}

fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "noahs_query=info,hod=info".into());

    // Logs go to stderr so stdout carries only answers
    let json = format == LogFormat::Json;
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let config = SolverConfig::from_env();
    init_tracing(config.as_ref().map_or(LogFormat::Text, |c| c.log_format));

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: SolverConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Solve {
            edition,
            puzzle,
            data_dir,
            offline,
            format,
        } => {
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            config.offline |= offline;
            let puzzle = puzzle.and_then(Puzzle::from_number);
            commands::solve::run(&config, edition, puzzle, format).await?;
        }
        Commands::Encode { text } => commands::encode::run(&text),
        Commands::Stats { data_dir } => {
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            commands::stats::run(&config)?;
        }
    }
    Ok(())
}
