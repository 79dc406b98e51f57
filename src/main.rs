// Quill - interactive query console
// Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use quill::backend::HttpBackend;
use quill::cli::{history_path, Repl, RustylineReader};
use quill::config::constants::ENV_LOG;
use quill::config::load_config;
use quill::connection::ConnectionManager;

/// Interactive query console
#[derive(Debug, Parser)]
#[command(name = "quill", version, about)]
struct Args {
    /// Server URL (overrides the config file and QUILL_URL)
    #[arg(long)]
    url: Option<String>,

    /// Database to run statements against
    #[arg(short, long)]
    database: Option<String>,

    /// Path to a config file (default: ~/.quill/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable syntax highlighting
    #[arg(long)]
    no_color: bool,

    /// Log connection activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "quill=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    // Command-line flags take precedence over file and environment
    if let Some(url) = args.url {
        config.connection.url = url;
    }
    if let Some(database) = args.database {
        config.connection.database = database;
    }
    if args.no_color {
        config.repl.color = false;
    }
    config.validate().context("Invalid configuration")?;

    let history = history_path(config.repl.history_file.as_deref());
    let reader = RustylineReader::new(config.repl.color, history)?;

    let backend = HttpBackend::new(&config.connection);
    let connections = ConnectionManager::new(Box::new(backend));

    let mut repl = Repl::new(reader, connections, io::stdout());
    repl.run()?;

    Ok(())
}
