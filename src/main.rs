//! curia-watch CLI
//!
//! One-shot batch entry point, meant to be run by an external scheduler
//! (cron, CI) or by hand. Exits nonzero on network, extraction, or
//! storage failure so the scheduler can surface it.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use curia_watch::{
    error::Result,
    models::{Config, MailSettings},
    notify::FileOutbox,
    pipeline,
    storage::LocalStore,
};

/// CURIA case-law page change monitor
#[derive(Parser, Debug)]
#[command(name = "curia-watch", version, about = "CURIA case-law page change monitor")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory holding the persisted snapshots
    #[arg(short, long, default_value = "curia_data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch all sources, diff against stored snapshots, queue notifications
    Check {
        /// Check only this source key
        #[arg(long)]
        source: Option<String>,

        /// Directory where notification payloads are queued for the mail service
        #[arg(long, default_value = "outbox")]
        outbox: PathBuf,
    },

    /// Validate configuration, schema selectors, and mail environment
    Validate,

    /// Show stored snapshot status per source
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if dotenvy::dotenv().is_ok() {
        log::debug!("environment loaded from .env");
    }

    let config = Config::load_or_default(&cli.config);
    let store = LocalStore::new(&cli.data_dir);

    match cli.command {
        Command::Check { source, outbox } => {
            let transport = FileOutbox::new(outbox);
            let settings = MailSettings::from_env();
            pipeline::run_watch(&config, &store, &transport, &settings, source.as_deref())
                .await?;
            log::info!("check complete");
        }

        Command::Validate => {
            let settings = MailSettings::from_env();
            pipeline::run_validate(&config, &settings)?;
        }

        Command::Info => {
            log::info!("data directory: {}", cli.data_dir.display());
            pipeline::run_info(&config, &store).await?;
        }
    }

    Ok(())
}
