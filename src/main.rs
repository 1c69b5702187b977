//! study-journey: command-line front end for the Bible Study Journey
//!
//! Loads the module catalog (remote, or built-in when unavailable), opens
//! the persisted progress and runs one command against it.

mod cli;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use study_journey::config::BackendKind;
use study_journey::{Config, Journey};

#[derive(Parser)]
#[command(name = "study-journey")]
#[command(about = "Track progress through the Bible Study Journey curriculum")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "journey.toml")]
    config: String,

    /// Data directory for stored progress
    #[arg(short, long, env = "JOURNEY_DATA_DIR")]
    data_dir: Option<String>,

    /// Content API base URL (overrides config file)
    #[arg(long, env = "JOURNEY_CATALOG_URL")]
    catalog_url: Option<String>,

    /// Progress backend: memory, json or sqlite
    #[arg(long, env = "JOURNEY_BACKEND")]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: cli::JourneyCommands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("study_journey=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(std::path::Path::new(&cli.config))?;

    // Apply CLI overrides
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = PathBuf::from(data_dir);
    }
    if let Some(url) = cli.catalog_url {
        config.catalog.url = Some(url);
    }
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }

    info!(
        backend = %config.storage.backend,
        data_dir = %config.storage.data_dir.display(),
        "Opening journey"
    );

    let mut journey = Journey::open(&config).await?;

    match cli::execute_command(&mut journey, cli.command) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
