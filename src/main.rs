//! Main entry point for the Intento CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intento::cli::commands::{self, Commands};
use intento::{ConnectorConfig, IntentoConnector};

/// CLI version reported in the User-Agent tag
const CLI_TAG: &str = concat!("Intento.CLI/", env!("CARGO_PKG_VERSION"));

/// Command line interface for the Intento API
#[derive(Parser, Debug)]
#[command(name = "intento-cli", version, about, long_about = None)]
struct Args {
    /// Intento API key (optional, defaults to INTENTO_API_KEY env var)
    #[arg(long, alias = "key")]
    api_key: Option<String>,

    /// API host (optional, defaults to INTENTO_API_HOST or api.inten.to)
    #[arg(long)]
    host: Option<String>,

    /// Config file (toml, json or yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log requests and responses
    #[arg(long)]
    debug: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log an equivalent curl command for each request
    #[arg(long)]
    curl: bool,

    /// Print the request that would be sent instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Milliseconds between async operation polls
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Stop polling after this many attempts
    #[arg(long)]
    attempts: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose || args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("intento={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Override config with CLI args if provided
    let mut config = ConnectorConfig::load(args.config.as_deref())?;
    if let Some(api_key) = args.api_key {
        config.api_key = api_key;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(poll_interval) = args.poll_interval {
        config.poll_interval_ms = poll_interval;
    }
    if args.attempts.is_some() {
        config.max_poll_attempts = args.attempts;
    }
    config.debug |= args.debug;
    config.verbose |= args.verbose;
    config.curl |= args.curl;
    config.dry_run |= args.dry_run;
    config.user_agent.get_or_insert_with(|| CLI_TAG.to_string());

    let client = IntentoConnector::from_config(config);
    if let Some(error) = client.error() {
        anyhow::bail!(
            "{}. Pass --api-key or set INTENTO_API_KEY in the environment or a .env file",
            error
        );
    }

    commands::run(&client, args.command).await
}
