//! OTI job monitor
//!
//! Command-line front end for the transit-indicators backend.
//!
//! Architecture:
//! - Configuration: backend URL from the command line, intervals from the environment
//! - Scheduler: the job status poller and the scenario job-status refresher
//! - Commands: render what the scheduler publishes
//!
//! A watching command owns its poller; leaving the command (or pressing
//! Ctrl-C) tears the poller down so no fetch outlives the view.

mod commands;
mod config;
mod scheduler;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "oti")]
#[command(about = "Transit indicators job monitor", long_about = None)]
struct Cli {
    /// Indicators backend URL
    #[arg(long, env = "OTI_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with rendered output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oti=info,oti_client=info,oti_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env(cli.api_url);
    config.validate()?;
    debug!(
        "Loaded configuration: api_url={}, poll_interval={:?}",
        config.api_url, config.poll_interval
    );

    handle_command(cli.command, &config).await
}
