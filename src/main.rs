//! rt - command line client for Request Tracker
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `RT_API_URL`: Base URL of the REST API (e.g. `https://rt.example.com/REST/2.0`)
//! - `RT_TOKEN`: Auth token, or `RT_USERNAME` and `RT_PASSWORD` for Basic auth
//! - `RT_TIMEOUT_SECS`: Request timeout (default 30)
//! - `RT_DEBUG`: Log request and response bodies
//!
//! # Usage
//!
//! ```bash
//! rt ticket show 42
//! rt ticket comment 42 "Looking into it"
//! rt ticket update 42 --status resolved
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use rt_rest::{cli, config, rt_client};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();

    // Diagnostics go to stderr so command output can be piped
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rt_rest=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = config::ClientConfig::from_env().context("Failed to load configuration")?;
    let config = args.apply(config);

    tracing::debug!(?config, "Configuration loaded");

    let client = rt_client::RtClient::new(&config).context("Failed to create RT client")?;

    let output = cli::run(&client, args.command)
        .await
        .context("Request to RT failed")?;

    println!("{}", output.render().context("Failed to render output")?);

    Ok(())
}
