//! Hospital Bulk Processing Gateway
//!
//! Bulk creation of hospital records from CSV uploads against the
//! Hospital Directory API.

use hospital_bulk_rs::{Config, Gateway};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Pick up a local .env before reading configuration
    dotenvy::dotenv().ok();

    // Initialize logging system
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> hospital_bulk_rs::Result<()> {
    let config = Config::from_env()?;
    Gateway::new(config)?.run().await
}
