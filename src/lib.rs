//! # Hospital Bulk Processing Gateway
//!
//! Accepts hospital CSV uploads, validates them, creates each hospital
//! through the remote Hospital Directory API with retry and backoff, and
//! tracks every batch in an in-memory registry until completion.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hospital_bulk_rs::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let gateway = Gateway::new(config)?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Endpoints
//!
//! - `POST /hospitals/bulk`: upload a CSV and process it as one batch
//! - `POST /hospitals/validate`: validate a CSV without processing
//! - `GET /hospitals/batch/{batch_id}/status`: batch progress
//! - `GET /hospitals/batch/{batch_id}/results`: full batch results
//! - `GET /health`: gateway and directory health

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod server;

// Re-export main types
pub use config::Config;
pub use error::{Result, ServiceError};

use tracing::info;

/// A minimal bulk-processing gateway instance
pub struct Gateway {
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");

        let server = server::HttpServer::new(config)?;
        Ok(Self { server })
    }

    /// Run the gateway server until shutdown
    pub async fn run(self) -> Result<()> {
        info!("Starting Hospital Bulk Processing Gateway");

        self.server.start().await
    }
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
