//! Hospital Directory API client
//!
//! The orchestrator depends only on the [`HospitalDirectory`] trait; the
//! production implementation over HTTP lives in [`http::DirectoryClient`].

pub mod http;
pub mod retry;

pub use http::DirectoryClient;
pub use retry::RetryPolicy;

use crate::core::csv::HospitalRow;
use async_trait::async_trait;
use thiserror::Error;

/// Failure from the Hospital Directory API, split by whether retrying can help
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Request exceeded the configured timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Connection could not be established or dropped mid-request
    #[error("Network error: {0}")]
    Network(String),

    /// Directory answered with a server-side error
    #[error("Directory error (status {status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        message: String,
    },

    /// Directory rejected the payload
    #[error("Directory rejected request (status {status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        message: String,
    },

    /// Success status carrying a body the client could not interpret
    #[error("Unexpected directory response: {0}")]
    UnexpectedResponse(String),
}

impl ClientError {
    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout(_) | ClientError::Network(_) | ClientError::Server { .. }
        )
    }
}

/// Capability surface of the Hospital Directory API
#[async_trait]
pub trait HospitalDirectory: Send + Sync {
    /// Create one hospital, returning the directory-assigned id
    async fn create_hospital(
        &self,
        hospital: &HospitalRow,
        batch_id: &str,
    ) -> Result<i64, ClientError>;

    /// Activate every hospital created under the given batch
    async fn activate_batch(&self, batch_id: &str) -> Result<(), ClientError>;

    /// Whether the directory is currently reachable
    async fn health_check(&self) -> bool;
}
