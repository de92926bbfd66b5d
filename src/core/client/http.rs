//! HTTP implementation of the Hospital Directory client

use super::{ClientError, HospitalDirectory};
use crate::config::DirectoryConfig;
use crate::core::csv::HospitalRow;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// reqwest-backed client for the Hospital Directory API
///
/// Every request is bounded by the configured timeout. Timeouts and
/// connection failures classify as transient, 4xx responses as permanent,
/// 5xx responses as transient.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    base_url: String,
    client: reqwest::Client,
}

/// Creation payload sent to the directory
#[derive(Debug, Serialize)]
struct CreateHospitalPayload<'a> {
    name: &'a str,
    address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    creation_batch_id: &'a str,
}

/// The slice of the directory's creation response we need
#[derive(Debug, Deserialize)]
struct CreatedHospital {
    id: i64,
}

impl DirectoryClient {
    /// Build a client for the configured directory endpoint
    pub fn new(config: &DirectoryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn classify(err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }

    async fn response_error(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            ClientError::Rejected {
                status: status.as_u16(),
                message,
            }
        } else {
            ClientError::Server {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[async_trait]
impl HospitalDirectory for DirectoryClient {
    async fn create_hospital(
        &self,
        hospital: &HospitalRow,
        batch_id: &str,
    ) -> std::result::Result<i64, ClientError> {
        let url = format!("{}/hospitals/", self.base_url);
        let payload = CreateHospitalPayload {
            name: &hospital.name,
            address: &hospital.address,
            phone: hospital.phone.as_deref(),
            creation_batch_id: batch_id,
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(Self::classify)?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let created: CreatedHospital = response
                    .json()
                    .await
                    .map_err(|e| ClientError::UnexpectedResponse(e.to_string()))?;
                debug!("Created hospital: {} (ID: {})", hospital.name, created.id);
                Ok(created.id)
            }
            _ => Err(Self::response_error(response).await),
        }
    }

    async fn activate_batch(&self, batch_id: &str) -> std::result::Result<(), ClientError> {
        let url = format!("{}/hospitals/batch/{}/activate", self.base_url, batch_id);

        let response = self
            .client
            .patch(&url)
            .send()
            .await
            .map_err(Self::classify)?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => {
                info!("Successfully activated batch {}", batch_id);
                Ok(())
            }
            _ => Err(Self::response_error(response).await),
        }
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/hospitals/", self.base_url);

        // 404 counts as reachable: an empty directory answers that way.
        match self
            .client
            .get(&url)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => matches!(response.status().as_u16(), 200 | 404),
            Err(e) => {
                error!("Health check failed: {}", e);
                false
            }
        }
    }
}
