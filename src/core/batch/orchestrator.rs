//! Batch orchestration
//!
//! Drives the per-row creation workflow against the Hospital Directory API
//! and records every outcome through the registry. Row failures never abort
//! a batch; only a fault before the first row attempt can leave it `failed`.

use super::registry::BatchRegistry;
use super::types::{Batch, BatchStatus, HospitalOutcome, OutcomeStatus};
use crate::core::client::{HospitalDirectory, RetryPolicy};
use crate::core::csv::HospitalRow;
use crate::error::{Result, ServiceError};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Orchestrates one bulk submission end to end
pub struct BatchOrchestrator {
    client: Arc<dyn HospitalDirectory>,
    registry: Arc<BatchRegistry>,
    retry: RetryPolicy,
    max_per_batch: usize,
}

impl BatchOrchestrator {
    /// Wire an orchestrator to its collaborators
    pub fn new(
        client: Arc<dyn HospitalDirectory>,
        registry: Arc<BatchRegistry>,
        retry: RetryPolicy,
        max_per_batch: usize,
    ) -> Self {
        Self {
            client,
            registry,
            retry,
            max_per_batch,
        }
    }

    /// Process a full batch synchronously and return the final snapshot
    ///
    /// Rows are worked in input order. Each row gets up to the configured
    /// number of attempts with doubling backoff on transient failures; a
    /// permanent rejection ends the row immediately. Activation runs only
    /// when every row succeeded.
    pub async fn submit(&self, rows: Vec<HospitalRow>) -> Result<Batch> {
        if rows.is_empty() {
            return Err(ServiceError::Validation(
                "Batch must contain at least one hospital".to_string(),
            ));
        }
        if rows.len() > self.max_per_batch {
            return Err(ServiceError::Validation(format!(
                "CSV contains {} hospitals. Maximum allowed is {}.",
                rows.len(),
                self.max_per_batch
            )));
        }

        let started = Instant::now();
        let total = rows.len();
        let batch_id = self.registry.create(total).await;

        if let Err(e) = self
            .registry
            .transition(&batch_id, BatchStatus::Processing)
            .await
        {
            error!("Batch {} could not begin processing: {}", batch_id, e);
            self.registry.mark_failed(&batch_id).await?;
            return Err(e);
        }

        for (position, row) in rows.iter().enumerate() {
            let outcome = self.create_with_retry(row, &batch_id).await;
            if outcome.status == OutcomeStatus::Failed {
                warn!(
                    "Failed to create hospital {}/{}: {}",
                    position + 1,
                    total,
                    row.name
                );
            } else {
                info!("Created hospital {}/{}: {}", position + 1, total, row.name);
            }
            self.registry.append_outcome(&batch_id, outcome).await?;
        }

        let snapshot = self.registry.get(&batch_id).await.ok_or_else(|| {
            ServiceError::Internal(format!("Batch {} vanished during processing", batch_id))
        })?;

        let batch_activated = if snapshot.failed_hospitals == 0 {
            match self.client.activate_batch(&batch_id).await {
                Ok(()) => {
                    info!("Batch {} activated successfully", batch_id);
                    true
                }
                Err(e) => {
                    error!("Failed to activate batch {}: {}", batch_id, e);
                    false
                }
            }
        } else {
            warn!(
                "Batch {} not activated due to {} failures",
                batch_id, snapshot.failed_hospitals
            );
            false
        };

        let processing_time = started.elapsed().as_secs_f64();
        self.registry
            .finalize(&batch_id, batch_activated, processing_time)
            .await
    }

    /// Attempt one row until success, a permanent rejection, or exhaustion
    async fn create_with_retry(&self, row: &HospitalRow, batch_id: &str) -> HospitalOutcome {
        let mut last_error = None;

        for attempt in 0..self.retry.max_attempts {
            match self.client.create_hospital(row, batch_id).await {
                Ok(hospital_id) => {
                    return HospitalOutcome::created(row.row_number, hospital_id, row.name.clone());
                }
                Err(e) if e.is_transient() => {
                    warn!(
                        "Transient error creating hospital '{}' (attempt {}/{}): {}",
                        row.name,
                        attempt + 1,
                        self.retry.max_attempts,
                        e
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    warn!("Hospital '{}' rejected by directory: {}", row.name, e);
                    return HospitalOutcome::failed(row.row_number, row.name.clone(), e.to_string());
                }
            }

            if attempt + 1 < self.retry.max_attempts {
                sleep(self.retry.delay_for(attempt)).await;
            }
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts were made".to_string());
        HospitalOutcome::failed(
            row.row_number,
            row.name.clone(),
            format!(
                "Failed after {} attempts: {}",
                self.retry.max_attempts, message
            ),
        )
    }
}
