//! In-memory batch registry
//!
//! Owns every batch record for the lifetime of the process. All mutation
//! goes through this type and happens under a single write lock, so a
//! reader never observes a half-updated aggregate. There is no eviction:
//! records live until the process exits.

use super::types::{Batch, BatchStatus, HospitalOutcome, OutcomeStatus};
use crate::error::{Result, ServiceError};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// In-memory store of batches keyed by batch id
#[derive(Debug, Default)]
pub struct BatchRegistry {
    batches: RwLock<HashMap<String, Batch>>,
}

impl BatchRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new batch in `pending` state and return its id
    pub async fn create(&self, total_hospitals: usize) -> String {
        let batch_id = Uuid::new_v4().to_string();
        let batch = Batch::new(batch_id.clone(), total_hospitals);

        self.batches.write().await.insert(batch_id.clone(), batch);
        info!(
            "Created batch {} with {} hospitals",
            batch_id, total_hospitals
        );
        batch_id
    }

    /// Move a batch to a new lifecycle status
    pub async fn transition(&self, batch_id: &str, next: BatchStatus) -> Result<()> {
        let mut batches = self.batches.write().await;
        let batch = get_mut(&mut batches, batch_id)?;
        apply_transition(batch, next)
    }

    /// Record one terminal row outcome and bump the aggregate counters
    pub async fn append_outcome(&self, batch_id: &str, outcome: HospitalOutcome) -> Result<()> {
        let mut batches = self.batches.write().await;
        let batch = get_mut(&mut batches, batch_id)?;

        if batch.status != BatchStatus::Processing {
            return Err(ServiceError::Conflict(format!(
                "Batch {} is not processing, cannot record outcomes",
                batch_id
            )));
        }

        if outcome.status == OutcomeStatus::Failed {
            batch.failed_hospitals += 1;
        }
        batch.outcomes.push(outcome);
        batch.processed_hospitals = batch.outcomes.len();

        debug!(
            "Batch {} progress: {}/{} ({}%)",
            batch_id,
            batch.processed_hospitals,
            batch.total_hospitals,
            batch.progress_percentage()
        );
        Ok(())
    }

    /// Complete a batch once every row is terminal
    ///
    /// When `batch_activated` is set, every created outcome is upgraded to
    /// `created_and_activated`. Returns the final snapshot.
    pub async fn finalize(
        &self,
        batch_id: &str,
        batch_activated: bool,
        processing_time_seconds: f64,
    ) -> Result<Batch> {
        let mut batches = self.batches.write().await;
        let batch = get_mut(&mut batches, batch_id)?;

        if batch.processed_hospitals != batch.total_hospitals {
            return Err(ServiceError::Internal(format!(
                "Batch {} finalized with {}/{} rows terminal",
                batch_id, batch.processed_hospitals, batch.total_hospitals
            )));
        }

        apply_transition(batch, BatchStatus::Completed)?;

        if batch_activated {
            for outcome in &mut batch.outcomes {
                if outcome.status == OutcomeStatus::CreatedNotActivated {
                    outcome.status = OutcomeStatus::CreatedAndActivated;
                }
            }
        }
        batch.batch_activated = batch_activated;
        batch.processing_time_seconds = Some(processing_time_seconds);

        info!(
            "Batch {} completed. Processed: {}/{}, Time: {:.2}s, Activated: {}",
            batch_id,
            batch.processed_hospitals,
            batch.total_hospitals,
            processing_time_seconds,
            batch_activated
        );
        Ok(batch.clone())
    }

    /// Mark a batch that could not begin processing
    pub async fn mark_failed(&self, batch_id: &str) -> Result<()> {
        let mut batches = self.batches.write().await;
        let batch = get_mut(&mut batches, batch_id)?;
        apply_transition(batch, BatchStatus::Failed)
    }

    /// Current snapshot of a batch, if it exists
    pub async fn get(&self, batch_id: &str) -> Option<Batch> {
        self.batches.read().await.get(batch_id).cloned()
    }

    /// Full results of a completed batch
    ///
    /// Distinguishes an unknown id (not found) from a batch that exists
    /// but has not reached `completed` yet (conflict).
    pub async fn results(&self, batch_id: &str) -> Result<Batch> {
        let batches = self.batches.read().await;
        let batch = batches
            .get(batch_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Batch {} not found", batch_id)))?;

        match batch.status {
            BatchStatus::Completed => Ok(batch.clone()),
            BatchStatus::Failed => Err(ServiceError::Conflict(format!(
                "Batch {} failed before processing began",
                batch_id
            ))),
            _ => Err(ServiceError::Conflict(format!(
                "Batch {} processing is not yet completed",
                batch_id
            ))),
        }
    }

    /// Number of batches currently held
    pub async fn count(&self) -> usize {
        self.batches.read().await.len()
    }
}

fn get_mut<'a>(
    batches: &'a mut HashMap<String, Batch>,
    batch_id: &str,
) -> Result<&'a mut Batch> {
    batches
        .get_mut(batch_id)
        .ok_or_else(|| ServiceError::NotFound(format!("Batch {} not found", batch_id)))
}

/// Set a new status, stamping `completed_at` on the terminal transition
fn apply_transition(batch: &mut Batch, next: BatchStatus) -> Result<()> {
    if !batch.status.can_transition_to(next) {
        return Err(ServiceError::Conflict(format!(
            "Batch {} cannot move from {:?} to {:?}",
            batch.batch_id, batch.status, next
        )));
    }
    batch.status = next;
    if next.is_terminal() && batch.completed_at.is_none() {
        batch.completed_at = Some(Utc::now());
    }
    Ok(())
}
