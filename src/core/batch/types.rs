//! Batch tracking types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal status of one hospital row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Created in the directory; batch activation pending or skipped
    CreatedNotActivated,
    /// Created and activated together with the rest of the batch
    CreatedAndActivated,
    /// Creation failed after exhausting retries, or was rejected outright
    Failed,
}

/// Result of attempting to create one hospital row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalOutcome {
    /// 1-based CSV row number, header excluded
    pub row: usize,
    /// Directory-assigned hospital id, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<i64>,
    /// Hospital name from the CSV
    pub name: String,
    /// Terminal status for this row
    pub status: OutcomeStatus,
    /// Last error message, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HospitalOutcome {
    /// Outcome for a successfully created hospital
    pub fn created(row: usize, hospital_id: i64, name: String) -> Self {
        Self {
            row,
            hospital_id: Some(hospital_id),
            name,
            status: OutcomeStatus::CreatedNotActivated,
            error: None,
        }
    }

    /// Outcome for a row whose creation failed
    pub fn failed(row: usize, name: String, error: String) -> Self {
        Self {
            row,
            hospital_id: None,
            name,
            status: OutcomeStatus::Failed,
            error: Some(error),
        }
    }
}

/// Batch lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Created, processing has not started
    Pending,
    /// Rows are being worked through
    Processing,
    /// Ran to termination, with or without row failures
    Completed,
    /// Could not begin processing at all
    Failed,
}

impl BatchStatus {
    /// Whether this status ends the batch lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Failed)
    }

    /// Legal transitions: pending→processing, pending→failed,
    /// processing→completed. Nothing leaves a terminal status.
    pub fn can_transition_to(&self, next: BatchStatus) -> bool {
        matches!(
            (self, next),
            (BatchStatus::Pending, BatchStatus::Processing)
                | (BatchStatus::Pending, BatchStatus::Failed)
                | (BatchStatus::Processing, BatchStatus::Completed)
        )
    }
}

/// One bulk-upload submission and its aggregate outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Unique batch id, assigned once at creation
    pub batch_id: String,
    /// Lifecycle status
    pub status: BatchStatus,
    /// Number of rows submitted
    pub total_hospitals: usize,
    /// Rows with a terminal outcome, success or failure
    pub processed_hospitals: usize,
    /// Rows whose creation failed
    pub failed_hospitals: usize,
    /// Per-row outcomes in input row order
    pub outcomes: Vec<HospitalOutcome>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Termination timestamp, set exactly once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Wall-clock processing duration, set at completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_seconds: Option<f64>,
    /// Whether the activation step ran and succeeded
    pub batch_activated: bool,
}

impl Batch {
    /// Fresh pending batch with no outcomes
    pub fn new(batch_id: String, total_hospitals: usize) -> Self {
        Self {
            batch_id,
            status: BatchStatus::Pending,
            total_hospitals,
            processed_hospitals: 0,
            failed_hospitals: 0,
            outcomes: Vec::with_capacity(total_hospitals),
            created_at: Utc::now(),
            completed_at: None,
            processing_time_seconds: None,
            batch_activated: false,
        }
    }

    /// Share of rows with a terminal outcome, in percent, clamped to [0, 100]
    pub fn progress_percentage(&self) -> f64 {
        if self.total_hospitals == 0 {
            return 0.0;
        }
        let pct = (self.processed_hospitals as f64 / self.total_hospitals as f64) * 100.0;
        let pct = pct.clamp(0.0, 100.0);
        (pct * 100.0).round() / 100.0
    }
}
