//! Batch processing: lifecycle types, in-memory registry, and orchestration
//!
//! A batch is one bulk upload. The registry owns every batch record; the
//! orchestrator drives rows through the directory client and reports back
//! through the registry.

pub mod orchestrator;
pub mod registry;
pub mod types;


pub use orchestrator::BatchOrchestrator;
pub use registry::BatchRegistry;
pub use types::{Batch, BatchStatus, HospitalOutcome, OutcomeStatus};
