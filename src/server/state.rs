//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::batch::{BatchOrchestrator, BatchRegistry};
use crate::core::client::{HospitalDirectory, RetryPolicy};
use crate::core::csv::CsvValidator;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc so cloning per worker is cheap. The
/// registry is constructed exactly once here and only ever reached through
/// this state, never through a global.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// CSV validator with the configured row ceiling
    pub validator: Arc<CsvValidator>,
    /// Batch registry owning all batch records
    pub registry: Arc<BatchRegistry>,
    /// Orchestrator driving bulk submissions
    pub orchestrator: Arc<BatchOrchestrator>,
    /// Hospital Directory API client
    pub directory: Arc<dyn HospitalDirectory>,
}

impl AppState {
    /// Create a new AppState wired to the given directory client
    pub fn new(config: Config, directory: Arc<dyn HospitalDirectory>) -> Self {
        let config = Arc::new(config);
        let validator = Arc::new(CsvValidator::new(config.limits.max_hospitals_per_batch));
        let registry = Arc::new(BatchRegistry::new());
        let orchestrator = Arc::new(BatchOrchestrator::new(
            directory.clone(),
            registry.clone(),
            RetryPolicy::from(&config.directory.retry),
            config.limits.max_hospitals_per_batch,
        ));

        Self {
            config,
            validator,
            registry,
            orchestrator,
            directory,
        }
    }
}
