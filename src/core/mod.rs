//! Core bulk-processing engine
//!
//! This module contains the business logic: CSV validation, the directory
//! client seam, and batch orchestration with its registry.

pub mod batch;
pub mod client;
pub mod csv;
