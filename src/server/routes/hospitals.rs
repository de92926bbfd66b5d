//! Bulk hospital endpoints
//!
//! Upload handling, validation, and batch status/results queries. The
//! response shapes match what the Hospital Directory integrations already
//! consume.

use crate::core::batch::types::{Batch, BatchStatus, HospitalOutcome};
use crate::core::csv::ValidationIssue;
use crate::error::{Result, ServiceError};
use crate::server::state::AppState;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::Serialize;
use tracing::info;

/// Configure bulk hospital routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/hospitals")
            .route("/bulk", web::post().to(bulk_create))
            .route("/validate", web::post().to(validate_csv))
            .route("/batch/{batch_id}/status", web::get().to(batch_status))
            .route("/batch/{batch_id}/results", web::get().to(batch_results)),
    );
}

/// Response body for bulk processing and batch results
#[derive(Debug, Serialize)]
pub struct BulkProcessingResponse {
    /// Batch identifier
    pub batch_id: String,
    /// Rows submitted for processing
    pub total_hospitals: usize,
    /// Rows with a terminal outcome
    pub processed_hospitals: usize,
    /// Rows whose creation failed
    pub failed_hospitals: usize,
    /// Wall-clock processing duration
    pub processing_time_seconds: f64,
    /// Whether the activation step ran and succeeded
    pub batch_activated: bool,
    /// Per-row outcomes in input order
    pub hospitals: Vec<HospitalOutcome>,
}

impl From<Batch> for BulkProcessingResponse {
    fn from(batch: Batch) -> Self {
        let processing_time = batch.processing_time_seconds.unwrap_or(0.0);
        Self {
            batch_id: batch.batch_id,
            total_hospitals: batch.total_hospitals,
            processed_hospitals: batch.processed_hospitals,
            failed_hospitals: batch.failed_hospitals,
            processing_time_seconds: (processing_time * 100.0).round() / 100.0,
            batch_activated: batch.batch_activated,
            hospitals: batch.outcomes,
        }
    }
}

/// Response body for CSV validation
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    /// Whether the file passed every check
    pub is_valid: bool,
    /// Data lines seen, valid or not
    pub total_rows: usize,
    /// Structured validation issues
    pub errors: Vec<ValidationIssue>,
    /// Non-fatal observations
    pub warnings: Vec<String>,
}

/// Response body for batch status queries
#[derive(Debug, Serialize)]
pub struct BatchStatusResponse {
    /// Batch identifier
    pub batch_id: String,
    /// Lifecycle status
    pub status: BatchStatus,
    /// Rows submitted
    pub total_hospitals: usize,
    /// Rows with a terminal outcome
    pub processed_hospitals: usize,
    /// Completion share in percent
    pub progress_percentage: f64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Termination timestamp, once reached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Batch> for BatchStatusResponse {
    fn from(batch: Batch) -> Self {
        let progress_percentage = batch.progress_percentage();
        Self {
            batch_id: batch.batch_id,
            status: batch.status,
            total_hospitals: batch.total_hospitals,
            processed_hospitals: batch.processed_hospitals,
            progress_percentage,
            created_at: batch.created_at,
            completed_at: batch.completed_at,
        }
    }
}

/// Pull the uploaded CSV out of the multipart payload
async fn read_csv_upload(payload: &mut Multipart) -> Result<(String, Vec<u8>)> {
    let mut filename = String::from("upload.csv");
    let mut data: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| ServiceError::BadRequest(format!("Invalid multipart data: {}", e)))?;

        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        match field_name.as_str() {
            "file" => {
                if let Some(cd) = field.content_disposition() {
                    if let Some(fname) = cd.get_filename() {
                        filename = fname.to_string();
                    }
                }

                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk
                        .map_err(|e| ServiceError::BadRequest(format!("Error reading file: {}", e)))?;
                    bytes.extend_from_slice(&chunk);
                }
                data = Some(bytes);
            }
            _ => {
                // Drain and ignore unknown fields.
                while field.next().await.is_some() {}
            }
        }
    }

    match data {
        Some(bytes) if !bytes.is_empty() => Ok((filename, bytes)),
        _ => Err(ServiceError::BadRequest(
            "No CSV file provided".to_string(),
        )),
    }
}

/// Bulk create hospitals from an uploaded CSV
///
/// File-level validation problems reject the upload outright; rows that
/// individually fail validation are excluded and the rest are processed as
/// one batch.
async fn bulk_create(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let (filename, content) = read_csv_upload(&mut payload).await?;
    info!("Starting bulk processing for file: {}", filename);

    if !filename.ends_with(".csv") {
        return Err(ServiceError::BadRequest(
            "Invalid file type. Only CSV files are accepted.".to_string(),
        ));
    }

    let parse = state.validator.parse(&content);

    let file_errors: Vec<&str> = parse
        .file_issues()
        .map(|issue| issue.message.as_str())
        .collect();
    if !file_errors.is_empty() {
        return Err(ServiceError::Validation(format!(
            "CSV validation failed: {}",
            file_errors.join(", ")
        )));
    }
    if parse.rows.is_empty() {
        return Err(ServiceError::Validation(
            "CSV validation failed: no valid hospital rows".to_string(),
        ));
    }

    let batch = state.orchestrator.submit(parse.rows).await?;
    info!(
        "Bulk processing completed. Batch: {}, Processed: {}/{}",
        batch.batch_id, batch.processed_hospitals, batch.total_hospitals
    );

    Ok(HttpResponse::Ok().json(BulkProcessingResponse::from(batch)))
}

/// Validate CSV format without processing anything
async fn validate_csv(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let (filename, content) = read_csv_upload(&mut payload).await?;
    info!("Validating CSV file: {}", filename);

    let parse = state.validator.parse(&content);
    info!(
        "CSV validation completed. Valid: {}, Rows: {}, Errors: {}",
        parse.is_valid(),
        parse.total_rows,
        parse.issues.len()
    );

    Ok(HttpResponse::Ok().json(ValidationResponse {
        is_valid: parse.is_valid(),
        total_rows: parse.total_rows,
        errors: parse.issues,
        warnings: parse.warnings,
    }))
}

/// Current status of a batch
async fn batch_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let batch_id = path.into_inner();
    let batch = state
        .registry
        .get(&batch_id)
        .await
        .ok_or_else(|| ServiceError::NotFound(format!("Batch {} not found", batch_id)))?;

    Ok(HttpResponse::Ok().json(BatchStatusResponse::from(batch)))
}

/// Full results of a completed batch
async fn batch_results(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let batch_id = path.into_inner();
    let batch = state.registry.results(&batch_id).await?;

    Ok(HttpResponse::Ok().json(BulkProcessingResponse::from(batch)))
}
