//! Health check and service banner endpoints

use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::debug;

/// Configure health and banner routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/", web::get().to(service_info));
}

/// Health status including directory reachability
#[derive(Debug, Clone, serde::Serialize)]
struct HealthStatus {
    status: &'static str,
    hospital_api: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
}

/// Service banner
#[derive(Debug, Clone, serde::Serialize)]
struct ServiceInfo {
    service: &'static str,
    version: &'static str,
    status: &'static str,
    endpoints: EndpointMap,
}

/// Endpoint map shown on the banner
#[derive(Debug, Clone, serde::Serialize)]
struct EndpointMap {
    bulk_upload: &'static str,
    batch_status: &'static str,
    batch_results: &'static str,
    validate_csv: &'static str,
}

/// Basic health check endpoint
///
/// Reports degraded when the Hospital Directory API is unreachable, so
/// load balancers can route around a gateway with a dead upstream.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let api_healthy = state.directory.health_check().await;
    let health_status = HealthStatus {
        status: if api_healthy { "healthy" } else { "degraded" },
        hospital_api: if api_healthy {
            "connected"
        } else {
            "disconnected"
        },
        timestamp: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok().json(health_status))
}

/// Root endpoint with API information
async fn service_info() -> HttpResponse {
    HttpResponse::Ok().json(ServiceInfo {
        service: "Hospital Bulk Processing API",
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        endpoints: EndpointMap {
            bulk_upload: "/hospitals/bulk",
            batch_status: "/hospitals/batch/{batch_id}/status",
            batch_results: "/hospitals/batch/{batch_id}/results",
            validate_csv: "/hospitals/validate",
        },
    })
}
