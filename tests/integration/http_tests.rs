//! HTTP surface integration tests
//!
//! The full actix application runs in-process against a wiremock directory,
//! so every endpoint is exercised exactly the way callers see it.

use crate::common::fixtures::{CsvFactory, multipart_csv};
use actix_web::{App, test, web};
use hospital_bulk_rs::Config;
use hospital_bulk_rs::config::RetryConfig;
use hospital_bulk_rs::core::client::DirectoryClient;
use hospital_bulk_rs::server::routes;
use hospital_bulk_rs::server::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_state(directory_url: &str, max_per_batch: usize) -> AppState {
    let mut config = Config::default();
    config.directory.base_url = directory_url.to_string();
    config.directory.timeout_secs = 1;
    config.directory.retry = RetryConfig {
        max_attempts: 2,
        initial_delay_ms: 1,
        max_delay_ms: 2,
    };
    config.limits.max_hospitals_per_batch = max_per_batch;

    let directory = Arc::new(DirectoryClient::new(&config.directory).unwrap());
    AppState::new(config, directory)
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(routes::hospitals::configure_routes)
                .configure(routes::health::configure_routes),
        )
        .await
    };
}

async fn mount_working_directory(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/hospitals/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 7})))
        .mount(server)
        .await;
    Mock::given(method("PATCH"))
        .and(path_regex(r"^/hospitals/batch/.+/activate$"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

#[actix_web::test]
async fn test_bulk_upload_happy_path() {
    let server = MockServer::start().await;
    mount_working_directory(&server).await;
    let app = init_app!(test_state(&server.uri(), 20));

    let (content_type, body) = multipart_csv("hospitals.csv", &CsvFactory::valid(2));
    let req = test::TestRequest::post()
        .uri("/hospitals/bulk")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert!(!json["batch_id"].as_str().unwrap().is_empty());
    assert_eq!(json["total_hospitals"], 2);
    assert_eq!(json["processed_hospitals"], 2);
    assert_eq!(json["failed_hospitals"], 0);
    assert_eq!(json["batch_activated"], true);
    assert_eq!(json["hospitals"][0]["row"], 1);
    assert_eq!(json["hospitals"][0]["hospital_id"], 7);
    assert_eq!(json["hospitals"][0]["status"], "created_and_activated");
    assert_eq!(json["hospitals"][1]["row"], 2);
}

#[actix_web::test]
async fn test_bulk_upload_excludes_invalid_row() {
    let server = MockServer::start().await;
    mount_working_directory(&server).await;
    let app = init_app!(test_state(&server.uri(), 20));

    // Row 2 has an empty address and must not reach the directory.
    let (content_type, body) = multipart_csv("hospitals.csv", &CsvFactory::with_invalid_address_row());
    let req = test::TestRequest::post()
        .uri("/hospitals/bulk")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["total_hospitals"], 1);
    assert_eq!(json["processed_hospitals"], 1);
    assert_eq!(json["failed_hospitals"], 0);
    assert_eq!(json["hospitals"][0]["name"], "A");
}

#[actix_web::test]
async fn test_bulk_upload_rejects_missing_column() {
    let server = MockServer::start().await;
    let app = init_app!(test_state(&server.uri(), 20));

    let (content_type, body) =
        multipart_csv("hospitals.csv", &CsvFactory::missing_address_column());
    let req = test::TestRequest::post()
        .uri("/hospitals/bulk")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert!(
        json["detail"]
            .as_str()
            .unwrap()
            .contains("Missing required columns")
    );
}

#[actix_web::test]
async fn test_bulk_upload_rejects_non_csv_filename() {
    let server = MockServer::start().await;
    let app = init_app!(test_state(&server.uri(), 20));

    let (content_type, body) = multipart_csv("hospitals.txt", &CsvFactory::valid(1));
    let req = test::TestRequest::post()
        .uri("/hospitals/bulk")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_bulk_upload_rejects_oversized_batch() {
    let server = MockServer::start().await;
    let app = init_app!(test_state(&server.uri(), 1));

    let (content_type, body) = multipart_csv("hospitals.csv", &CsvFactory::valid(2));
    let req = test::TestRequest::post()
        .uri("/hospitals/bulk")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert!(json["detail"].as_str().unwrap().contains("Maximum allowed"));
}

#[actix_web::test]
async fn test_validate_reports_structured_issues() {
    let server = MockServer::start().await;
    let app = init_app!(test_state(&server.uri(), 20));

    let (content_type, body) = multipart_csv("hospitals.csv", &CsvFactory::with_invalid_address_row());
    let req = test::TestRequest::post()
        .uri("/hospitals/validate")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["is_valid"], false);
    assert_eq!(json["total_rows"], 2);
    assert_eq!(json["errors"].as_array().unwrap().len(), 1);
    assert_eq!(json["errors"][0]["row"], 2);
    assert_eq!(json["errors"][0]["field"], "address");
}

#[actix_web::test]
async fn test_validate_accepts_clean_file() {
    let server = MockServer::start().await;
    let app = init_app!(test_state(&server.uri(), 20));

    let (content_type, body) = multipart_csv("hospitals.csv", &CsvFactory::valid(3));
    let req = test::TestRequest::post()
        .uri("/hospitals/validate")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["is_valid"], true);
    assert_eq!(json["total_rows"], 3);
    assert!(json["errors"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_status_endpoint_after_completion() {
    let server = MockServer::start().await;
    mount_working_directory(&server).await;
    let app = init_app!(test_state(&server.uri(), 20));

    let (content_type, body) = multipart_csv("hospitals.csv", &CsvFactory::valid(2));
    let req = test::TestRequest::post()
        .uri("/hospitals/bulk")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let bulk: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let batch_id = bulk["batch_id"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/hospitals/batch/{}/status", batch_id))
        .to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["batch_id"], batch_id);
    assert_eq!(json["status"], "completed");
    assert_eq!(json["total_hospitals"], 2);
    assert_eq!(json["processed_hospitals"], 2);
    assert_eq!(json["progress_percentage"], 100.0);
    assert!(json["completed_at"].is_string());
}

#[actix_web::test]
async fn test_status_endpoint_unknown_batch_is_404() {
    let server = MockServer::start().await;
    let app = init_app!(test_state(&server.uri(), 20));

    let req = test::TestRequest::get()
        .uri("/hospitals/batch/no-such-batch/status")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn test_results_endpoint_round_trip() {
    let server = MockServer::start().await;
    mount_working_directory(&server).await;
    let app = init_app!(test_state(&server.uri(), 20));

    let (content_type, body) = multipart_csv("hospitals.csv", &CsvFactory::valid(2));
    let req = test::TestRequest::post()
        .uri("/hospitals/bulk")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let bulk: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let batch_id = bulk["batch_id"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/hospitals/batch/{}/results", batch_id))
        .to_request();
    let results: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(results, bulk);
}

#[actix_web::test]
async fn test_results_endpoint_distinguishes_missing_and_unfinished() {
    let server = MockServer::start().await;
    let state = test_state(&server.uri(), 20);
    let registry = state.registry.clone();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/hospitals/batch/no-such-batch/results")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    // A batch that exists but has not completed answers 409.
    let batch_id = registry.create(1).await;
    let req = test::TestRequest::get()
        .uri(&format!("/hospitals/batch/{}/results", batch_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 409);
}

#[actix_web::test]
async fn test_bulk_upload_with_timing_out_directory_still_completes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hospitals/"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({"id": 7}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let app = init_app!(test_state(&server.uri(), 20));

    let (content_type, body) = multipart_csv("hospitals.csv", &CsvFactory::valid(1));
    let req = test::TestRequest::post()
        .uri("/hospitals/bulk")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Every row timed out, but the batch still ran to completion.
    assert_eq!(resp.status().as_u16(), 200);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["failed_hospitals"], 1);
    assert_eq!(json["processed_hospitals"], 1);
    assert_eq!(json["batch_activated"], false);
    assert!(
        json["hospitals"][0]["error"]
            .as_str()
            .unwrap()
            .contains("2 attempts")
    );
}

#[actix_web::test]
async fn test_health_endpoint_reports_directory_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hospitals/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let app = init_app!(test_state(&server.uri(), 20));

    let req = test::TestRequest::get().uri("/health").to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["status"], "healthy");
    assert_eq!(json["hospital_api"], "connected");
}
