use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use image_upload_backend::config::AppConfig;
use image_upload_backend::services::archive::ArchiveService;
use image_upload_backend::services::storage::LocalStorageService;
use image_upload_backend::{AppState, create_app};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "---------------------------123456789012345678901234567";

fn test_state() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        upload_dir: dir.path().to_path_buf(),
        public_base_url: "http://localhost:8080".to_string(),
        ..AppConfig::development()
    };
    let state = AppState {
        storage: Arc::new(LocalStorageService::new(config.upload_dir.clone())),
        archive: Arc::new(ArchiveService::new(config.upload_dir.clone())),
        config,
    };
    (create_app(state), dir)
}

async fn upload(app: &Router, file_name: &str, content: &[u8]) {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
            Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload")
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn list(app: &Router) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/files")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_listing_reports_size_in_kb_with_two_decimals() {
    let (app, _dir) = test_state();
    upload(&app, "photo.png", &vec![1u8; 1536]).await;

    let (status, json) = list(&app).await;
    assert_eq!(status, StatusCode::OK);

    let files = json.as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "photo.png");
    assert_eq!(files[0]["size"], "1.50");
    assert_eq!(files[0]["url"], "http://localhost:8080/uploads/photo.png");
}

#[tokio::test]
async fn test_listing_percent_encodes_urls_but_not_names() {
    let (app, _dir) = test_state();
    upload(&app, "my pic.png", b"loose bytes").await;

    let (status, json) = list(&app).await;
    assert_eq!(status, StatusCode::OK);

    let files = json.as_array().unwrap();
    assert_eq!(files[0]["name"], "my pic.png");
    assert_eq!(files[0]["url"], "http://localhost:8080/uploads/my%20pic.png");
}

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    let (app, _dir) = test_state();

    let (status, json) = list(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unreadable_directory_is_a_500() {
    let (app, dir) = test_state();
    // Removing the directory makes the scan fail outright.
    drop(dir);

    let (status, json) = list(&app).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Unable to scan files!");
}

#[tokio::test]
async fn test_health_reports_storage_reachability() {
    let (app, dir) = test_state();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage"], "available");

    // Health stays 200 even when the store is gone; only the storage field flips.
    drop(dir);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["storage"], "unavailable");
}
