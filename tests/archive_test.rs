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
use std::collections::HashSet;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;
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

fn temp_archive_names() -> HashSet<String> {
    std::fs::read_dir(std::env::temp_dir())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with("files-") && name.ends_with(".zip"))
        .collect()
}

#[tokio::test]
async fn test_zip_bundle_contains_every_stored_file() {
    let (app, _dir) = test_state();
    upload(&app, "a.png", b"alpha bytes").await;
    upload(&app, "b.png", b"bravo bytes, a little longer").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/files/zip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/zip"
    );
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"files.zip\""
    );

    let declared_length: usize = response
        .headers()
        .get("content-length")
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.len(), declared_length);

    let mut zip = zip::ZipArchive::new(std::io::Cursor::new(body.to_vec())).unwrap();
    let names: HashSet<String> = zip.file_names().map(String::from).collect();
    assert_eq!(
        names,
        HashSet::from(["a.png".to_string(), "b.png".to_string()])
    );

    let mut contents = Vec::new();
    zip.by_name("b.png")
        .unwrap()
        .read_to_end(&mut contents)
        .unwrap();
    assert_eq!(contents, b"bravo bytes, a little longer");
}

#[tokio::test]
async fn test_zip_of_empty_store_is_still_valid() {
    let (app, _dir) = test_state();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/files/zip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let zip = zip::ZipArchive::new(std::io::Cursor::new(body.to_vec())).unwrap();
    assert_eq!(zip.len(), 0);
}

#[tokio::test]
async fn test_temp_artifact_does_not_outlive_the_response() {
    let (app, _dir) = test_state();
    upload(&app, "bundled.png", b"kept exactly as long as the stream").await;

    let before = temp_archive_names();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/files/zip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Draining the body drops the response stream and the artifact with it.
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(!body.is_empty());

    // Other tests hold their own artifacts briefly; only one that persists
    // counts as leaked.
    let mut leftover: Vec<String> = Vec::new();
    for _ in 0..20 {
        leftover = temp_archive_names().difference(&before).cloned().collect();
        if leftover.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(
        leftover.is_empty(),
        "temporary archives left behind: {:?}",
        leftover
    );
}

#[tokio::test]
async fn test_concurrent_bundles_do_not_collide() {
    let (app, _dir) = test_state();
    upload(&app, "shared.png", b"everyone wants this one").await;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let response = app
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/files/zip")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            response.into_body().collect().await.unwrap().to_bytes()
        }));
    }

    for handle in handles {
        let body = handle.await.unwrap();
        let mut zip = zip::ZipArchive::new(std::io::Cursor::new(body.to_vec())).unwrap();
        let mut contents = Vec::new();
        zip.by_name("shared.png")
            .unwrap()
            .read_to_end(&mut contents)
            .unwrap();
        assert_eq!(contents, b"everyone wants this one");
    }
}
