pub mod api;
pub mod client;
pub mod config;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::archive::ArchiveService;
use crate::services::storage::StorageService;
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::files::upload::upload_file,
        api::handlers::files::list::list_files,
        api::handlers::files::manage::delete_file,
        api::handlers::files::manage::delete_all_files,
        api::handlers::files::download::serve_upload,
        api::handlers::files::archive::download_archive,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::files::types::UploadResponse,
            api::handlers::files::types::FileInfoResponse,
            api::handlers::files::types::MessageResponse,
            api::handlers::files::types::FailedDeletion,
            api::handlers::files::types::DeleteAllResponse,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "files", description = "File upload and management endpoints"),
        (name = "system", description = "Service health endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageService>,
    pub archive: Arc<ArchiveService>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/upload", post(api::handlers::files::upload_file))
        .route(
            "/files",
            get(api::handlers::files::list_files).delete(api::handlers::files::delete_all_files),
        )
        // The static segment outranks :name regardless of registration order,
        // and a static route owns every method on its path, so the delete for
        // a file literally named "zip" is wired here as well.
        .route(
            "/files/zip",
            get(api::handlers::files::download_archive)
                .delete(api::handlers::files::delete_zip_entry),
        )
        .route("/files/:name", delete(api::handlers::files::delete_file))
        .route("/uploads/:name", get(api::handlers::files::serve_upload))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_file_size + 10 * 1024 * 1024, // Add 10MB buffer for multipart overhead
        ))
        .with_state(state)
}
