//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::dto::{FileEntry, FileListResponse, UploadResponse};
use super::handlers::{download_file, list_files, upload_files, AppState};

/// OpenAPI document for the Web API.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::handlers::file::upload_files,
        crate::web::handlers::file::list_files,
        crate::web::handlers::file::download_file
    ),
    components(schemas(UploadResponse, FileListResponse, FileEntry)),
    tags((name = "files", description = "Upload, list and download files"))
)]
pub struct ApiDoc;

/// Create the main API router.
///
/// `max_upload_bytes` limits the upload request body; `None` disables the
/// limit.
pub fn create_router(app_state: Arc<AppState>, max_upload_bytes: Option<usize>) -> Router {
    let body_limit = match max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let api_routes = Router::new()
        .route("/upload", post(upload_files).layer(body_limit))
        .route("/files", get(list_files));

    Router::new()
        .nest("/api", api_routes)
        .route("/d/*name", get(download_file))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

/// Create the router for the static pages under `public_dir`.
pub fn create_static_router(public_dir: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(public_dir.join("index.html")))
        .route_service(
            "/downloads.html",
            ServeFile::new(public_dir.join("downloads.html")),
        )
        .nest_service("/public", ServeDir::new(public_dir))
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the router serving the OpenAPI document.
pub fn create_openapi_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// OpenAPI document handler.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
