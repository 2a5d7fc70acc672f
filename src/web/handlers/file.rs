//! File handlers for Web API.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::store::{download, UploadItem};
use crate::web::dto::{FileEntry, FileListResponse, UploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::FiledropError;

/// Multipart field carrying uploaded files.
pub const UPLOAD_FIELD: &str = "files";

/// Content-Disposition value for a stored file.
///
/// Stored names only contain `[A-Za-z0-9._ ()-]`, so they can be quoted as-is.
fn content_disposition_header(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename)
}

/// Plain-text 404 used for downloads.
fn download_not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// POST /api/upload - Upload files.
///
/// Request body: multipart/form-data with zero or more `files` parts. Parts
/// without a usable filename are skipped.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "files",
    responses(
        (status = 200, description = "Number of files stored", body = UploadResponse),
        (status = 400, description = "Malformed multipart body"),
        (status = 413, description = "Upload too large"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut items = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Failed to read multipart field: {}", e);
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large("Upload too large")
        } else {
            ApiError::bad_request("Invalid multipart data")
        }
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let content = field.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read file content: {}", e);
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::payload_too_large("Upload too large")
            } else {
                ApiError::bad_request("Failed to read file")
            }
        })?;

        items.push(UploadItem {
            file_name,
            content: Some(content.to_vec()),
        });
    }

    let uploads = state.uploads.clone();
    let outcome = tokio::task::spawn_blocking(move || uploads.save_batch(items))
        .await
        .map_err(|e| {
            tracing::error!("Upload task failed: {}", e);
            ApiError::internal("Failed to save files")
        })??;

    if outcome.skipped > 0 {
        tracing::info!(
            saved = outcome.saved(),
            skipped = outcome.skipped,
            "Upload batch finished with skipped files"
        );
    }

    Ok(Json(UploadResponse::new(outcome.saved())))
}

/// GET /api/files - List stored files.
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    responses(
        (status = 200, description = "Stored files, most recent first", body = FileListResponse)
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FileListResponse>, ApiError> {
    let catalog = state.catalog.clone();
    let entries = tokio::task::spawn_blocking(move || catalog.list())
        .await
        .map_err(|e| {
            tracing::error!("Listing task failed: {}", e);
            ApiError::internal("Failed to list files")
        })??;

    let files = entries.into_iter().map(FileEntry::from).collect();

    Ok(Json(FileListResponse::new(files)))
}

/// GET /d/:name - Download a file.
#[utoipa::path(
    get,
    path = "/d/{name}",
    tag = "files",
    params(
        ("name" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = String, content_type = "text/plain")
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let dir = state.dir.clone();
    let loaded = tokio::task::spawn_blocking(move || {
        let target = download::lookup(dir.as_ref(), &name)?;
        let content = dir.read(&target.name)?;
        Ok::<_, FiledropError>((target, content))
    })
    .await;

    let (target, content) = match loaded {
        Ok(Ok(found)) => found,
        Ok(Err(FiledropError::NotFound(what))) => {
            tracing::debug!("Download miss: {}", what);
            return download_not_found();
        }
        Ok(Err(e)) => return ApiError::from(e).into_response(),
        Err(e) => {
            tracing::error!("Download task failed: {}", e);
            return ApiError::internal("Failed to load file").into_response();
        }
    };

    Response::builder()
        .header(header::CONTENT_TYPE, &target.content_type)
        .header(header::CONTENT_LENGTH, content.len())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&target.name),
        )
        .body(Body::from(content))
        .unwrap_or_else(|e| {
            tracing::error!("Failed to build download response: {}", e);
            ApiError::internal("Failed to load file").into_response()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_header() {
        assert_eq!(
            content_disposition_header("report (1).pdf"),
            "attachment; filename=\"report (1).pdf\""
        );
    }

    #[test]
    fn test_download_not_found() {
        let response = download_not_found();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
