//! File upload, listing, download, deletion, versioning, and rollback
//! handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use uuid::Uuid;

use depot_core::error::AppError;
use depot_service::file::UploadParams;

use crate::dto::request::{DownloadQuery, FileIdsRequest, ListFilesQuery};
use crate::dto::response::{FileResponse, UploadResponse, VersionResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

fn attachment_response(filename: &str, content_type: &str, data: Bytes) -> Result<Response, ApiError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| ApiError(AppError::internal(format!("Response build failed: {e}"))))
}

/// POST /api/upload — multipart `file` field plus optional `note`.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut filename: Option<String> = None;
    let mut data: Option<Bytes> = None;
    let mut note: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                filename = field.file_name().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            "note" | "notes" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                if !text.is_empty() {
                    note = Some(text);
                }
            }
            _ => {}
        }
    }

    let filename = filename.ok_or_else(|| AppError::validation("Missing filename"))?;
    let data = data.ok_or_else(|| AppError::validation("Missing file field"))?;
    let declared_size = Some(data.len() as u64);

    let outcome = state
        .upload_service
        .upload(
            &auth,
            UploadParams {
                filename,
                note,
                declared_size,
                stream: Box::pin(futures::stream::iter(vec![Ok::<_, std::io::Error>(data)])),
            },
        )
        .await?;

    Ok(Json(UploadResponse {
        file_id: outcome.file.id,
        filename: outcome.file.filename.clone(),
        size: outcome.version.size_bytes,
        version: outcome.version.version_number,
        deduplicated: outcome.was_deduplicated,
        message: format!(
            "Uploaded '{}' as version {}",
            outcome.file.filename, outcome.version.version_number
        ),
    }))
}

/// GET /api/files?search=&sort=
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let files = state
        .file_service
        .list(&auth, query.search.as_deref(), query.sort.as_deref())
        .await?;
    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

/// GET /api/files/{id}/info
pub async fn file_info(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let info = state.file_service.info(&auth, id).await?;
    Ok(Json(serde_json::json!({
        "id": info.file.id,
        "filename": info.file.filename,
        "size": info.file.size_bytes,
        "version": info.file.current_version,
        "version_count": info.version_count,
        "is_shared": info.file.share_token.is_some(),
        "uploaded_at": info.file.created_at,
        "updated_at": info.file.updated_at,
    })))
}

/// GET /api/files/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<VersionResponse>>, ApiError> {
    let versions = state.version_service.list_versions(&auth, id).await?;
    Ok(Json(versions.into_iter().map(VersionResponse::from).collect()))
}

/// GET /api/download/{id}?version=
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let result = state
        .download_service
        .download(&auth, id, query.version)
        .await?;
    attachment_response(&result.filename, "application/octet-stream", result.data)
}

/// POST /api/download-zip
pub async fn download_zip(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<FileIdsRequest>,
) -> Result<Response, ApiError> {
    let archive = state
        .download_service
        .download_zip(&auth, &req.file_ids)
        .await?;
    attachment_response("files_download.zip", "application/zip", Bytes::from(archive))
}

/// DELETE /api/delete/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.file_service.delete(&auth, id).await?;
    Ok(Json(serde_json::json!({ "message": "File deleted" })))
}

/// POST /api/delete-multiple
pub async fn delete_multiple(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<FileIdsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .file_service
        .delete_multiple(&auth, &req.file_ids)
        .await?;
    Ok(Json(serde_json::json!({
        "deleted": deleted,
        "count": deleted.len(),
    })))
}

/// POST /api/files/{id}/rollback/{version}
pub async fn rollback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, version)): Path<(Uuid, i32)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let file = state.version_service.rollback(&auth, id, version).await?;
    Ok(Json(serde_json::json!({
        "message": format!("File {} rolled back to version {}", file.id, version),
        "current_version": file.current_version,
        "size": file.size_bytes,
    })))
}
