use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::{Bearer, authenticate};
use super::error::{ApiError, ApiResult};
use super::folders::FolderResponse;
use crate::application::use_cases::files::ShareMode;
use crate::application::use_cases::files::delete_file::DeleteFile;
use crate::application::use_cases::files::get_file::GetFile;
use crate::application::use_cases::files::get_file_content::GetFileContent;
use crate::application::use_cases::files::list_shared::ListShared;
use crate::application::use_cases::files::share_file::ShareFile;
use crate::application::use_cases::files::upload_file::UploadFile;
use crate::bootstrap::app_context::AppContext;
use crate::domain::files::folder::StoredFile;

#[derive(Debug, Serialize, ToSchema)]
pub struct FileResponse {
    pub id: Uuid,
    pub name: String,
    pub folder_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub content_type: Option<String>,
    pub size: i64,
    pub content_hash: Option<String>,
    pub shared_with: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<StoredFile> for FileResponse {
    fn from(f: StoredFile) -> Self {
        Self {
            id: f.id,
            name: f.name,
            folder_id: f.folder_id,
            owner_id: f.owner_id,
            content_type: f.content_type,
            size: f.size,
            content_hash: f.content_hash,
            shared_with: f.shared_with,
            created_at: f.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShareRequest {
    pub user_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShareResponse {
    /// Number of folder and file records whose sharing list changed.
    pub updated: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SharedWithMeResponse {
    pub folders: Vec<FolderResponse>,
    pub files: Vec<FileResponse>,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadFileMultipart {
    /// File to upload
    #[schema(value_type = String, format = Binary)]
    file: String,
    /// Target folder; top level when absent
    #[schema(value_type = Option<String>, format = Uuid)]
    folder_id: Option<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/files", post(upload_file))
        .route("/files/shared", get(list_shared))
        .route("/files/:id", get(get_file).delete(delete_file))
        .route("/files/:id/content", get(get_file_content))
        .route("/files/:id/share", post(share_file))
        .route("/files/:id/unshare", post(unshare_file))
        .with_state(ctx)
}

/// POST /api/files (multipart/form-data)
/// Fields:
/// - file: binary file (required)
/// - folder_id: uuid (optional)
#[utoipa::path(
    post,
    path = "/api/files",
    tag = "Files",
    request_body(
        content = UploadFileMultipart,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "File uploaded", body = FileResponse),
        (status = 400, description = "Missing file field"),
        (status = 413, description = "File too large")
    )
)]
pub async fn upload_file(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    mut multipart: Multipart,
) -> ApiResult<Json<FileResponse>> {
    let actor = authenticate(&ctx, bearer).await?;

    let mut folder_id: Option<Uuid> = None;
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut orig_filename: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("folder_id") => {
                let t = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
                let t = t.trim();
                if !t.is_empty() {
                    folder_id = Some(
                        Uuid::parse_str(t).map_err(|_| ApiError::bad_request("invalid folder_id"))?,
                    );
                }
            }
            Some("file") => {
                orig_filename = field.file_name().map(|s| s.to_string());
                content_type = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
                // Enforce configured max upload size (besides DefaultBodyLimit)
                if data.len() > ctx.cfg.upload_max_bytes {
                    return Err(StatusCode::PAYLOAD_TOO_LARGE.into());
                }
                file_bytes = Some(data.to_vec());
            }
            _ => { /* ignore additional fields */ }
        }
    }

    let bytes = file_bytes.ok_or_else(|| ApiError::bad_request("missing file field"))?;

    let files = ctx.files_repo();
    let folders = ctx.folder_repo();
    let storage = ctx.storage_port();
    let uc = UploadFile {
        files: files.as_ref(),
        folders: folders.as_ref(),
        storage: storage.as_ref(),
    };
    let file = uc
        .execute(&actor, folder_id, bytes, orig_filename, content_type)
        .await?;
    Ok(Json(file.into()))
}

#[utoipa::path(get, path = "/api/files/{id}", tag = "Files",
    params(("id" = Uuid, Path, description = "File ID")),
    responses((status = 200, body = FileResponse), (status = 404)))]
pub async fn get_file(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FileResponse>> {
    let actor = authenticate(&ctx, bearer).await?;
    let files = ctx.files_repo();
    let uc = GetFile {
        files: files.as_ref(),
    };
    let file = uc
        .execute(&actor, id)
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(file.into()))
}

#[utoipa::path(get, path = "/api/files/{id}/content", tag = "Files",
    params(("id" = Uuid, Path, description = "File ID")),
    responses((status = 200, description = "File bytes", body = Vec<u8>), (status = 404)))]
pub async fn get_file_content(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let actor = authenticate(&ctx, bearer).await?;
    let files = ctx.files_repo();
    let storage = ctx.storage_port();
    let uc = GetFileContent {
        files: files.as_ref(),
        storage: storage.as_ref(),
    };
    let content = uc
        .execute(&actor, id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    let mut headers = HeaderMap::new();
    let ct = content
        .file
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(ct)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    let disposition = format!(
        "inline; filename=\"{}\"",
        content.file.name.replace('"', "")
    );
    if let Ok(v) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, v);
    }
    Ok((headers, content.bytes).into_response())
}

#[utoipa::path(delete, path = "/api/files/{id}", tag = "Files",
    params(("id" = Uuid, Path, description = "File ID")),
    responses((status = 204), (status = 403), (status = 404)))]
pub async fn delete_file(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let actor = authenticate(&ctx, bearer).await?;
    let files = ctx.files_repo();
    let storage = ctx.storage_port();
    let uc = DeleteFile {
        files: files.as_ref(),
        storage: storage.as_ref(),
    };
    uc.execute(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn share_file_with(
    ctx: &AppContext,
    bearer: Result<Bearer, StatusCode>,
    id: Uuid,
    user_ids: &[Uuid],
    mode: ShareMode,
) -> ApiResult<Json<FileResponse>> {
    let actor = authenticate(ctx, bearer).await?;
    let files = ctx.files_repo();
    let uc = ShareFile {
        files: files.as_ref(),
    };
    let file = uc.execute(&actor, id, user_ids, mode).await?;
    Ok(Json(file.into()))
}

#[utoipa::path(post, path = "/api/files/{id}/share", tag = "Files", request_body = ShareRequest,
    params(("id" = Uuid, Path, description = "File ID")),
    responses((status = 200, body = FileResponse), (status = 403), (status = 404)))]
pub async fn share_file(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
    Json(req): Json<ShareRequest>,
) -> ApiResult<Json<FileResponse>> {
    share_file_with(&ctx, bearer, id, &req.user_ids, ShareMode::Grant).await
}

#[utoipa::path(post, path = "/api/files/{id}/unshare", tag = "Files", request_body = ShareRequest,
    params(("id" = Uuid, Path, description = "File ID")),
    responses((status = 200, body = FileResponse), (status = 403), (status = 404)))]
pub async fn unshare_file(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
    Json(req): Json<ShareRequest>,
) -> ApiResult<Json<FileResponse>> {
    share_file_with(&ctx, bearer, id, &req.user_ids, ShareMode::Revoke).await
}

#[utoipa::path(get, path = "/api/files/shared", tag = "Files", responses((status = 200, body = SharedWithMeResponse)))]
pub async fn list_shared(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
) -> ApiResult<Json<SharedWithMeResponse>> {
    let actor = authenticate(&ctx, bearer).await?;
    let folders = ctx.folder_repo();
    let files = ctx.files_repo();
    let uc = ListShared {
        folders: folders.as_ref(),
        files: files.as_ref(),
    };
    let shared = uc.execute(&actor).await?;
    Ok(Json(SharedWithMeResponse {
        folders: shared.folders.into_iter().map(Into::into).collect(),
        files: shared.files.into_iter().map(Into::into).collect(),
    }))
}
