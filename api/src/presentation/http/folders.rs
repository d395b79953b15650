use axum::{
    Json, Router,
    extract::{Path, Query, State},
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
use super::files::{FileResponse, ShareRequest, ShareResponse};
use super::records::double_option;
use crate::application::use_cases::files::ShareMode;
use crate::application::use_cases::files::create_folder::CreateFolder;
use crate::application::use_cases::files::delete_folder::DeleteFolder;
use crate::application::use_cases::files::download_folder::DownloadFolder;
use crate::application::use_cases::files::get_folder::GetFolder;
use crate::application::use_cases::files::list_folder::ListFolder;
use crate::application::use_cases::files::share_folder::ShareFolder;
use crate::application::use_cases::files::update_folder::{FolderPatch, UpdateFolder};
use crate::bootstrap::app_context::AppContext;
use crate::domain::files::folder::Folder;

#[derive(Debug, Serialize, ToSchema)]
pub struct FolderResponse {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub shared_with: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Folder> for FolderResponse {
    fn from(f: Folder) -> Self {
        Self {
            id: f.id,
            name: f.name,
            parent_id: f.parent_id,
            owner_id: f.owner_id,
            shared_with: f.shared_with,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FolderListingResponse {
    pub folder: Option<FolderResponse>,
    pub folders: Vec<FolderResponse>,
    pub files: Vec<FileResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FolderDetailResponse {
    pub folder: FolderResponse,
    /// Breadcrumb, outermost first.
    pub path: Vec<FolderResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteFolderResponse {
    pub folders_deleted: usize,
    pub files_deleted: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFolderRequest {
    pub name: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateFolderRequest {
    pub name: Option<String>,
    /// `null` moves the folder to the top level.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Option<Option<Uuid>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListFolderQuery {
    pub parent_id: Option<Uuid>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/folders", get(list_folder).post(create_folder))
        .route(
            "/folders/:id",
            get(get_folder).patch(update_folder).delete(delete_folder),
        )
        .route("/folders/:id/share", post(share_folder))
        .route("/folders/:id/unshare", post(unshare_folder))
        .route("/folders/:id/download", get(download_folder))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/folders", tag = "Folders", request_body = CreateFolderRequest,
    responses((status = 200, body = FolderResponse), (status = 404, description = "Parent not visible")))]
pub async fn create_folder(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Json(req): Json<CreateFolderRequest>,
) -> ApiResult<Json<FolderResponse>> {
    let actor = authenticate(&ctx, bearer).await?;
    let folders = ctx.folder_repo();
    let uc = CreateFolder {
        folders: folders.as_ref(),
        max_depth: ctx.cfg.max_folder_depth,
    };
    let folder = uc.execute(&actor, &req.name, req.parent_id).await?;
    Ok(Json(folder.into()))
}

#[utoipa::path(get, path = "/api/folders", tag = "Folders",
    params(("parent_id" = Option<Uuid>, Query, description = "Parent folder; top level when absent")),
    responses((status = 200, body = FolderListingResponse)))]
pub async fn list_folder(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    q: Option<Query<ListFolderQuery>>,
) -> ApiResult<Json<FolderListingResponse>> {
    let actor = authenticate(&ctx, bearer).await?;
    let parent_id = q.and_then(|Query(q)| q.parent_id);
    let folders = ctx.folder_repo();
    let files = ctx.files_repo();
    let uc = ListFolder {
        folders: folders.as_ref(),
        files: files.as_ref(),
    };
    let listing = uc.execute(&actor, parent_id).await?;
    Ok(Json(FolderListingResponse {
        folder: listing.folder.map(Into::into),
        folders: listing.folders.into_iter().map(Into::into).collect(),
        files: listing.files.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(get, path = "/api/folders/{id}", tag = "Folders",
    params(("id" = Uuid, Path, description = "Folder ID")),
    responses((status = 200, body = FolderDetailResponse), (status = 404)))]
pub async fn get_folder(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FolderDetailResponse>> {
    let actor = authenticate(&ctx, bearer).await?;
    let folders = ctx.folder_repo();
    let uc = GetFolder {
        folders: folders.as_ref(),
        max_depth: ctx.cfg.max_folder_depth,
    };
    let view = uc
        .execute(&actor, id)
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(FolderDetailResponse {
        folder: view.folder.into(),
        path: view.path.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(patch, path = "/api/folders/{id}", tag = "Folders", request_body = UpdateFolderRequest,
    params(("id" = Uuid, Path, description = "Folder ID")),
    responses((status = 200, body = FolderResponse), (status = 403), (status = 404), (status = 422)))]
pub async fn update_folder(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateFolderRequest>,
) -> ApiResult<Json<FolderResponse>> {
    let actor = authenticate(&ctx, bearer).await?;
    let folders = ctx.folder_repo();
    let uc = UpdateFolder {
        folders: folders.as_ref(),
        max_depth: ctx.cfg.max_folder_depth,
    };
    let patch = FolderPatch {
        name: req.name,
        parent_id: req.parent_id,
    };
    let folder = uc.execute(&actor, id, &patch).await?;
    Ok(Json(folder.into()))
}

#[utoipa::path(delete, path = "/api/folders/{id}", tag = "Folders",
    params(("id" = Uuid, Path, description = "Folder ID")),
    responses((status = 200, body = DeleteFolderResponse), (status = 403), (status = 404), (status = 422)))]
pub async fn delete_folder(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteFolderResponse>> {
    let actor = authenticate(&ctx, bearer).await?;
    let folders = ctx.folder_repo();
    let files = ctx.files_repo();
    let storage = ctx.storage_port();
    let uc = DeleteFolder {
        folders: folders.as_ref(),
        files: files.as_ref(),
        storage: storage.as_ref(),
        max_depth: ctx.cfg.max_folder_depth,
    };
    let report = uc.execute(&actor, id).await?;
    Ok(Json(DeleteFolderResponse {
        folders_deleted: report.folders_deleted,
        files_deleted: report.files_deleted,
    }))
}

async fn share_folder_with(
    ctx: &AppContext,
    bearer: Result<Bearer, StatusCode>,
    id: Uuid,
    user_ids: &[Uuid],
    mode: ShareMode,
) -> ApiResult<Json<ShareResponse>> {
    let actor = authenticate(ctx, bearer).await?;
    let folders = ctx.folder_repo();
    let files = ctx.files_repo();
    let uc = ShareFolder {
        folders: folders.as_ref(),
        files: files.as_ref(),
        max_depth: ctx.cfg.max_folder_depth,
    };
    let updated = uc.execute(&actor, id, user_ids, mode).await?;
    Ok(Json(ShareResponse { updated }))
}

#[utoipa::path(post, path = "/api/folders/{id}/share", tag = "Folders", request_body = ShareRequest,
    params(("id" = Uuid, Path, description = "Folder ID")),
    responses((status = 200, body = ShareResponse), (status = 403), (status = 404)))]
pub async fn share_folder(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
    Json(req): Json<ShareRequest>,
) -> ApiResult<Json<ShareResponse>> {
    share_folder_with(&ctx, bearer, id, &req.user_ids, ShareMode::Grant).await
}

#[utoipa::path(post, path = "/api/folders/{id}/unshare", tag = "Folders", request_body = ShareRequest,
    params(("id" = Uuid, Path, description = "Folder ID")),
    responses((status = 200, body = ShareResponse), (status = 403), (status = 404)))]
pub async fn unshare_folder(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
    Json(req): Json<ShareRequest>,
) -> ApiResult<Json<ShareResponse>> {
    share_folder_with(&ctx, bearer, id, &req.user_ids, ShareMode::Revoke).await
}

#[utoipa::path(get, path = "/api/folders/{id}/download", tag = "Folders",
    params(("id" = Uuid, Path, description = "Folder ID")),
    responses((status = 200, description = "Zip archive", content_type = "application/zip", body = Vec<u8>), (status = 404)))]
pub async fn download_folder(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let actor = authenticate(&ctx, bearer).await?;
    let folders = ctx.folder_repo();
    let files = ctx.files_repo();
    let storage = ctx.storage_port();
    let uc = DownloadFolder {
        folders: folders.as_ref(),
        files: files.as_ref(),
        storage: storage.as_ref(),
        max_depth: ctx.cfg.max_folder_depth,
    };
    let archive = uc.execute(&actor, id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/zip"));
    let disposition = format!(
        "attachment; filename=\"{}\"",
        archive.filename.replace('"', "")
    );
    if let Ok(v) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, v);
    }
    Ok((headers, archive.bytes).into_response())
}
