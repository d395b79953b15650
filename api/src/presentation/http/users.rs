use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::{Bearer, UserResponse, authenticate};
use super::error::{ApiError, ApiResult};
use crate::application::ports::user_repository::UserRow;
use crate::application::use_cases::users::delete_user::DeleteUser;
use crate::application::use_cases::users::directory::UserDirectory;
use crate::application::use_cases::users::list_users::ListUsers;
use crate::application::use_cases::users::update_role::UpdateRole;
use crate::bootstrap::app_context::AppContext;
use crate::domain::records::Page;

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserPage {
    pub items: Vec<UserResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

impl From<Page<UserRow>> for UserPage {
    fn from(p: Page<UserRow>) -> Self {
        let p = p.map(UserResponse::from);
        Self {
            items: p.items,
            total: p.total,
            page: p.page,
            per_page: p.per_page,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DirectoryEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/directory", get(directory))
        .route("/users/:id/role", patch(update_role))
        .route("/users/:id", delete(delete_user))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/users", tag = "Users",
    params(
        ("q" = Option<String>, Query, description = "Match on name or email"),
        ("page" = Option<i64>, Query, description = "Page, starting at 1"),
        ("per_page" = Option<i64>, Query, description = "Page size, 1..=100")
    ),
    responses((status = 200, body = UserPage), (status = 403)))]
pub async fn list_users(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    q: Option<Query<ListUsersQuery>>,
) -> ApiResult<Json<UserPage>> {
    let actor = authenticate(&ctx, bearer).await?;
    let q = q.map(|Query(q)| q).unwrap_or_default();
    let repo = ctx.user_repo();
    let uc = ListUsers {
        repo: repo.as_ref(),
    };
    let page = uc.execute(&actor, q.q, q.page, q.per_page).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(get, path = "/api/users/directory", tag = "Users", responses((status = 200, body = [DirectoryEntry])))]
pub async fn directory(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
) -> ApiResult<Json<Vec<DirectoryEntry>>> {
    authenticate(&ctx, bearer).await?;
    let repo = ctx.user_repo();
    let uc = UserDirectory {
        repo: repo.as_ref(),
    };
    let items = uc
        .execute()
        .await?
        .into_iter()
        .map(|u| DirectoryEntry {
            id: u.id,
            name: u.name,
            email: u.email,
        })
        .collect();
    Ok(Json(items))
}

#[utoipa::path(patch, path = "/api/users/{id}/role", tag = "Users", request_body = UpdateRoleRequest,
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 200, body = UserResponse), (status = 404), (status = 409), (status = 422)))]
pub async fn update_role(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<UserResponse>> {
    let actor = authenticate(&ctx, bearer).await?;
    let repo = ctx.user_repo();
    let uc = UpdateRole {
        repo: repo.as_ref(),
    };
    let user = uc
        .execute(&actor, id, &req.role)
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(user.into()))
}

#[utoipa::path(delete, path = "/api/users/{id}", tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 204), (status = 404), (status = 409)))]
pub async fn delete_user(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let actor = authenticate(&ctx, bearer).await?;
    let users = ctx.user_repo();
    let folders = ctx.folder_repo();
    let files = ctx.files_repo();
    let storage = ctx.storage_port();
    let uc = DeleteUser {
        users: users.as_ref(),
        folders: folders.as_ref(),
        files: files.as_ref(),
        storage: storage.as_ref(),
        max_depth: ctx.cfg.max_folder_depth,
    };
    if uc.execute(&actor, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found())
    }
}
