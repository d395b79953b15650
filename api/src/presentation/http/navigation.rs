use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use super::auth::{Bearer, authenticate};
use super::error::ApiResult;
use crate::bootstrap::app_context::AppContext;
use crate::domain::access::navigation::navigation_for;

#[derive(Debug, Serialize, ToSchema)]
pub struct NavItemResponse {
    pub key: String,
    pub label: String,
    pub path: String,
    pub can_write: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NavigationResponse {
    pub role: String,
    pub items: Vec<NavItemResponse>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/navigation", get(navigation))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/navigation", tag = "Navigation", responses((status = 200, body = NavigationResponse)))]
pub async fn navigation(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
) -> ApiResult<Json<NavigationResponse>> {
    let actor = authenticate(&ctx, bearer).await?;
    let items = navigation_for(&actor.role)
        .into_iter()
        .map(|n| NavItemResponse {
            key: n.resource.key().to_string(),
            label: n.label.to_string(),
            path: n.path.to_string(),
            can_write: n.can_write,
        })
        .collect();
    Ok(Json(NavigationResponse {
        role: actor.role.as_str().to_string(),
        items,
    }))
}
