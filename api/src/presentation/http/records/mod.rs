//! HTTP surface for the catalog records. Every entity module declares its
//! request/response bodies and expands `record_api!` into the five CRUD
//! handlers plus its router.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use crate::application::access::{self, Actor};
use crate::application::use_cases::records::create_record::CreateRecord;
use crate::application::use_cases::records::delete_record::DeleteRecord;
use crate::application::use_cases::records::get_record::GetRecord;
use crate::application::use_cases::records::list_records::ListRecords;
use crate::application::use_cases::records::update_record::UpdateRecord;
use crate::bootstrap::app_context::{AppContext, RecordStore};
use crate::domain::access::role::Action;
use crate::domain::records::{Page, Record, RecordFilter, ValidationError};

pub mod beneficiaries;
pub mod distributions;
pub mod donations;
pub mod grants;
pub mod partners;
pub mod programs;
pub mod projects;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub project_id: Option<Uuid>,
    pub program_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListQuery {
    pub fn into_filter(self) -> RecordFilter {
        RecordFilter {
            q: self.q,
            status: self.status,
            project_id: self.project_id,
            program_id: self.program_id,
            ..RecordFilter::new(self.page, self.per_page)
        }
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in PATCH bodies.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Converts request bodies into domain drafts and patches.
pub trait IntoDomain<T> {
    fn into_domain(self) -> Result<T, ValidationError>;
}

pub(crate) async fn list<R>(
    ctx: &AppContext,
    actor: &Actor,
    filter: &RecordFilter,
) -> ApiResult<Page<R>>
where
    R: Record,
    AppContext: RecordStore<R>,
{
    let repo = ctx.records();
    let uc = ListRecords::new(repo.as_ref());
    Ok(uc.execute(actor, filter).await?)
}

pub(crate) async fn get<R>(ctx: &AppContext, actor: &Actor, id: Uuid) -> ApiResult<R>
where
    R: Record,
    AppContext: RecordStore<R>,
{
    let repo = ctx.records();
    let uc = GetRecord::new(repo.as_ref());
    uc.execute(actor, id).await?.ok_or_else(ApiError::not_found)
}

pub(crate) async fn create<R>(
    ctx: &AppContext,
    actor: &Actor,
    draft: Result<R::Draft, ValidationError>,
) -> ApiResult<R>
where
    R: Record,
    AppContext: RecordStore<R>,
{
    let draft = checked::<R, _>(actor, draft)?;
    let repo = ctx.records();
    let uc = CreateRecord::new(repo.as_ref());
    Ok(uc.execute(actor, &draft).await?)
}

pub(crate) async fn update<R>(
    ctx: &AppContext,
    actor: &Actor,
    id: Uuid,
    patch: Result<R::Patch, ValidationError>,
) -> ApiResult<R>
where
    R: Record,
    AppContext: RecordStore<R>,
{
    let patch = checked::<R, _>(actor, patch)?;
    let repo = ctx.records();
    let uc = UpdateRecord::new(repo.as_ref());
    uc.execute(actor, id, &patch)
        .await?
        .ok_or_else(ApiError::not_found)
}

pub(crate) async fn delete<R>(ctx: &AppContext, actor: &Actor, id: Uuid) -> ApiResult<()>
where
    R: Record,
    AppContext: RecordStore<R>,
{
    let repo = ctx.records();
    let uc = DeleteRecord::new(repo.as_ref());
    if uc.execute(actor, id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found())
    }
}

// A caller without write access gets 403 even when the body is malformed.
fn checked<R: Record, T>(actor: &Actor, body: Result<T, ValidationError>) -> ApiResult<T> {
    match body {
        Ok(v) => Ok(v),
        Err(e) => {
            access::require(actor, R::RESOURCE, Action::Write).map_err(anyhow::Error::from)?;
            Err(anyhow::Error::from(e).into())
        }
    }
}

/// Expands into `list`, `create`, `get_one`, `update`, `delete` handlers
/// and `routes(ctx)` for one record kind.
macro_rules! record_api {
    (
        record: $record:ident,
        response: $response:ident,
        page: $page:ident,
        create: $create:ident,
        patch: $patch:ident,
        tag: $tag:tt,
        api_path: $api_path:tt,
        api_item: $api_item:tt,
        route: $route:tt,
        route_item: $route_item:tt $(,)?
    ) => {
        #[derive(Debug, serde::Serialize, utoipa::ToSchema)]
        pub struct $page {
            pub items: Vec<$response>,
            pub total: i64,
            pub page: i64,
            pub per_page: i64,
        }

        impl From<$crate::domain::records::Page<$record>> for $page {
            fn from(p: $crate::domain::records::Page<$record>) -> Self {
                let p = p.map($response::from);
                Self {
                    items: p.items,
                    total: p.total,
                    page: p.page,
                    per_page: p.per_page,
                }
            }
        }

        #[utoipa::path(get, path = $api_path, tag = $tag,
            params(
                ("q" = Option<String>, Query, description = "Case-insensitive text search"),
                ("status" = Option<String>, Query, description = "Status filter"),
                ("project_id" = Option<uuid::Uuid>, Query, description = "Project filter"),
                ("program_id" = Option<uuid::Uuid>, Query, description = "Program filter"),
                ("page" = Option<i64>, Query, description = "Page, starting at 1"),
                ("per_page" = Option<i64>, Query, description = "Page size, 1..=100")
            ),
            responses((status = 200, body = $page)))]
        pub async fn list(
            axum::extract::State(ctx): axum::extract::State<$crate::bootstrap::app_context::AppContext>,
            bearer: Result<$crate::presentation::http::auth::Bearer, axum::http::StatusCode>,
            axum::extract::Query(q): axum::extract::Query<$crate::presentation::http::records::ListQuery>,
        ) -> $crate::presentation::http::error::ApiResult<axum::Json<$page>> {
            let actor = $crate::presentation::http::auth::authenticate(&ctx, bearer).await?;
            let filter = q.into_filter();
            let page = $crate::presentation::http::records::list::<$record>(&ctx, &actor, &filter).await?;
            Ok(axum::Json(page.into()))
        }

        #[utoipa::path(post, path = $api_path, tag = $tag, request_body = $create,
            responses((status = 200, body = $response), (status = 422, description = "Validation failed")))]
        pub async fn create(
            axum::extract::State(ctx): axum::extract::State<$crate::bootstrap::app_context::AppContext>,
            bearer: Result<$crate::presentation::http::auth::Bearer, axum::http::StatusCode>,
            axum::Json(body): axum::Json<$create>,
        ) -> $crate::presentation::http::error::ApiResult<axum::Json<$response>> {
            use $crate::presentation::http::records::IntoDomain;
            let actor = $crate::presentation::http::auth::authenticate(&ctx, bearer).await?;
            let record =
                $crate::presentation::http::records::create::<$record>(&ctx, &actor, body.into_domain()).await?;
            Ok(axum::Json(record.into()))
        }

        #[utoipa::path(get, path = $api_item, tag = $tag,
            params(("id" = uuid::Uuid, Path, description = "Record ID")),
            responses((status = 200, body = $response), (status = 404)))]
        pub async fn get_one(
            axum::extract::State(ctx): axum::extract::State<$crate::bootstrap::app_context::AppContext>,
            bearer: Result<$crate::presentation::http::auth::Bearer, axum::http::StatusCode>,
            axum::extract::Path(id): axum::extract::Path<uuid::Uuid>,
        ) -> $crate::presentation::http::error::ApiResult<axum::Json<$response>> {
            let actor = $crate::presentation::http::auth::authenticate(&ctx, bearer).await?;
            let record = $crate::presentation::http::records::get::<$record>(&ctx, &actor, id).await?;
            Ok(axum::Json(record.into()))
        }

        #[utoipa::path(patch, path = $api_item, tag = $tag, request_body = $patch,
            params(("id" = uuid::Uuid, Path, description = "Record ID")),
            responses((status = 200, body = $response), (status = 404), (status = 422)))]
        pub async fn update(
            axum::extract::State(ctx): axum::extract::State<$crate::bootstrap::app_context::AppContext>,
            bearer: Result<$crate::presentation::http::auth::Bearer, axum::http::StatusCode>,
            axum::extract::Path(id): axum::extract::Path<uuid::Uuid>,
            axum::Json(body): axum::Json<$patch>,
        ) -> $crate::presentation::http::error::ApiResult<axum::Json<$response>> {
            use $crate::presentation::http::records::IntoDomain;
            let actor = $crate::presentation::http::auth::authenticate(&ctx, bearer).await?;
            let record =
                $crate::presentation::http::records::update::<$record>(&ctx, &actor, id, body.into_domain()).await?;
            Ok(axum::Json(record.into()))
        }

        #[utoipa::path(delete, path = $api_item, tag = $tag,
            params(("id" = uuid::Uuid, Path, description = "Record ID")),
            responses((status = 204), (status = 404)))]
        pub async fn delete(
            axum::extract::State(ctx): axum::extract::State<$crate::bootstrap::app_context::AppContext>,
            bearer: Result<$crate::presentation::http::auth::Bearer, axum::http::StatusCode>,
            axum::extract::Path(id): axum::extract::Path<uuid::Uuid>,
        ) -> $crate::presentation::http::error::ApiResult<axum::http::StatusCode> {
            let actor = $crate::presentation::http::auth::authenticate(&ctx, bearer).await?;
            $crate::presentation::http::records::delete::<$record>(&ctx, &actor, id).await?;
            Ok(axum::http::StatusCode::NO_CONTENT)
        }

        pub fn routes(ctx: $crate::bootstrap::app_context::AppContext) -> axum::Router {
            axum::Router::new()
                .route($route, axum::routing::get(list).post(create))
                .route($route_item, axum::routing::get(get_one).patch(update).delete(delete))
                .with_state(ctx)
        }
    };
}

pub(crate) use record_api;
