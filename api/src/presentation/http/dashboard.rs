use std::collections::BTreeMap;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use super::auth::{Bearer, authenticate};
use super::error::ApiResult;
use crate::application::ports::dashboard_repository::CurrencyTotal;
use crate::application::use_cases::dashboard::get_summary::{DashboardSummary, GetDashboard};
use crate::bootstrap::app_context::AppContext;

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrencyTotalResponse {
    pub currency: String,
    pub total_cents: i64,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceNow {
    pub checked_in: i64,
    pub on_break: i64,
}

/// Sections the caller cannot read are omitted.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_by_status: Option<BTreeMap<String, i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_programs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarded_grants: Option<Vec<CurrencyTotalResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donations_last_30_days: Option<Vec<CurrencyTotalResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiaries: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partners: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributions_last_30_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<AttendanceNow>,
}

fn totals(items: Vec<CurrencyTotal>) -> Vec<CurrencyTotalResponse> {
    items
        .into_iter()
        .map(|t| CurrencyTotalResponse {
            currency: t.currency,
            total_cents: t.total_cents,
            count: t.count,
        })
        .collect()
}

impl From<DashboardSummary> for DashboardResponse {
    fn from(s: DashboardSummary) -> Self {
        Self {
            projects_by_status: s.projects_by_status.map(|v| v.into_iter().collect()),
            active_programs: s.active_programs,
            awarded_grants: s.awarded_grants.map(totals),
            donations_last_30_days: s.recent_donations.map(totals),
            beneficiaries: s.beneficiaries,
            partners: s.partners,
            distributions_last_30_days: s.recent_distributions,
            attendance: s.attendance.map(|(checked_in, on_break)| AttendanceNow {
                checked_in,
                on_break,
            }),
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/dashboard", tag = "Dashboard", responses((status = 200, body = DashboardResponse)))]
pub async fn dashboard(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
) -> ApiResult<Json<DashboardResponse>> {
    let actor = authenticate(&ctx, bearer).await?;
    let repo = ctx.dashboard_repo();
    let uc = GetDashboard {
        repo: repo.as_ref(),
    };
    let summary = uc.execute(&actor, Utc::now().date_naive()).await?;
    Ok(Json(summary.into()))
}
