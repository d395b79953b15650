use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::auth::{Bearer, authenticate};
use super::error::ApiResult;
use crate::application::use_cases::attendance::active::ActiveAttendance;
use crate::application::use_cases::attendance::current::CurrentAttendance;
use crate::application::use_cases::attendance::history::AttendanceHistory;
use crate::application::use_cases::attendance::record_event::RecordAttendanceEvent;
use crate::bootstrap::app_context::AppContext;
use crate::domain::attendance::session::{AttendanceEvent, AttendanceSession, BreakPeriod};

#[derive(Debug, Serialize, ToSchema)]
pub struct BreakResponse {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub secs: i64,
}

impl From<&BreakPeriod> for BreakResponse {
    fn from(b: &BreakPeriod) -> Self {
        Self {
            started_at: b.started_at,
            ended_at: b.ended_at,
            secs: b.secs(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub work_date: NaiveDate,
    /// checked_in | on_break | checked_out
    pub status: String,
    pub check_in_at: DateTime<Utc>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub break_started_at: Option<DateTime<Utc>>,
    pub total_break_secs: i64,
    /// Break time including a running break.
    pub break_secs: i64,
    pub worked_secs: i64,
    pub breaks: Vec<BreakResponse>,
}

impl SessionResponse {
    fn at(s: &AttendanceSession, now: DateTime<Utc>) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            work_date: s.work_date,
            status: s.status.as_str().to_string(),
            check_in_at: s.check_in_at,
            check_out_at: s.check_out_at,
            break_started_at: s.break_started_at,
            total_break_secs: s.total_break_secs,
            break_secs: s.break_secs(now),
            worked_secs: s.worked_secs(now),
            breaks: s.breaks.iter().map(BreakResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentResponse {
    pub session: Option<SessionResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveAttendeeResponse {
    pub user_id: Uuid,
    pub name: String,
    pub session: SessionResponse,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub user_id: Option<Uuid>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/attendance", get(history))
        .route("/attendance/current", get(current))
        .route("/attendance/active", get(active))
        .route("/attendance/check-in", post(check_in))
        .route("/attendance/break/start", post(start_break))
        .route("/attendance/break/end", post(end_break))
        .route("/attendance/check-out", post(check_out))
        .with_state(ctx)
}

async fn record(
    ctx: &AppContext,
    bearer: Result<Bearer, StatusCode>,
    event: AttendanceEvent,
) -> ApiResult<Json<SessionResponse>> {
    let actor = authenticate(ctx, bearer).await?;
    let repo = ctx.attendance_repo();
    let uc = RecordAttendanceEvent {
        repo: repo.as_ref(),
    };
    let now = Utc::now();
    let session = uc.execute(&actor, event, now).await?;
    tracing::info!(
        user_id = %actor.user_id,
        event = event.as_str(),
        status = session.status.as_str(),
        "attendance_event"
    );
    Ok(Json(SessionResponse::at(&session, now)))
}

#[utoipa::path(post, path = "/api/attendance/check-in", tag = "Attendance",
    responses((status = 200, body = SessionResponse), (status = 409, description = "Already checked in")))]
pub async fn check_in(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
) -> ApiResult<Json<SessionResponse>> {
    record(&ctx, bearer, AttendanceEvent::CheckIn).await
}

#[utoipa::path(post, path = "/api/attendance/break/start", tag = "Attendance",
    responses((status = 200, body = SessionResponse), (status = 409)))]
pub async fn start_break(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
) -> ApiResult<Json<SessionResponse>> {
    record(&ctx, bearer, AttendanceEvent::StartBreak).await
}

#[utoipa::path(post, path = "/api/attendance/break/end", tag = "Attendance",
    responses((status = 200, body = SessionResponse), (status = 409)))]
pub async fn end_break(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
) -> ApiResult<Json<SessionResponse>> {
    record(&ctx, bearer, AttendanceEvent::EndBreak).await
}

#[utoipa::path(post, path = "/api/attendance/check-out", tag = "Attendance",
    responses((status = 200, body = SessionResponse), (status = 409)))]
pub async fn check_out(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
) -> ApiResult<Json<SessionResponse>> {
    record(&ctx, bearer, AttendanceEvent::CheckOut).await
}

#[utoipa::path(get, path = "/api/attendance/current", tag = "Attendance",
    responses((status = 200, body = CurrentResponse)))]
pub async fn current(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
) -> ApiResult<Json<CurrentResponse>> {
    let actor = authenticate(&ctx, bearer).await?;
    let repo = ctx.attendance_repo();
    let uc = CurrentAttendance {
        repo: repo.as_ref(),
    };
    let now = Utc::now();
    let session = uc.execute(&actor).await?;
    Ok(Json(CurrentResponse {
        session: session.map(|s| SessionResponse::at(&s, now)),
    }))
}

#[utoipa::path(get, path = "/api/attendance", tag = "Attendance", params(HistoryQuery),
    responses((status = 200, body = [SessionResponse]), (status = 403)))]
pub async fn history(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<SessionResponse>>> {
    let actor = authenticate(&ctx, bearer).await?;
    let repo = ctx.attendance_repo();
    let uc = AttendanceHistory {
        repo: repo.as_ref(),
    };
    let now = Utc::now();
    let sessions = uc.execute(&actor, q.user_id, q.from, q.to).await?;
    Ok(Json(
        sessions
            .iter()
            .map(|s| SessionResponse::at(s, now))
            .collect(),
    ))
}

#[utoipa::path(get, path = "/api/attendance/active", tag = "Attendance",
    responses((status = 200, body = [ActiveAttendeeResponse]), (status = 403)))]
pub async fn active(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
) -> ApiResult<Json<Vec<ActiveAttendeeResponse>>> {
    let actor = authenticate(&ctx, bearer).await?;
    let repo = ctx.attendance_repo();
    let uc = ActiveAttendance {
        repo: repo.as_ref(),
    };
    let now = Utc::now();
    let attendees = uc.execute(&actor).await?;
    Ok(Json(
        attendees
            .into_iter()
            .map(|a| ActiveAttendeeResponse {
                user_id: a.user_id,
                name: a.name,
                session: SessionResponse::at(&a.session, now),
            })
            .collect(),
    ))
}
