use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::application::access::Forbidden;
use crate::application::use_cases::auth::AuthError;
use crate::application::use_cases::files::FolderError;
use crate::application::use_cases::users::UserError;
use crate::domain::access::role::RoleError;
use crate::domain::attendance::session::AttendanceError;
use crate::domain::records::ValidationError;

/// Error body returned by every handler: `{ "error": code, "message": text }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", "not found")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", "authentication required")
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        let code = match status {
            StatusCode::UNAUTHORIZED => "unauthorized",
            StatusCode::FORBIDDEN => "forbidden",
            StatusCode::NOT_FOUND => "not_found",
            StatusCode::BAD_REQUEST => "bad_request",
            _ => "error",
        };
        let message = status.canonical_reason().unwrap_or("error");
        Self::new(status, code, message)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let (status, code) = classify(&err);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?err, "request_failed");
            return Self::new(status, code, "internal error");
        }
        tracing::debug!(error = %err, status = status.as_u16(), "request_rejected");
        Self::new(status, code, err.to_string())
    }
}

fn classify(err: &anyhow::Error) -> (StatusCode, &'static str) {
    if err.downcast_ref::<Forbidden>().is_some() {
        return (StatusCode::FORBIDDEN, "forbidden");
    }
    if let Some(e) = err.downcast_ref::<ValidationError>() {
        let code = match e {
            ValidationError::UnknownReference(_) => "unknown_reference",
            _ => "validation_failed",
        };
        return (StatusCode::UNPROCESSABLE_ENTITY, code);
    }
    if let Some(e) = err.downcast_ref::<AttendanceError>() {
        let code = match e {
            AttendanceError::AlreadyCheckedIn => "already_checked_in",
            AttendanceError::NotCheckedIn => "not_checked_in",
            AttendanceError::InvalidTransition { .. } => "invalid_transition",
        };
        return (StatusCode::CONFLICT, code);
    }
    if let Some(e) = err.downcast_ref::<FolderError>() {
        return match e {
            FolderError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            FolderError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            FolderError::Cycle => (StatusCode::UNPROCESSABLE_ENTITY, "folder_cycle"),
            FolderError::TooDeep(_) => (StatusCode::UNPROCESSABLE_ENTITY, "folder_too_deep"),
        };
    }
    if err.downcast_ref::<RoleError>().is_some() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "unknown_role");
    }
    if let Some(e) = err.downcast_ref::<UserError>() {
        let code = match e {
            UserError::SelfDemotion => "self_demotion",
            UserError::SelfDeletion => "self_deletion",
        };
        return (StatusCode::CONFLICT, code);
    }
    if let Some(e) = err.downcast_ref::<AuthError>() {
        return match e {
            AuthError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            AuthError::EmailTaken => (StatusCode::CONFLICT, "email_taken"),
        };
    }
    (StatusCode::INTERNAL_SERVER_ERROR, "internal")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.code,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}
