use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{IntoDomain, double_option, record_api};
use crate::domain::records::ValidationError;
use crate::domain::records::grant::{Grant, GrantDraft, GrantPatch, GrantStatus};
use crate::domain::records::validation::{normalize_currency, vocabulary};

#[derive(Debug, Serialize, ToSchema)]
pub struct GrantResponse {
    pub id: Uuid,
    pub title: String,
    pub partner_id: Option<Uuid>,
    pub funder_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub project_id: Option<Uuid>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Grant> for GrantResponse {
    fn from(g: Grant) -> Self {
        Self {
            id: g.id,
            title: g.title,
            partner_id: g.partner_id,
            funder_name: g.funder_name,
            amount_cents: g.amount_cents,
            currency: g.currency,
            status: g.status.as_str().to_string(),
            project_id: g.project_id,
            starts_on: g.starts_on,
            ends_on: g.ends_on,
            created_by: g.created_by,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGrantRequest {
    pub title: String,
    pub partner_id: Option<Uuid>,
    #[serde(default)]
    pub funder_name: String,
    #[serde(default)]
    pub amount_cents: i64,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub project_id: Option<Uuid>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

impl IntoDomain<GrantDraft> for CreateGrantRequest {
    fn into_domain(self) -> Result<GrantDraft, ValidationError> {
        let status = match self.status.as_deref() {
            Some(raw) => vocabulary("status", raw, GrantStatus::parse)?,
            None => GrantStatus::default(),
        };
        Ok(GrantDraft {
            title: self.title.trim().to_string(),
            partner_id: self.partner_id,
            funder_name: self.funder_name.trim().to_string(),
            amount_cents: self.amount_cents,
            currency: normalize_currency(self.currency.as_deref().unwrap_or("USD")),
            status,
            project_id: self.project_id,
            starts_on: self.starts_on,
            ends_on: self.ends_on,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateGrantRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub partner_id: Option<Option<Uuid>>,
    pub funder_name: Option<String>,
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub project_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub starts_on: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub ends_on: Option<Option<NaiveDate>>,
}

impl IntoDomain<GrantPatch> for UpdateGrantRequest {
    fn into_domain(self) -> Result<GrantPatch, ValidationError> {
        Ok(GrantPatch {
            title: self.title.map(|t| t.trim().to_string()),
            partner_id: self.partner_id,
            funder_name: self.funder_name.map(|f| f.trim().to_string()),
            amount_cents: self.amount_cents,
            currency: self.currency,
            status: self
                .status
                .as_deref()
                .map(|raw| vocabulary("status", raw, GrantStatus::parse))
                .transpose()?,
            project_id: self.project_id,
            starts_on: self.starts_on,
            ends_on: self.ends_on,
        })
    }
}

record_api! {
    record: Grant,
    response: GrantResponse,
    page: GrantPage,
    create: CreateGrantRequest,
    patch: UpdateGrantRequest,
    tag: "Grants",
    api_path: "/api/grants",
    api_item: "/api/grants/{id}",
    route: "/grants",
    route_item: "/grants/:id",
}
