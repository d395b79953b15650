use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{IntoDomain, double_option, record_api};
use crate::domain::records::ValidationError;
use crate::domain::records::distribution::{Distribution, DistributionDraft, DistributionPatch};
use crate::domain::records::validation::clean;

#[derive(Debug, Serialize, ToSchema)]
pub struct DistributionResponse {
    pub id: Uuid,
    pub resource_name: String,
    pub quantity: i64,
    pub unit: String,
    pub beneficiary_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub distributed_on: NaiveDate,
    pub notes: Option<String>,
    /// The user who recorded the hand-out.
    pub distributed_by: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Distribution> for DistributionResponse {
    fn from(d: Distribution) -> Self {
        Self {
            id: d.id,
            resource_name: d.resource_name,
            quantity: d.quantity,
            unit: d.unit,
            beneficiary_id: d.beneficiary_id,
            project_id: d.project_id,
            distributed_on: d.distributed_on,
            notes: d.notes,
            distributed_by: d.created_by,
            created_by: d.created_by,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDistributionRequest {
    pub resource_name: String,
    pub quantity: i64,
    pub unit: String,
    pub beneficiary_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    /// Defaults to today.
    pub distributed_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl IntoDomain<DistributionDraft> for CreateDistributionRequest {
    fn into_domain(self) -> Result<DistributionDraft, ValidationError> {
        Ok(DistributionDraft {
            resource_name: self.resource_name.trim().to_string(),
            quantity: self.quantity,
            unit: self.unit.trim().to_string(),
            beneficiary_id: self.beneficiary_id,
            project_id: self.project_id,
            distributed_on: self.distributed_on.unwrap_or_else(|| Utc::now().date_naive()),
            notes: clean(self.notes),
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateDistributionRequest {
    pub resource_name: Option<String>,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub beneficiary_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub project_id: Option<Option<Uuid>>,
    pub distributed_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl IntoDomain<DistributionPatch> for UpdateDistributionRequest {
    fn into_domain(self) -> Result<DistributionPatch, ValidationError> {
        Ok(DistributionPatch {
            resource_name: self.resource_name.map(|n| n.trim().to_string()),
            quantity: self.quantity,
            unit: self.unit.map(|u| u.trim().to_string()),
            beneficiary_id: self.beneficiary_id,
            project_id: self.project_id,
            distributed_on: self.distributed_on,
            notes: self.notes.map(clean),
        })
    }
}

record_api! {
    record: Distribution,
    response: DistributionResponse,
    page: DistributionPage,
    create: CreateDistributionRequest,
    patch: UpdateDistributionRequest,
    tag: "Distributions",
    api_path: "/api/distributions",
    api_item: "/api/distributions/{id}",
    route: "/distributions",
    route_item: "/distributions/:id",
}
