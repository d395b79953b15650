use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{IntoDomain, double_option, record_api};
use crate::domain::records::ValidationError;
use crate::domain::records::beneficiary::{Beneficiary, BeneficiaryDraft, BeneficiaryPatch};
use crate::domain::records::validation::clean;

#[derive(Debug, Serialize, ToSchema)]
pub struct BeneficiaryResponse {
    pub id: Uuid,
    pub full_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub project_id: Option<Uuid>,
    pub program_id: Option<Uuid>,
    pub enrolled_on: NaiveDate,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Beneficiary> for BeneficiaryResponse {
    fn from(b: Beneficiary) -> Self {
        Self {
            id: b.id,
            full_name: b.full_name,
            gender: b.gender,
            date_of_birth: b.date_of_birth,
            location: b.location,
            contact: b.contact,
            project_id: b.project_id,
            program_id: b.program_id,
            enrolled_on: b.enrolled_on,
            notes: b.notes,
            created_by: b.created_by,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBeneficiaryRequest {
    pub full_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub project_id: Option<Uuid>,
    pub program_id: Option<Uuid>,
    /// Defaults to today.
    pub enrolled_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl IntoDomain<BeneficiaryDraft> for CreateBeneficiaryRequest {
    fn into_domain(self) -> Result<BeneficiaryDraft, ValidationError> {
        Ok(BeneficiaryDraft {
            full_name: self.full_name.trim().to_string(),
            gender: clean(self.gender),
            date_of_birth: self.date_of_birth,
            location: clean(self.location),
            contact: clean(self.contact),
            project_id: self.project_id,
            program_id: self.program_id,
            enrolled_on: self.enrolled_on.unwrap_or_else(|| Utc::now().date_naive()),
            notes: clean(self.notes),
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBeneficiaryRequest {
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contact: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub project_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub program_id: Option<Option<Uuid>>,
    pub enrolled_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl IntoDomain<BeneficiaryPatch> for UpdateBeneficiaryRequest {
    fn into_domain(self) -> Result<BeneficiaryPatch, ValidationError> {
        Ok(BeneficiaryPatch {
            full_name: self.full_name.map(|n| n.trim().to_string()),
            gender: self.gender.map(clean),
            date_of_birth: self.date_of_birth,
            location: self.location.map(clean),
            contact: self.contact.map(clean),
            project_id: self.project_id,
            program_id: self.program_id,
            enrolled_on: self.enrolled_on,
            notes: self.notes.map(clean),
        })
    }
}

record_api! {
    record: Beneficiary,
    response: BeneficiaryResponse,
    page: BeneficiaryPage,
    create: CreateBeneficiaryRequest,
    patch: UpdateBeneficiaryRequest,
    tag: "Beneficiaries",
    api_path: "/api/beneficiaries",
    api_item: "/api/beneficiaries/{id}",
    route: "/beneficiaries",
    route_item: "/beneficiaries/:id",
}
