use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{IntoDomain, double_option, record_api};
use crate::domain::records::ValidationError;
use crate::domain::records::program::{Program, ProgramDraft, ProgramPatch, ProgramStatus};
use crate::domain::records::validation::{clean, vocabulary};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgramResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Program> for ProgramResponse {
    fn from(p: Program) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            status: p.status.as_str().to_string(),
            start_date: p.start_date,
            end_date: p.end_date,
            created_by: p.created_by,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProgramRequest {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl IntoDomain<ProgramDraft> for CreateProgramRequest {
    fn into_domain(self) -> Result<ProgramDraft, ValidationError> {
        let status = match self.status.as_deref() {
            Some(raw) => vocabulary("status", raw, ProgramStatus::parse)?,
            None => ProgramStatus::default(),
        };
        Ok(ProgramDraft {
            name: self.name.trim().to_string(),
            description: clean(self.description),
            status,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProgramRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<Option<NaiveDate>>,
}

impl IntoDomain<ProgramPatch> for UpdateProgramRequest {
    fn into_domain(self) -> Result<ProgramPatch, ValidationError> {
        Ok(ProgramPatch {
            name: self.name.map(|n| n.trim().to_string()),
            description: self.description.map(clean),
            status: self
                .status
                .as_deref()
                .map(|raw| vocabulary("status", raw, ProgramStatus::parse))
                .transpose()?,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

record_api! {
    record: Program,
    response: ProgramResponse,
    page: ProgramPage,
    create: CreateProgramRequest,
    patch: UpdateProgramRequest,
    tag: "Programs",
    api_path: "/api/programs",
    api_item: "/api/programs/{id}",
    route: "/programs",
    route_item: "/programs/:id",
}
