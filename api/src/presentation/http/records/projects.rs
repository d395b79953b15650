use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{IntoDomain, double_option, record_api};
use crate::domain::records::ValidationError;
use crate::domain::records::project::{Project, ProjectDraft, ProjectPatch, ProjectStatus};
use crate::domain::records::validation::{clean, vocabulary};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub program_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub budget_cents: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            status: p.status.as_str().to_string(),
            program_id: p.program_id,
            manager_id: p.manager_id,
            budget_cents: p.budget_cents,
            start_date: p.start_date,
            end_date: p.end_date,
            created_by: p.created_by,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub program_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub budget_cents: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl IntoDomain<ProjectDraft> for CreateProjectRequest {
    fn into_domain(self) -> Result<ProjectDraft, ValidationError> {
        let status = match self.status.as_deref() {
            Some(raw) => vocabulary("status", raw, ProjectStatus::parse)?,
            None => ProjectStatus::default(),
        };
        Ok(ProjectDraft {
            name: self.name.trim().to_string(),
            description: clean(self.description),
            status,
            program_id: self.program_id,
            manager_id: self.manager_id,
            budget_cents: self.budget_cents,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub program_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub manager_id: Option<Option<Uuid>>,
    pub budget_cents: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<Option<NaiveDate>>,
}

impl IntoDomain<ProjectPatch> for UpdateProjectRequest {
    fn into_domain(self) -> Result<ProjectPatch, ValidationError> {
        Ok(ProjectPatch {
            name: self.name.map(|n| n.trim().to_string()),
            description: self.description.map(clean),
            status: self
                .status
                .as_deref()
                .map(|raw| vocabulary("status", raw, ProjectStatus::parse))
                .transpose()?,
            program_id: self.program_id,
            manager_id: self.manager_id,
            budget_cents: self.budget_cents,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

record_api! {
    record: Project,
    response: ProjectResponse,
    page: ProjectPage,
    create: CreateProjectRequest,
    patch: UpdateProjectRequest,
    tag: "Projects",
    api_path: "/api/projects",
    api_item: "/api/projects/{id}",
    route: "/projects",
    route_item: "/projects/:id",
}
