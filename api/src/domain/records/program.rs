use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::validation::{self, ValidationError};
use super::{Record, text_enum};
use crate::domain::access::role::Resource;

text_enum!(ProgramStatus {
    Planned => "planned",
    Active => "active",
    Completed => "completed",
    Archived => "archived",
} default Planned);

#[derive(Debug, Clone)]
pub struct Program {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ProgramStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProgramDraft {
    pub name: String,
    pub description: Option<String>,
    pub status: ProgramStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct ProgramPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<ProgramStatus>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
}

impl Record for Program {
    type Draft = ProgramDraft;
    type Patch = ProgramPatch;

    const RESOURCE: Resource = Resource::Programs;

    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(draft: &ProgramDraft) -> Result<(), ValidationError> {
        validation::non_empty("name", &draft.name)?;
        validation::date_order("start_date", draft.start_date, "end_date", draft.end_date)
    }

    fn merge(&self, patch: &ProgramPatch) -> ProgramDraft {
        ProgramDraft {
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            status: patch.status.unwrap_or(self.status),
            start_date: patch.start_date.unwrap_or(self.start_date),
            end_date: patch.end_date.unwrap_or(self.end_date),
        }
    }
}
