use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::validation::{self, ValidationError};
use super::{Record, text_enum};
use crate::domain::access::role::Resource;

text_enum!(ProjectStatus {
    Planned => "planned",
    Active => "active",
    OnHold => "on_hold",
    Completed => "completed",
    Cancelled => "cancelled",
} default Planned);

#[derive(Debug, Clone)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub program_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub budget_cents: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub program_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub budget_cents: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub program_id: Option<Option<Uuid>>,
    pub manager_id: Option<Option<Uuid>>,
    pub budget_cents: Option<i64>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
}

impl Record for Project {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    const RESOURCE: Resource = Resource::Projects;

    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(draft: &ProjectDraft) -> Result<(), ValidationError> {
        validation::non_empty("name", &draft.name)?;
        validation::non_negative("budget_cents", draft.budget_cents)?;
        validation::date_order("start_date", draft.start_date, "end_date", draft.end_date)
    }

    fn merge(&self, patch: &ProjectPatch) -> ProjectDraft {
        ProjectDraft {
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            status: patch.status.unwrap_or(self.status),
            program_id: patch.program_id.unwrap_or(self.program_id),
            manager_id: patch.manager_id.unwrap_or(self.manager_id),
            budget_cents: patch.budget_cents.unwrap_or(self.budget_cents),
            start_date: patch.start_date.unwrap_or(self.start_date),
            end_date: patch.end_date.unwrap_or(self.end_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Clean water".into(),
            description: Some("Boreholes".into()),
            status: ProjectStatus::Active,
            program_id: Some(Uuid::new_v4()),
            manager_id: None,
            budget_cents: 100_000,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1),
            end_date: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn merge_keeps_untouched_fields_and_clears_nullable_ones() {
        let p = sample();
        let patch = ProjectPatch {
            status: Some(ProjectStatus::OnHold),
            program_id: Some(None),
            ..Default::default()
        };
        let draft = p.merge(&patch);
        assert_eq!(draft.name, "Clean water");
        assert_eq!(draft.status, ProjectStatus::OnHold);
        assert_eq!(draft.program_id, None);
        assert_eq!(draft.description.as_deref(), Some("Boreholes"));
    }

    #[test]
    fn merged_draft_is_validated_as_a_whole() {
        let p = sample();
        let patch = ProjectPatch {
            end_date: Some(NaiveDate::from_ymd_opt(2025, 12, 31)),
            ..Default::default()
        };
        assert!(matches!(
            Project::validate(&p.merge(&patch)),
            Err(ValidationError::DateOrder { .. })
        ));
    }

    #[test]
    fn status_vocabulary_is_case_insensitive() {
        assert_eq!(ProjectStatus::parse("On_Hold"), Some(ProjectStatus::OnHold));
        assert_eq!(ProjectStatus::parse("paused"), None);
    }
}
