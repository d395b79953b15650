use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::validation::{self, ValidationError};
use super::Record;
use crate::domain::access::role::Resource;

/// Goods or services handed out to a beneficiary or a project site.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub id: Uuid,
    pub resource_name: String,
    pub quantity: i64,
    pub unit: String,
    pub beneficiary_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub distributed_on: NaiveDate,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DistributionDraft {
    pub resource_name: String,
    pub quantity: i64,
    pub unit: String,
    pub beneficiary_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub distributed_on: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DistributionPatch {
    pub resource_name: Option<String>,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub beneficiary_id: Option<Option<Uuid>>,
    pub project_id: Option<Option<Uuid>>,
    pub distributed_on: Option<NaiveDate>,
    pub notes: Option<Option<String>>,
}

impl Record for Distribution {
    type Draft = DistributionDraft;
    type Patch = DistributionPatch;

    const RESOURCE: Resource = Resource::Distributions;

    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(draft: &DistributionDraft) -> Result<(), ValidationError> {
        validation::non_empty("resource_name", &draft.resource_name)?;
        validation::non_empty("unit", &draft.unit)?;
        validation::positive("quantity", draft.quantity)
    }

    fn merge(&self, patch: &DistributionPatch) -> DistributionDraft {
        DistributionDraft {
            resource_name: patch
                .resource_name
                .clone()
                .unwrap_or_else(|| self.resource_name.clone()),
            quantity: patch.quantity.unwrap_or(self.quantity),
            unit: patch.unit.clone().unwrap_or_else(|| self.unit.clone()),
            beneficiary_id: patch.beneficiary_id.unwrap_or(self.beneficiary_id),
            project_id: patch.project_id.unwrap_or(self.project_id),
            distributed_on: patch.distributed_on.unwrap_or(self.distributed_on),
            notes: patch.notes.clone().unwrap_or_else(|| self.notes.clone()),
        }
    }
}
