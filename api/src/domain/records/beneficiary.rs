use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::validation::{self, ValidationError};
use super::Record;
use crate::domain::access::role::Resource;

#[derive(Debug, Clone)]
pub struct Beneficiary {
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

#[derive(Debug, Clone)]
pub struct BeneficiaryDraft {
    pub full_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub project_id: Option<Uuid>,
    pub program_id: Option<Uuid>,
    pub enrolled_on: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BeneficiaryPatch {
    pub full_name: Option<String>,
    pub gender: Option<Option<String>>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub location: Option<Option<String>>,
    pub contact: Option<Option<String>>,
    pub project_id: Option<Option<Uuid>>,
    pub program_id: Option<Option<Uuid>>,
    pub enrolled_on: Option<NaiveDate>,
    pub notes: Option<Option<String>>,
}

impl Record for Beneficiary {
    type Draft = BeneficiaryDraft;
    type Patch = BeneficiaryPatch;

    const RESOURCE: Resource = Resource::Beneficiaries;

    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(draft: &BeneficiaryDraft) -> Result<(), ValidationError> {
        validation::non_empty("full_name", &draft.full_name)?;
        validation::not_future("date_of_birth", draft.date_of_birth, Utc::now().date_naive())?;
        validation::date_order(
            "date_of_birth",
            draft.date_of_birth,
            "enrolled_on",
            Some(draft.enrolled_on),
        )
    }

    fn merge(&self, patch: &BeneficiaryPatch) -> BeneficiaryDraft {
        BeneficiaryDraft {
            full_name: patch
                .full_name
                .clone()
                .unwrap_or_else(|| self.full_name.clone()),
            gender: patch.gender.clone().unwrap_or_else(|| self.gender.clone()),
            date_of_birth: patch.date_of_birth.unwrap_or(self.date_of_birth),
            location: patch
                .location
                .clone()
                .unwrap_or_else(|| self.location.clone()),
            contact: patch
                .contact
                .clone()
                .unwrap_or_else(|| self.contact.clone()),
            project_id: patch.project_id.unwrap_or(self.project_id),
            program_id: patch.program_id.unwrap_or(self.program_id),
            enrolled_on: patch.enrolled_on.unwrap_or(self.enrolled_on),
            notes: patch.notes.clone().unwrap_or_else(|| self.notes.clone()),
        }
    }
}
