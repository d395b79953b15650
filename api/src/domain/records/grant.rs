use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::validation::{self, ValidationError};
use super::{Record, text_enum};
use crate::domain::access::role::Resource;

text_enum!(GrantStatus {
    Draft => "draft",
    Submitted => "submitted",
    Awarded => "awarded",
    Rejected => "rejected",
    Closed => "closed",
} default Draft);

#[derive(Debug, Clone)]
pub struct Grant {
    pub id: Uuid,
    pub title: String,
    pub partner_id: Option<Uuid>,
    pub funder_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: GrantStatus,
    pub project_id: Option<Uuid>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct GrantDraft {
    pub title: String,
    pub partner_id: Option<Uuid>,
    pub funder_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: GrantStatus,
    pub project_id: Option<Uuid>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct GrantPatch {
    pub title: Option<String>,
    pub partner_id: Option<Option<Uuid>>,
    pub funder_name: Option<String>,
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<GrantStatus>,
    pub project_id: Option<Option<Uuid>>,
    pub starts_on: Option<Option<NaiveDate>>,
    pub ends_on: Option<Option<NaiveDate>>,
}

impl Record for Grant {
    type Draft = GrantDraft;
    type Patch = GrantPatch;

    const RESOURCE: Resource = Resource::Grants;

    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(draft: &GrantDraft) -> Result<(), ValidationError> {
        validation::non_empty("title", &draft.title)?;
        validation::non_empty("funder_name", &draft.funder_name)?;
        validation::non_negative("amount_cents", draft.amount_cents)?;
        validation::currency(&draft.currency)?;
        validation::date_order("starts_on", draft.starts_on, "ends_on", draft.ends_on)
    }

    fn merge(&self, patch: &GrantPatch) -> GrantDraft {
        GrantDraft {
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            partner_id: patch.partner_id.unwrap_or(self.partner_id),
            funder_name: patch
                .funder_name
                .clone()
                .unwrap_or_else(|| self.funder_name.clone()),
            amount_cents: patch.amount_cents.unwrap_or(self.amount_cents),
            currency: patch
                .currency
                .as_deref()
                .map(validation::normalize_currency)
                .unwrap_or_else(|| self.currency.clone()),
            status: patch.status.unwrap_or(self.status),
            project_id: patch.project_id.unwrap_or(self.project_id),
            starts_on: patch.starts_on.unwrap_or(self.starts_on),
            ends_on: patch.ends_on.unwrap_or(self.ends_on),
        }
    }
}
