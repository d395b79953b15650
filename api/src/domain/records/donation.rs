use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::validation::{self, ValidationError};
use super::{Record, text_enum};
use crate::domain::access::role::Resource;

text_enum!(DonationMethod {
    Cash => "cash",
    BankTransfer => "bank_transfer",
    Card => "card",
    MobileMoney => "mobile_money",
    InKind => "in_kind",
    Other => "other",
} default Other);

#[derive(Debug, Clone)]
pub struct Donation {
    pub id: Uuid,
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub received_on: NaiveDate,
    pub method: DonationMethod,
    pub project_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DonationDraft {
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub received_on: NaiveDate,
    pub method: DonationMethod,
    pub project_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DonationPatch {
    pub donor_name: Option<String>,
    pub donor_email: Option<Option<String>>,
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
    pub received_on: Option<NaiveDate>,
    pub method: Option<DonationMethod>,
    pub project_id: Option<Option<Uuid>>,
    pub notes: Option<Option<String>>,
}

impl Record for Donation {
    type Draft = DonationDraft;
    type Patch = DonationPatch;

    const RESOURCE: Resource = Resource::Donations;

    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(draft: &DonationDraft) -> Result<(), ValidationError> {
        validation::non_empty("donor_name", &draft.donor_name)?;
        validation::optional_email("donor_email", draft.donor_email.as_deref())?;
        validation::positive("amount_cents", draft.amount_cents)?;
        validation::currency(&draft.currency)
    }

    fn merge(&self, patch: &DonationPatch) -> DonationDraft {
        DonationDraft {
            donor_name: patch
                .donor_name
                .clone()
                .unwrap_or_else(|| self.donor_name.clone()),
            donor_email: patch
                .donor_email
                .clone()
                .unwrap_or_else(|| self.donor_email.clone()),
            amount_cents: patch.amount_cents.unwrap_or(self.amount_cents),
            currency: patch
                .currency
                .as_deref()
                .map(validation::normalize_currency)
                .unwrap_or_else(|| self.currency.clone()),
            received_on: patch.received_on.unwrap_or(self.received_on),
            method: patch.method.unwrap_or(self.method),
            project_id: patch.project_id.unwrap_or(self.project_id),
            notes: patch.notes.clone().unwrap_or_else(|| self.notes.clone()),
        }
    }
}
