use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::validation::{self, ValidationError};
use super::{Record, text_enum};
use crate::domain::access::role::Resource;

text_enum!(PartnerKind {
    Donor => "donor",
    Implementing => "implementing",
    Government => "government",
    Community => "community",
    Corporate => "corporate",
    Other => "other",
} default Other);

#[derive(Debug, Clone)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub kind: PartnerKind,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PartnerDraft {
    pub name: String,
    pub kind: PartnerKind,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PartnerPatch {
    pub name: Option<String>,
    pub kind: Option<PartnerKind>,
    pub contact_name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub website: Option<Option<String>>,
}

impl Record for Partner {
    type Draft = PartnerDraft;
    type Patch = PartnerPatch;

    const RESOURCE: Resource = Resource::Partners;

    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(draft: &PartnerDraft) -> Result<(), ValidationError> {
        validation::non_empty("name", &draft.name)?;
        validation::optional_email("email", draft.email.as_deref())
    }

    fn merge(&self, patch: &PartnerPatch) -> PartnerDraft {
        PartnerDraft {
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            kind: patch.kind.unwrap_or(self.kind),
            contact_name: patch
                .contact_name
                .clone()
                .unwrap_or_else(|| self.contact_name.clone()),
            email: patch.email.clone().unwrap_or_else(|| self.email.clone()),
            phone: patch.phone.clone().unwrap_or_else(|| self.phone.clone()),
            website: patch
                .website
                .clone()
                .unwrap_or_else(|| self.website.clone()),
        }
    }
}
