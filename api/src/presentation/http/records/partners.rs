use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{IntoDomain, double_option, record_api};
use crate::domain::records::ValidationError;
use crate::domain::records::partner::{Partner, PartnerDraft, PartnerKind, PartnerPatch};
use crate::domain::records::validation::{clean, vocabulary};

#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerResponse {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Partner> for PartnerResponse {
    fn from(p: Partner) -> Self {
        Self {
            id: p.id,
            name: p.name,
            kind: p.kind.as_str().to_string(),
            contact_name: p.contact_name,
            email: p.email,
            phone: p.phone,
            website: p.website,
            created_by: p.created_by,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePartnerRequest {
    pub name: String,
    pub kind: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl IntoDomain<PartnerDraft> for CreatePartnerRequest {
    fn into_domain(self) -> Result<PartnerDraft, ValidationError> {
        let kind = match self.kind.as_deref() {
            Some(raw) => vocabulary("kind", raw, PartnerKind::parse)?,
            None => PartnerKind::default(),
        };
        Ok(PartnerDraft {
            name: self.name.trim().to_string(),
            kind,
            contact_name: clean(self.contact_name),
            email: clean(self.email),
            phone: clean(self.phone),
            website: clean(self.website),
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePartnerRequest {
    pub name: Option<String>,
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contact_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub website: Option<Option<String>>,
}

impl IntoDomain<PartnerPatch> for UpdatePartnerRequest {
    fn into_domain(self) -> Result<PartnerPatch, ValidationError> {
        Ok(PartnerPatch {
            name: self.name.map(|n| n.trim().to_string()),
            kind: self
                .kind
                .as_deref()
                .map(|raw| vocabulary("kind", raw, PartnerKind::parse))
                .transpose()?,
            contact_name: self.contact_name.map(clean),
            email: self.email.map(clean),
            phone: self.phone.map(clean),
            website: self.website.map(clean),
        })
    }
}

record_api! {
    record: Partner,
    response: PartnerResponse,
    page: PartnerPage,
    create: CreatePartnerRequest,
    patch: UpdatePartnerRequest,
    tag: "Partners",
    api_path: "/api/partners",
    api_item: "/api/partners/{id}",
    route: "/partners",
    route_item: "/partners/:id",
}
