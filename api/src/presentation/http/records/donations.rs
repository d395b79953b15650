use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{IntoDomain, double_option, record_api};
use crate::domain::records::ValidationError;
use crate::domain::records::donation::{Donation, DonationDraft, DonationMethod, DonationPatch};
use crate::domain::records::validation::{clean, normalize_currency, vocabulary};

#[derive(Debug, Serialize, ToSchema)]
pub struct DonationResponse {
    pub id: Uuid,
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub received_on: NaiveDate,
    pub method: String,
    pub project_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Donation> for DonationResponse {
    fn from(d: Donation) -> Self {
        Self {
            id: d.id,
            donor_name: d.donor_name,
            donor_email: d.donor_email,
            amount_cents: d.amount_cents,
            currency: d.currency,
            received_on: d.received_on,
            method: d.method.as_str().to_string(),
            project_id: d.project_id,
            notes: d.notes,
            created_by: d.created_by,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDonationRequest {
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub amount_cents: i64,
    pub currency: Option<String>,
    /// Defaults to today.
    pub received_on: Option<NaiveDate>,
    pub method: Option<String>,
    pub project_id: Option<Uuid>,
    pub notes: Option<String>,
}

impl IntoDomain<DonationDraft> for CreateDonationRequest {
    fn into_domain(self) -> Result<DonationDraft, ValidationError> {
        let method = match self.method.as_deref() {
            Some(raw) => vocabulary("method", raw, DonationMethod::parse)?,
            None => DonationMethod::default(),
        };
        Ok(DonationDraft {
            donor_name: self.donor_name.trim().to_string(),
            donor_email: clean(self.donor_email),
            amount_cents: self.amount_cents,
            currency: normalize_currency(self.currency.as_deref().unwrap_or("USD")),
            received_on: self.received_on.unwrap_or_else(|| Utc::now().date_naive()),
            method,
            project_id: self.project_id,
            notes: clean(self.notes),
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateDonationRequest {
    pub donor_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub donor_email: Option<Option<String>>,
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
    pub received_on: Option<NaiveDate>,
    pub method: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub project_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl IntoDomain<DonationPatch> for UpdateDonationRequest {
    fn into_domain(self) -> Result<DonationPatch, ValidationError> {
        Ok(DonationPatch {
            donor_name: self.donor_name.map(|n| n.trim().to_string()),
            donor_email: self.donor_email.map(clean),
            amount_cents: self.amount_cents,
            currency: self.currency,
            received_on: self.received_on,
            method: self
                .method
                .as_deref()
                .map(|raw| vocabulary("method", raw, DonationMethod::parse))
                .transpose()?,
            project_id: self.project_id,
            notes: self.notes.map(clean),
        })
    }
}

record_api! {
    record: Donation,
    response: DonationResponse,
    page: DonationPage,
    create: CreateDonationRequest,
    patch: UpdateDonationRequest,
    tag: "Donations",
    api_path: "/api/donations",
    api_item: "/api/donations/{id}",
    route: "/donations",
    route_item: "/donations/:id",
}
