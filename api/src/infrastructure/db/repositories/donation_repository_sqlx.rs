use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::record_sql::{self, ListSpec};
use crate::application::ports::record_repository::RecordRepository;
use crate::domain::records::donation::{Donation, DonationDraft, DonationMethod};
use crate::domain::records::{Page, RecordFilter};
use crate::infrastructure::db::{PgPool, map_write_error};

const COLUMNS: &str = "id, donor_name, donor_email, amount_cents, currency, received_on, method, \
                       project_id, notes, created_by, created_at, updated_at";

// Donations have no lifecycle; the status filter selects the payment method.
const SPEC: ListSpec = ListSpec {
    table: "donations",
    columns: COLUMNS,
    search: &["donor_name", "donor_email", "notes"],
    status: Some("method"),
    project_col: Some("project_id"),
    program_col: None,
};

fn donation_from_row(r: &PgRow) -> anyhow::Result<Donation> {
    let method: String = r.try_get("method")?;
    Ok(Donation {
        id: r.try_get("id")?,
        donor_name: r.try_get("donor_name")?,
        donor_email: r.try_get("donor_email")?,
        amount_cents: r.try_get("amount_cents")?,
        currency: r.try_get("currency")?,
        received_on: r.try_get("received_on")?,
        method: DonationMethod::parse(&method).unwrap_or_default(),
        project_id: r.try_get("project_id")?,
        notes: r.try_get("notes")?,
        created_by: r.try_get("created_by")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

pub struct SqlxDonationRepository {
    pub pool: PgPool,
}

impl SqlxDonationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<Donation> for SqlxDonationRepository {
    async fn list(&self, filter: &RecordFilter) -> anyhow::Result<Page<Donation>> {
        record_sql::list_page(&self.pool, &SPEC, filter, donation_from_row).await
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Donation>> {
        record_sql::get_one(&self.pool, &SPEC, id, donation_from_row).await
    }

    async fn create(&self, created_by: Uuid, d: &DonationDraft) -> anyhow::Result<Donation> {
        let sql = format!(
            r#"INSERT INTO donations (donor_name, donor_email, amount_cents, currency, received_on,
                   method, project_id, notes, created_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(d.donor_name.trim())
            .bind(&d.donor_email)
            .bind(d.amount_cents)
            .bind(&d.currency)
            .bind(d.received_on)
            .bind(d.method.as_str())
            .bind(d.project_id)
            .bind(&d.notes)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        donation_from_row(&row)
    }

    async fn update(&self, id: Uuid, d: &DonationDraft) -> anyhow::Result<Option<Donation>> {
        let sql = format!(
            r#"UPDATE donations SET donor_name = $2, donor_email = $3, amount_cents = $4,
                   currency = $5, received_on = $6, method = $7, project_id = $8, notes = $9,
                   updated_at = now()
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(d.donor_name.trim())
            .bind(&d.donor_email)
            .bind(d.amount_cents)
            .bind(&d.currency)
            .bind(d.received_on)
            .bind(d.method.as_str())
            .bind(d.project_id)
            .bind(&d.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        row.as_ref().map(donation_from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        record_sql::delete_one(&self.pool, &SPEC, id).await
    }
}
