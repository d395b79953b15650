use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::record_sql::{self, ListSpec};
use crate::application::ports::record_repository::RecordRepository;
use crate::domain::records::grant::{Grant, GrantDraft, GrantStatus};
use crate::domain::records::{Page, RecordFilter};
use crate::infrastructure::db::{PgPool, map_write_error};

const COLUMNS: &str = "id, title, partner_id, funder_name, amount_cents, currency, status, \
                       project_id, starts_on, ends_on, created_by, created_at, updated_at";

const SPEC: ListSpec = ListSpec {
    table: "grants",
    columns: COLUMNS,
    search: &["title", "funder_name"],
    status: Some("status"),
    project_col: Some("project_id"),
    program_col: None,
};

fn grant_from_row(r: &PgRow) -> anyhow::Result<Grant> {
    let status: String = r.try_get("status")?;
    Ok(Grant {
        id: r.try_get("id")?,
        title: r.try_get("title")?,
        partner_id: r.try_get("partner_id")?,
        funder_name: r.try_get("funder_name")?,
        amount_cents: r.try_get("amount_cents")?,
        currency: r.try_get("currency")?,
        status: GrantStatus::parse(&status).unwrap_or_default(),
        project_id: r.try_get("project_id")?,
        starts_on: r.try_get("starts_on")?,
        ends_on: r.try_get("ends_on")?,
        created_by: r.try_get("created_by")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

pub struct SqlxGrantRepository {
    pub pool: PgPool,
}

impl SqlxGrantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<Grant> for SqlxGrantRepository {
    async fn list(&self, filter: &RecordFilter) -> anyhow::Result<Page<Grant>> {
        record_sql::list_page(&self.pool, &SPEC, filter, grant_from_row).await
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Grant>> {
        record_sql::get_one(&self.pool, &SPEC, id, grant_from_row).await
    }

    async fn create(&self, created_by: Uuid, d: &GrantDraft) -> anyhow::Result<Grant> {
        let sql = format!(
            r#"INSERT INTO grants (title, partner_id, funder_name, amount_cents, currency, status,
                   project_id, starts_on, ends_on, created_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(d.title.trim())
            .bind(d.partner_id)
            .bind(d.funder_name.trim())
            .bind(d.amount_cents)
            .bind(&d.currency)
            .bind(d.status.as_str())
            .bind(d.project_id)
            .bind(d.starts_on)
            .bind(d.ends_on)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        grant_from_row(&row)
    }

    async fn update(&self, id: Uuid, d: &GrantDraft) -> anyhow::Result<Option<Grant>> {
        let sql = format!(
            r#"UPDATE grants SET title = $2, partner_id = $3, funder_name = $4, amount_cents = $5,
                   currency = $6, status = $7, project_id = $8, starts_on = $9, ends_on = $10,
                   updated_at = now()
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(d.title.trim())
            .bind(d.partner_id)
            .bind(d.funder_name.trim())
            .bind(d.amount_cents)
            .bind(&d.currency)
            .bind(d.status.as_str())
            .bind(d.project_id)
            .bind(d.starts_on)
            .bind(d.ends_on)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        row.as_ref().map(grant_from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        record_sql::delete_one(&self.pool, &SPEC, id).await
    }
}
