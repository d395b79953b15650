use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::record_sql::{self, ListSpec};
use crate::application::ports::record_repository::RecordRepository;
use crate::domain::records::partner::{Partner, PartnerDraft, PartnerKind};
use crate::domain::records::{Page, RecordFilter};
use crate::infrastructure::db::{PgPool, map_write_error};

const COLUMNS: &str = "id, name, kind, contact_name, email, phone, website, created_by, \
                       created_at, updated_at";

const SPEC: ListSpec = ListSpec {
    table: "partners",
    columns: COLUMNS,
    search: &["name", "contact_name", "email"],
    status: Some("kind"),
    project_col: None,
    program_col: None,
};

fn partner_from_row(r: &PgRow) -> anyhow::Result<Partner> {
    let kind: String = r.try_get("kind")?;
    Ok(Partner {
        id: r.try_get("id")?,
        name: r.try_get("name")?,
        kind: PartnerKind::parse(&kind).unwrap_or_default(),
        contact_name: r.try_get("contact_name")?,
        email: r.try_get("email")?,
        phone: r.try_get("phone")?,
        website: r.try_get("website")?,
        created_by: r.try_get("created_by")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

pub struct SqlxPartnerRepository {
    pub pool: PgPool,
}

impl SqlxPartnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<Partner> for SqlxPartnerRepository {
    async fn list(&self, filter: &RecordFilter) -> anyhow::Result<Page<Partner>> {
        record_sql::list_page(&self.pool, &SPEC, filter, partner_from_row).await
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Partner>> {
        record_sql::get_one(&self.pool, &SPEC, id, partner_from_row).await
    }

    async fn create(&self, created_by: Uuid, d: &PartnerDraft) -> anyhow::Result<Partner> {
        let sql = format!(
            r#"INSERT INTO partners (name, kind, contact_name, email, phone, website, created_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(d.name.trim())
            .bind(d.kind.as_str())
            .bind(&d.contact_name)
            .bind(&d.email)
            .bind(&d.phone)
            .bind(&d.website)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        partner_from_row(&row)
    }

    async fn update(&self, id: Uuid, d: &PartnerDraft) -> anyhow::Result<Option<Partner>> {
        let sql = format!(
            r#"UPDATE partners SET name = $2, kind = $3, contact_name = $4, email = $5,
                   phone = $6, website = $7, updated_at = now()
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(d.name.trim())
            .bind(d.kind.as_str())
            .bind(&d.contact_name)
            .bind(&d.email)
            .bind(&d.phone)
            .bind(&d.website)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        row.as_ref().map(partner_from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        record_sql::delete_one(&self.pool, &SPEC, id).await
    }
}
