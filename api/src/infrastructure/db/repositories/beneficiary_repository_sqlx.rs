use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::record_sql::{self, ListSpec};
use crate::application::ports::record_repository::RecordRepository;
use crate::domain::records::beneficiary::{Beneficiary, BeneficiaryDraft};
use crate::domain::records::{Page, RecordFilter};
use crate::infrastructure::db::{PgPool, map_write_error};

const COLUMNS: &str = "id, full_name, gender, date_of_birth, location, contact, project_id, \
                       program_id, enrolled_on, notes, created_by, created_at, updated_at";

const SPEC: ListSpec = ListSpec {
    table: "beneficiaries",
    columns: COLUMNS,
    search: &["full_name", "location", "contact"],
    status: None,
    project_col: Some("project_id"),
    program_col: Some("program_id"),
};

fn beneficiary_from_row(r: &PgRow) -> anyhow::Result<Beneficiary> {
    Ok(Beneficiary {
        id: r.try_get("id")?,
        full_name: r.try_get("full_name")?,
        gender: r.try_get("gender")?,
        date_of_birth: r.try_get("date_of_birth")?,
        location: r.try_get("location")?,
        contact: r.try_get("contact")?,
        project_id: r.try_get("project_id")?,
        program_id: r.try_get("program_id")?,
        enrolled_on: r.try_get("enrolled_on")?,
        notes: r.try_get("notes")?,
        created_by: r.try_get("created_by")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

pub struct SqlxBeneficiaryRepository {
    pub pool: PgPool,
}

impl SqlxBeneficiaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<Beneficiary> for SqlxBeneficiaryRepository {
    async fn list(&self, filter: &RecordFilter) -> anyhow::Result<Page<Beneficiary>> {
        record_sql::list_page(&self.pool, &SPEC, filter, beneficiary_from_row).await
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Beneficiary>> {
        record_sql::get_one(&self.pool, &SPEC, id, beneficiary_from_row).await
    }

    async fn create(&self, created_by: Uuid, d: &BeneficiaryDraft) -> anyhow::Result<Beneficiary> {
        let sql = format!(
            r#"INSERT INTO beneficiaries (full_name, gender, date_of_birth, location, contact,
                   project_id, program_id, enrolled_on, notes, created_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(d.full_name.trim())
            .bind(&d.gender)
            .bind(d.date_of_birth)
            .bind(&d.location)
            .bind(&d.contact)
            .bind(d.project_id)
            .bind(d.program_id)
            .bind(d.enrolled_on)
            .bind(&d.notes)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        beneficiary_from_row(&row)
    }

    async fn update(
        &self,
        id: Uuid,
        d: &BeneficiaryDraft,
    ) -> anyhow::Result<Option<Beneficiary>> {
        let sql = format!(
            r#"UPDATE beneficiaries SET full_name = $2, gender = $3, date_of_birth = $4,
                   location = $5, contact = $6, project_id = $7, program_id = $8,
                   enrolled_on = $9, notes = $10, updated_at = now()
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(d.full_name.trim())
            .bind(&d.gender)
            .bind(d.date_of_birth)
            .bind(&d.location)
            .bind(&d.contact)
            .bind(d.project_id)
            .bind(d.program_id)
            .bind(d.enrolled_on)
            .bind(&d.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        row.as_ref().map(beneficiary_from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        record_sql::delete_one(&self.pool, &SPEC, id).await
    }
}
