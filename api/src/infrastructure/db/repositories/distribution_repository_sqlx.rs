use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::record_sql::{self, ListSpec};
use crate::application::ports::record_repository::RecordRepository;
use crate::domain::records::distribution::{Distribution, DistributionDraft};
use crate::domain::records::{Page, RecordFilter};
use crate::infrastructure::db::{PgPool, map_write_error};

const COLUMNS: &str = "id, resource_name, quantity, unit, beneficiary_id, project_id, \
                       distributed_on, notes, created_by, created_at, updated_at";

const SPEC: ListSpec = ListSpec {
    table: "distributions",
    columns: COLUMNS,
    search: &["resource_name", "notes"],
    status: None,
    project_col: Some("project_id"),
    program_col: None,
};

fn distribution_from_row(r: &PgRow) -> anyhow::Result<Distribution> {
    Ok(Distribution {
        id: r.try_get("id")?,
        resource_name: r.try_get("resource_name")?,
        quantity: r.try_get("quantity")?,
        unit: r.try_get("unit")?,
        beneficiary_id: r.try_get("beneficiary_id")?,
        project_id: r.try_get("project_id")?,
        distributed_on: r.try_get("distributed_on")?,
        notes: r.try_get("notes")?,
        created_by: r.try_get("created_by")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

pub struct SqlxDistributionRepository {
    pub pool: PgPool,
}

impl SqlxDistributionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<Distribution> for SqlxDistributionRepository {
    async fn list(&self, filter: &RecordFilter) -> anyhow::Result<Page<Distribution>> {
        record_sql::list_page(&self.pool, &SPEC, filter, distribution_from_row).await
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Distribution>> {
        record_sql::get_one(&self.pool, &SPEC, id, distribution_from_row).await
    }

    async fn create(
        &self,
        created_by: Uuid,
        d: &DistributionDraft,
    ) -> anyhow::Result<Distribution> {
        let sql = format!(
            r#"INSERT INTO distributions (resource_name, quantity, unit, beneficiary_id,
                   project_id, distributed_on, notes, created_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(d.resource_name.trim())
            .bind(d.quantity)
            .bind(d.unit.trim())
            .bind(d.beneficiary_id)
            .bind(d.project_id)
            .bind(d.distributed_on)
            .bind(&d.notes)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        distribution_from_row(&row)
    }

    async fn update(
        &self,
        id: Uuid,
        d: &DistributionDraft,
    ) -> anyhow::Result<Option<Distribution>> {
        let sql = format!(
            r#"UPDATE distributions SET resource_name = $2, quantity = $3, unit = $4,
                   beneficiary_id = $5, project_id = $6, distributed_on = $7, notes = $8,
                   updated_at = now()
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(d.resource_name.trim())
            .bind(d.quantity)
            .bind(d.unit.trim())
            .bind(d.beneficiary_id)
            .bind(d.project_id)
            .bind(d.distributed_on)
            .bind(&d.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        row.as_ref().map(distribution_from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        record_sql::delete_one(&self.pool, &SPEC, id).await
    }
}
