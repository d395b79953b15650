use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::record_sql::{self, ListSpec};
use crate::application::ports::record_repository::RecordRepository;
use crate::domain::records::program::{Program, ProgramDraft, ProgramStatus};
use crate::domain::records::{Page, RecordFilter};
use crate::infrastructure::db::{PgPool, map_write_error};

const COLUMNS: &str =
    "id, name, description, status, start_date, end_date, created_by, created_at, updated_at";

const SPEC: ListSpec = ListSpec {
    table: "programs",
    columns: COLUMNS,
    search: &["name", "description"],
    status: Some("status"),
    project_col: None,
    program_col: None,
};

fn program_from_row(r: &PgRow) -> anyhow::Result<Program> {
    let status: String = r.try_get("status")?;
    Ok(Program {
        id: r.try_get("id")?,
        name: r.try_get("name")?,
        description: r.try_get("description")?,
        status: ProgramStatus::parse(&status).unwrap_or_default(),
        start_date: r.try_get("start_date")?,
        end_date: r.try_get("end_date")?,
        created_by: r.try_get("created_by")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

pub struct SqlxProgramRepository {
    pub pool: PgPool,
}

impl SqlxProgramRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<Program> for SqlxProgramRepository {
    async fn list(&self, filter: &RecordFilter) -> anyhow::Result<Page<Program>> {
        record_sql::list_page(&self.pool, &SPEC, filter, program_from_row).await
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Program>> {
        record_sql::get_one(&self.pool, &SPEC, id, program_from_row).await
    }

    async fn create(&self, created_by: Uuid, d: &ProgramDraft) -> anyhow::Result<Program> {
        let sql = format!(
            r#"INSERT INTO programs (name, description, status, start_date, end_date, created_by)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(d.name.trim())
            .bind(&d.description)
            .bind(d.status.as_str())
            .bind(d.start_date)
            .bind(d.end_date)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        program_from_row(&row)
    }

    async fn update(&self, id: Uuid, d: &ProgramDraft) -> anyhow::Result<Option<Program>> {
        let sql = format!(
            r#"UPDATE programs SET name = $2, description = $3, status = $4,
                   start_date = $5, end_date = $6, updated_at = now()
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(d.name.trim())
            .bind(&d.description)
            .bind(d.status.as_str())
            .bind(d.start_date)
            .bind(d.end_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        row.as_ref().map(program_from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        record_sql::delete_one(&self.pool, &SPEC, id).await
    }
}
