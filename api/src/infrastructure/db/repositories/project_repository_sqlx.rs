use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::record_sql::{self, ListSpec};
use crate::application::ports::record_repository::RecordRepository;
use crate::domain::records::project::{Project, ProjectDraft, ProjectStatus};
use crate::domain::records::{Page, RecordFilter};
use crate::infrastructure::db::{PgPool, map_write_error};

const COLUMNS: &str = "id, name, description, status, program_id, manager_id, budget_cents, \
                       start_date, end_date, created_by, created_at, updated_at";

const SPEC: ListSpec = ListSpec {
    table: "projects",
    columns: COLUMNS,
    search: &["name", "description"],
    status: Some("status"),
    project_col: None,
    program_col: Some("program_id"),
};

fn project_from_row(r: &PgRow) -> anyhow::Result<Project> {
    let status: String = r.try_get("status")?;
    Ok(Project {
        id: r.try_get("id")?,
        name: r.try_get("name")?,
        description: r.try_get("description")?,
        status: ProjectStatus::parse(&status).unwrap_or_default(),
        program_id: r.try_get("program_id")?,
        manager_id: r.try_get("manager_id")?,
        budget_cents: r.try_get("budget_cents")?,
        start_date: r.try_get("start_date")?,
        end_date: r.try_get("end_date")?,
        created_by: r.try_get("created_by")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

pub struct SqlxProjectRepository {
    pub pool: PgPool,
}

impl SqlxProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<Project> for SqlxProjectRepository {
    async fn list(&self, filter: &RecordFilter) -> anyhow::Result<Page<Project>> {
        record_sql::list_page(&self.pool, &SPEC, filter, project_from_row).await
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Project>> {
        record_sql::get_one(&self.pool, &SPEC, id, project_from_row).await
    }

    async fn create(&self, created_by: Uuid, d: &ProjectDraft) -> anyhow::Result<Project> {
        let sql = format!(
            r#"INSERT INTO projects (name, description, status, program_id, manager_id,
                   budget_cents, start_date, end_date, created_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(d.name.trim())
            .bind(&d.description)
            .bind(d.status.as_str())
            .bind(d.program_id)
            .bind(d.manager_id)
            .bind(d.budget_cents)
            .bind(d.start_date)
            .bind(d.end_date)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        project_from_row(&row)
    }

    async fn update(&self, id: Uuid, d: &ProjectDraft) -> anyhow::Result<Option<Project>> {
        let sql = format!(
            r#"UPDATE projects SET name = $2, description = $3, status = $4, program_id = $5,
                   manager_id = $6, budget_cents = $7, start_date = $8, end_date = $9,
                   updated_at = now()
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(d.name.trim())
            .bind(&d.description)
            .bind(d.status.as_str())
            .bind(d.program_id)
            .bind(d.manager_id)
            .bind(d.budget_cents)
            .bind(d.start_date)
            .bind(d.end_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        row.as_ref().map(project_from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        record_sql::delete_one(&self.pool, &SPEC, id).await
    }
}
