use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::folder_repository::FolderRepository;
use crate::domain::files::folder::Folder;
use crate::infrastructure::db::{PgPool, map_write_error};

const COLUMNS: &str = "id, name, parent_id, owner_id, shared_with, created_at, updated_at";

pub struct SqlxFolderRepository {
    pub pool: PgPool,
}

impl SqlxFolderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn folder_from_row(r: &PgRow) -> Folder {
    Folder {
        id: r.get("id"),
        name: r.get("name"),
        parent_id: r.get("parent_id"),
        owner_id: r.get("owner_id"),
        shared_with: r.get("shared_with"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

#[async_trait]
impl FolderRepository for SqlxFolderRepository {
    async fn create(
        &self,
        owner_id: Uuid,
        name: &str,
        parent_id: Option<Uuid>,
        shared_with: &[Uuid],
    ) -> anyhow::Result<Folder> {
        let sql = format!(
            "INSERT INTO folders (name, parent_id, owner_id, shared_with) VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(name)
            .bind(parent_id)
            .bind(owner_id)
            .bind(shared_with)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(folder_from_row(&row))
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Folder>> {
        let sql = format!("SELECT {COLUMNS} FROM folders WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(folder_from_row))
    }

    async fn list_children(&self, parent_id: Option<Uuid>) -> anyhow::Result<Vec<Folder>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM folders WHERE parent_id IS NOT DISTINCT FROM $1 \
             ORDER BY LOWER(name), id"
        );
        let rows = sqlx::query(&sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(folder_from_row).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> anyhow::Result<Option<Folder>> {
        let sql = format!(
            "UPDATE folders SET name = $2, parent_id = $3, updated_at = now() WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(name)
            .bind(parent_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(row.as_ref().map(folder_from_row))
    }

    async fn set_shared_with(&self, id: Uuid, shared_with: &[Uuid]) -> anyhow::Result<()> {
        sqlx::query("UPDATE folders SET shared_with = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(shared_with)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_shared_with(&self, user_id: Uuid) -> anyhow::Result<Vec<Folder>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM folders WHERE $1 = ANY(shared_with) ORDER BY LOWER(name), id"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(folder_from_row).collect())
    }

    async fn list_owned(&self, owner_id: Uuid) -> anyhow::Result<Vec<Folder>> {
        // Shallow folders first so a whole tree goes in one traversal.
        let sql = format!(
            "SELECT {COLUMNS} FROM folders WHERE owner_id = $1 \
             ORDER BY (parent_id IS NULL) DESC, created_at"
        );
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(folder_from_row).collect())
    }
}
