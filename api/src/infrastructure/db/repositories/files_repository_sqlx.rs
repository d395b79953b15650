use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::files_repository::FilesRepository;
use crate::domain::files::folder::{NewFile, StoredFile};
use crate::infrastructure::db::{PgPool, map_write_error};

const COLUMNS: &str = "id, name, folder_id, owner_id, storage_key, content_type, size, \
                       content_hash, shared_with, created_at";

pub struct SqlxFilesRepository {
    pub pool: PgPool,
}

impl SqlxFilesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn file_from_row(r: &PgRow) -> StoredFile {
    StoredFile {
        id: r.get("id"),
        name: r.get("name"),
        folder_id: r.get("folder_id"),
        owner_id: r.get("owner_id"),
        storage_key: r.get("storage_key"),
        content_type: r.get("content_type"),
        size: r.get("size"),
        content_hash: r.get("content_hash"),
        shared_with: r.get("shared_with"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl FilesRepository for SqlxFilesRepository {
    async fn insert_file(&self, file: &NewFile) -> anyhow::Result<StoredFile> {
        let sql = format!(
            r#"INSERT INTO files (name, folder_id, owner_id, storage_key, content_type, size,
                   content_hash, shared_with)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(&file.name)
            .bind(file.folder_id)
            .bind(file.owner_id)
            .bind(&file.storage_key)
            .bind(&file.content_type)
            .bind(file.size)
            .bind(&file.content_hash)
            .bind(&file.shared_with)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(file_from_row(&row))
    }

    async fn get_file(&self, id: Uuid) -> anyhow::Result<Option<StoredFile>> {
        let sql = format!("SELECT {COLUMNS} FROM files WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(file_from_row))
    }

    async fn list_in_folder(&self, folder_id: Option<Uuid>) -> anyhow::Result<Vec<StoredFile>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM files WHERE folder_id IS NOT DISTINCT FROM $1 \
             ORDER BY LOWER(name), id"
        );
        let rows = sqlx::query(&sql)
            .bind(folder_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(file_from_row).collect())
    }

    async fn set_shared_with(&self, id: Uuid, shared_with: &[Uuid]) -> anyhow::Result<()> {
        sqlx::query("UPDATE files SET shared_with = $2 WHERE id = $1")
            .bind(id)
            .bind(shared_with)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_file(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_shared_with(&self, user_id: Uuid) -> anyhow::Result<Vec<StoredFile>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM files WHERE $1 = ANY(shared_with) ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(file_from_row).collect())
    }

    async fn list_owned(&self, owner_id: Uuid) -> anyhow::Result<Vec<StoredFile>> {
        let sql = format!("SELECT {COLUMNS} FROM files WHERE owner_id = $1");
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(file_from_row).collect())
    }
}
