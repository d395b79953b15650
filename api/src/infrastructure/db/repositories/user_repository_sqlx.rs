use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::application::use_cases::auth::AuthError;
use crate::domain::records::{Page, contains_pattern};
use crate::infrastructure::db::{PgPool, is_unique_violation};

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(r: &PgRow) -> UserRow {
    UserRow {
        id: r.get("id"),
        email: r.get("email"),
        name: r.get("name"),
        role: r.get("role"),
        password_hash: r.try_get("password_hash").ok().flatten(),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: &str,
    ) -> anyhow::Result<UserRow> {
        let row = sqlx::query(
            r#"INSERT INTO users (email, name, password_hash, role) VALUES ($1, $2, $3, $4)
               RETURNING id, email, name, role, password_hash, created_at"#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                anyhow::Error::from(AuthError::EmailTaken)
            } else {
                anyhow::Error::from(e)
            }
        })?;
        Ok(user_from_row(&row))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(
            r#"SELECT id, email, name, role, password_hash, created_at
               FROM users WHERE LOWER(email) = LOWER($1)"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(r#"SELECT id, email, name, role, created_at FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn list(
        &self,
        query: Option<String>,
        page: i64,
        per_page: i64,
    ) -> anyhow::Result<Page<UserRow>> {
        let pattern = query.map(|q| contains_pattern(q.trim()));
        let total: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM users
               WHERE $1::text IS NULL OR name ILIKE $1 ESCAPE '\' OR email ILIKE $1 ESCAPE '\'"#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        let rows = sqlx::query(
            r#"SELECT id, email, name, role, created_at FROM users
               WHERE $1::text IS NULL OR name ILIKE $1 ESCAPE '\' OR email ILIKE $1 ESCAPE '\'
               ORDER BY LOWER(name), id
               LIMIT $2 OFFSET $3"#,
        )
        .bind(&pattern)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;
        Ok(Page {
            items: rows.iter().map(user_from_row).collect(),
            total,
            page,
            per_page,
        })
    }

    async fn directory(&self) -> anyhow::Result<Vec<UserRow>> {
        let rows = sqlx::query(
            r#"SELECT id, email, name, role, created_at FROM users ORDER BY LOWER(name), id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn update_role(&self, id: Uuid, role: &str) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(
            r#"UPDATE users SET role = $2, updated_at = now() WHERE id = $1
               RETURNING id, email, name, role, created_at"#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
