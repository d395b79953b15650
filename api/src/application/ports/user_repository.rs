use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::records::Page;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub password_hash: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: &str,
    ) -> anyhow::Result<UserRow>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>>;
    async fn list(&self, query: Option<String>, page: i64, per_page: i64)
    -> anyhow::Result<Page<UserRow>>;
    async fn directory(&self) -> anyhow::Result<Vec<UserRow>>;
    async fn update_role(&self, id: Uuid, role: &str) -> anyhow::Result<Option<UserRow>>;
    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool>;
}
