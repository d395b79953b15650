use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::attendance::session::AttendanceSession;

#[derive(Debug, Clone)]
pub struct ActiveAttendee {
    pub user_id: Uuid,
    pub name: String,
    pub session: AttendanceSession,
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_open(&self, user_id: Uuid) -> anyhow::Result<Option<AttendanceSession>>;

    /// Inserts or replaces the session and its closed breaks.
    async fn save(&self, session: &AttendanceSession) -> anyhow::Result<()>;

    async fn list_for_user(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<AttendanceSession>>;

    async fn list_open(&self) -> anyhow::Result<Vec<ActiveAttendee>>;
}
