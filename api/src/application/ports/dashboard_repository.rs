use async_trait::async_trait;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyTotal {
    pub currency: String,
    pub total_cents: i64,
    pub count: i64,
}

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// (status, count) pairs.
    async fn project_status_counts(&self) -> anyhow::Result<Vec<(String, i64)>>;
    async fn active_program_count(&self) -> anyhow::Result<i64>;
    async fn awarded_grant_totals(&self) -> anyhow::Result<Vec<CurrencyTotal>>;
    async fn donation_totals(&self, since: Option<NaiveDate>) -> anyhow::Result<Vec<CurrencyTotal>>;
    async fn beneficiary_count(&self) -> anyhow::Result<i64>;
    async fn partner_count(&self) -> anyhow::Result<i64>;
    async fn distribution_count(&self, since: NaiveDate) -> anyhow::Result<i64>;
    /// (checked_in, on_break)
    async fn attendance_counts(&self) -> anyhow::Result<(i64, i64)>;
}
