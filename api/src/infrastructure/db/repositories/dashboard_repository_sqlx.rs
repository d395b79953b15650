use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Row;

use crate::application::ports::dashboard_repository::{CurrencyTotal, DashboardRepository};
use crate::infrastructure::db::PgPool;

pub struct SqlxDashboardRepository {
    pub pool: PgPool,
}

impl SqlxDashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> anyhow::Result<i64> {
        let n: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(n)
    }
}

fn totals(rows: Vec<sqlx::postgres::PgRow>) -> Vec<CurrencyTotal> {
    rows.into_iter()
        .map(|r| CurrencyTotal {
            currency: r.get("currency"),
            total_cents: r.get("total_cents"),
            count: r.get("count"),
        })
        .collect()
}

#[async_trait]
impl DashboardRepository for SqlxDashboardRepository {
    async fn project_status_counts(&self) -> anyhow::Result<Vec<(String, i64)>> {
        let rows = sqlx::query(
            "SELECT status, COUNT(*) AS count FROM projects GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| (r.get("status"), r.get("count")))
            .collect())
    }

    async fn active_program_count(&self) -> anyhow::Result<i64> {
        self.count("SELECT COUNT(*) FROM programs WHERE status = 'active'")
            .await
    }

    async fn awarded_grant_totals(&self) -> anyhow::Result<Vec<CurrencyTotal>> {
        let rows = sqlx::query(
            r#"SELECT currency, COALESCE(SUM(amount_cents), 0)::BIGINT AS total_cents,
                      COUNT(*) AS count
               FROM grants WHERE status = 'awarded'
               GROUP BY currency ORDER BY currency"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(totals(rows))
    }

    async fn donation_totals(&self, since: Option<NaiveDate>) -> anyhow::Result<Vec<CurrencyTotal>> {
        let rows = sqlx::query(
            r#"SELECT currency, COALESCE(SUM(amount_cents), 0)::BIGINT AS total_cents,
                      COUNT(*) AS count
               FROM donations WHERE $1::date IS NULL OR received_on >= $1
               GROUP BY currency ORDER BY currency"#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(totals(rows))
    }

    async fn beneficiary_count(&self) -> anyhow::Result<i64> {
        self.count("SELECT COUNT(*) FROM beneficiaries").await
    }

    async fn partner_count(&self) -> anyhow::Result<i64> {
        self.count("SELECT COUNT(*) FROM partners").await
    }

    async fn distribution_count(&self, since: NaiveDate) -> anyhow::Result<i64> {
        let n: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM distributions WHERE distributed_on >= $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;
        Ok(n)
    }

    async fn attendance_counts(&self) -> anyhow::Result<(i64, i64)> {
        let row = sqlx::query(
            r#"SELECT COUNT(*) FILTER (WHERE status = 'checked_in') AS checked_in,
                      COUNT(*) FILTER (WHERE status = 'on_break') AS on_break
               FROM attendance_sessions"#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok((row.get("checked_in"), row.get("on_break")))
    }
}
