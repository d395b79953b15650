use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::attendance_repository::{ActiveAttendee, AttendanceRepository};
use crate::domain::attendance::session::{
    AttendanceError, AttendanceSession, AttendanceStatus, BreakPeriod,
};
use crate::infrastructure::db::{PgPool, is_unique_violation};

const COLUMNS: &str = "s.id, s.user_id, s.work_date, s.status, s.check_in_at, s.check_out_at, \
                       s.break_started_at, s.total_break_secs, s.updated_at";

pub struct SqlxAttendanceRepository {
    pub pool: PgPool,
}

impl SqlxAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn attach_breaks(&self, sessions: &mut [AttendanceSession]) -> anyhow::Result<()> {
        if sessions.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();
        let rows = sqlx::query(
            r#"SELECT session_id, started_at, ended_at FROM attendance_breaks
               WHERE session_id = ANY($1) ORDER BY started_at"#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        let mut by_session: HashMap<Uuid, Vec<BreakPeriod>> = HashMap::new();
        for r in rows {
            by_session
                .entry(r.get("session_id"))
                .or_default()
                .push(BreakPeriod {
                    started_at: r.get("started_at"),
                    ended_at: r.get("ended_at"),
                });
        }
        for s in sessions.iter_mut() {
            s.breaks = by_session.remove(&s.id).unwrap_or_default();
        }
        Ok(())
    }
}

fn session_from_row(r: &PgRow) -> anyhow::Result<AttendanceSession> {
    let raw: String = r.try_get("status")?;
    let status = AttendanceStatus::parse(&raw)
        .ok_or_else(|| anyhow::anyhow!("unknown attendance status `{raw}`"))?;
    Ok(AttendanceSession {
        id: r.try_get("id")?,
        user_id: r.try_get("user_id")?,
        work_date: r.try_get("work_date")?,
        status,
        check_in_at: r.try_get("check_in_at")?,
        check_out_at: r.try_get("check_out_at")?,
        break_started_at: r.try_get("break_started_at")?,
        total_break_secs: r.try_get("total_break_secs")?,
        breaks: Vec::new(),
        updated_at: r.try_get("updated_at")?,
    })
}

#[async_trait]
impl AttendanceRepository for SqlxAttendanceRepository {
    async fn find_open(&self, user_id: Uuid) -> anyhow::Result<Option<AttendanceSession>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM attendance_sessions s \
             WHERE s.user_id = $1 AND s.status <> 'checked_out'"
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut sessions = vec![session_from_row(&row)?];
        self.attach_breaks(&mut sessions).await?;
        Ok(sessions.pop())
    }

    async fn save(&self, session: &AttendanceSession) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        let res = sqlx::query(
            r#"INSERT INTO attendance_sessions
                   (id, user_id, work_date, status, check_in_at, check_out_at,
                    break_started_at, total_break_secs, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               ON CONFLICT (id) DO UPDATE SET
                   status = EXCLUDED.status,
                   check_out_at = EXCLUDED.check_out_at,
                   break_started_at = EXCLUDED.break_started_at,
                   total_break_secs = EXCLUDED.total_break_secs,
                   updated_at = EXCLUDED.updated_at"#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.work_date)
        .bind(session.status.as_str())
        .bind(session.check_in_at)
        .bind(session.check_out_at)
        .bind(session.break_started_at)
        .bind(session.total_break_secs)
        .bind(session.updated_at)
        .execute(&mut *tx)
        .await;
        if let Err(e) = res {
            // Partial unique index: a concurrent check-in won the race.
            if is_unique_violation(&e) {
                return Err(AttendanceError::AlreadyCheckedIn.into());
            }
            return Err(e.into());
        }

        sqlx::query("DELETE FROM attendance_breaks WHERE session_id = $1")
            .bind(session.id)
            .execute(&mut *tx)
            .await?;
        for b in &session.breaks {
            sqlx::query(
                "INSERT INTO attendance_breaks (session_id, started_at, ended_at) VALUES ($1, $2, $3)",
            )
            .bind(session.id)
            .bind(b.started_at)
            .bind(b.ended_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<AttendanceSession>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM attendance_sessions s \
             WHERE s.user_id = $1 \
               AND ($2::date IS NULL OR s.work_date >= $2) \
               AND ($3::date IS NULL OR s.work_date <= $3) \
             ORDER BY s.check_in_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        let mut sessions = rows
            .iter()
            .map(session_from_row)
            .collect::<anyhow::Result<Vec<_>>>()?;
        self.attach_breaks(&mut sessions).await?;
        Ok(sessions)
    }

    async fn list_open(&self) -> anyhow::Result<Vec<ActiveAttendee>> {
        let sql = format!(
            "SELECT {COLUMNS}, u.name AS user_name FROM attendance_sessions s \
             JOIN users u ON u.id = s.user_id \
             WHERE s.status <> 'checked_out' \
             ORDER BY LOWER(u.name), s.user_id"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let mut sessions = Vec::with_capacity(rows.len());
        let mut names = Vec::with_capacity(rows.len());
        for r in &rows {
            sessions.push(session_from_row(r)?);
            names.push(r.try_get::<String, _>("user_name")?);
        }
        self.attach_breaks(&mut sessions).await?;
        Ok(sessions
            .into_iter()
            .zip(names)
            .map(|(session, name)| ActiveAttendee {
                user_id: session.user_id,
                name,
                session,
            })
            .collect())
    }
}
