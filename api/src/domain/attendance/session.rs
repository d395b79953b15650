use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    CheckedIn,
    OnBreak,
    CheckedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceEvent {
    CheckIn,
    StartBreak,
    EndBreak,
    CheckOut,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AttendanceError {
    #[error("already checked in")]
    AlreadyCheckedIn,
    #[error("not checked in")]
    NotCheckedIn,
    #[error("cannot {event} while {from}")]
    InvalidTransition {
        from: AttendanceStatus,
        event: AttendanceEvent,
    },
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::CheckedIn => "checked_in",
            AttendanceStatus::OnBreak => "on_break",
            AttendanceStatus::CheckedOut => "checked_out",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "checked_in" => Some(AttendanceStatus::CheckedIn),
            "on_break" => Some(AttendanceStatus::OnBreak),
            "checked_out" => Some(AttendanceStatus::CheckedOut),
            _ => None,
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AttendanceEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceEvent::CheckIn => "check_in",
            AttendanceEvent::StartBreak => "start_break",
            AttendanceEvent::EndBreak => "end_break",
            AttendanceEvent::CheckOut => "check_out",
        }
    }
}

impl fmt::Display for AttendanceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakPeriod {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl BreakPeriod {
    pub fn secs(&self) -> i64 {
        (self.ended_at - self.started_at).num_seconds().max(0)
    }
}

/// One working session of a user, from check-in to check-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub work_date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in_at: DateTime<Utc>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub break_started_at: Option<DateTime<Utc>>,
    pub total_break_secs: i64,
    pub breaks: Vec<BreakPeriod>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceSession {
    pub fn check_in(user_id: Uuid, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            work_date: at.date_naive(),
            status: AttendanceStatus::CheckedIn,
            check_in_at: at,
            check_out_at: None,
            break_started_at: None,
            total_break_secs: 0,
            breaks: Vec::new(),
            updated_at: at,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status != AttendanceStatus::CheckedOut
    }

    pub fn apply(&mut self, event: AttendanceEvent, at: DateTime<Utc>) -> Result<(), AttendanceError> {
        match (self.status, event) {
            (AttendanceStatus::CheckedIn | AttendanceStatus::OnBreak, AttendanceEvent::CheckIn) => {
                return Err(AttendanceError::AlreadyCheckedIn);
            }
            (AttendanceStatus::CheckedIn, AttendanceEvent::StartBreak) => {
                self.status = AttendanceStatus::OnBreak;
                self.break_started_at = Some(at);
            }
            (AttendanceStatus::OnBreak, AttendanceEvent::EndBreak) => {
                self.close_break(at);
                self.status = AttendanceStatus::CheckedIn;
            }
            (AttendanceStatus::CheckedIn | AttendanceStatus::OnBreak, AttendanceEvent::CheckOut) => {
                // An open break ends at the check-out instant.
                self.close_break(at);
                self.status = AttendanceStatus::CheckedOut;
                self.check_out_at = Some(at);
            }
            (AttendanceStatus::CheckedOut, _) => return Err(AttendanceError::NotCheckedIn),
            (from, event) => return Err(AttendanceError::InvalidTransition { from, event }),
        }
        self.updated_at = at;
        Ok(())
    }

    fn close_break(&mut self, at: DateTime<Utc>) {
        if let Some(started_at) = self.break_started_at.take() {
            let period = BreakPeriod {
                started_at,
                ended_at: at.max(started_at),
            };
            self.total_break_secs += period.secs();
            self.breaks.push(period);
        }
    }

    /// Break time including a break that is still running at `now`.
    pub fn break_secs(&self, now: DateTime<Utc>) -> i64 {
        let running = self
            .break_started_at
            .map(|s| (now - s).num_seconds().max(0))
            .unwrap_or(0);
        self.total_break_secs + running
    }

    pub fn worked_secs(&self, now: DateTime<Utc>) -> i64 {
        let end = self.check_out_at.unwrap_or(now);
        let gross = (end - self.check_in_at).num_seconds();
        (gross - self.break_secs(end)).max(0)
    }
}

/// Applies `event` to the user's open session, if any. A check-in without an
/// open session starts a new one.
pub fn transition(
    open: Option<AttendanceSession>,
    user_id: Uuid,
    event: AttendanceEvent,
    at: DateTime<Utc>,
) -> Result<AttendanceSession, AttendanceError> {
    match open {
        None if event == AttendanceEvent::CheckIn => Ok(AttendanceSession::check_in(user_id, at)),
        None => Err(AttendanceError::NotCheckedIn),
        Some(mut session) => {
            session.apply(event, at)?;
            Ok(session)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
    }

    #[test]
    fn full_day_with_one_break() {
        let uid = Uuid::new_v4();
        let s = transition(None, uid, AttendanceEvent::CheckIn, t0()).unwrap();
        let s = transition(
            Some(s),
            uid,
            AttendanceEvent::StartBreak,
            t0() + Duration::hours(4),
        )
        .unwrap();
        assert_eq!(s.status, AttendanceStatus::OnBreak);
        let s = transition(
            Some(s),
            uid,
            AttendanceEvent::EndBreak,
            t0() + Duration::minutes(270),
        )
        .unwrap();
        let s = transition(
            Some(s),
            uid,
            AttendanceEvent::CheckOut,
            t0() + Duration::hours(9),
        )
        .unwrap();

        assert_eq!(s.status, AttendanceStatus::CheckedOut);
        assert_eq!(s.total_break_secs, 30 * 60);
        assert_eq!(s.breaks.len(), 1);
        assert_eq!(s.worked_secs(t0() + Duration::hours(20)), 8 * 3600 + 30 * 60);
        assert_eq!(s.work_date, t0().date_naive());
    }

    #[test]
    fn check_out_closes_running_break() {
        let uid = Uuid::new_v4();
        let mut s = AttendanceSession::check_in(uid, t0());
        s.apply(AttendanceEvent::StartBreak, t0() + Duration::hours(1))
            .unwrap();
        s.apply(AttendanceEvent::CheckOut, t0() + Duration::hours(2))
            .unwrap();
        assert_eq!(s.break_started_at, None);
        assert_eq!(s.total_break_secs, 3600);
        assert_eq!(s.worked_secs(t0() + Duration::hours(5)), 3600);
    }

    #[test]
    fn running_break_counts_against_worked_time() {
        let mut s = AttendanceSession::check_in(Uuid::new_v4(), t0());
        s.apply(AttendanceEvent::StartBreak, t0() + Duration::hours(2))
            .unwrap();
        let now = t0() + Duration::hours(3);
        assert_eq!(s.break_secs(now), 3600);
        assert_eq!(s.worked_secs(now), 7200);
    }

    #[test]
    fn rejects_invalid_events() {
        let uid = Uuid::new_v4();
        assert_eq!(
            transition(None, uid, AttendanceEvent::StartBreak, t0()),
            Err(AttendanceError::NotCheckedIn)
        );

        let mut s = AttendanceSession::check_in(uid, t0());
        assert_eq!(
            s.apply(AttendanceEvent::CheckIn, t0()),
            Err(AttendanceError::AlreadyCheckedIn)
        );
        assert_eq!(
            s.apply(AttendanceEvent::EndBreak, t0()),
            Err(AttendanceError::InvalidTransition {
                from: AttendanceStatus::CheckedIn,
                event: AttendanceEvent::EndBreak
            })
        );
        s.apply(AttendanceEvent::StartBreak, t0()).unwrap();
        assert!(matches!(
            s.apply(AttendanceEvent::StartBreak, t0()),
            Err(AttendanceError::InvalidTransition { .. })
        ));
        s.apply(AttendanceEvent::CheckOut, t0()).unwrap();
        assert_eq!(
            s.apply(AttendanceEvent::EndBreak, t0()),
            Err(AttendanceError::NotCheckedIn)
        );
    }

    #[test]
    fn clock_skew_never_goes_negative() {
        let mut s = AttendanceSession::check_in(Uuid::new_v4(), t0());
        s.apply(AttendanceEvent::StartBreak, t0()).unwrap();
        s.apply(AttendanceEvent::EndBreak, t0() - Duration::minutes(5))
            .unwrap();
        assert_eq!(s.total_break_secs, 0);
        assert_eq!(s.worked_secs(t0() - Duration::hours(1)), 0);
    }
}
