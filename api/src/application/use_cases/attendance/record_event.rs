use chrono::{DateTime, Utc};

use crate::application::access::{self, Actor};
use crate::application::ports::attendance_repository::AttendanceRepository;
use crate::domain::access::role::{Action, Resource};
use crate::domain::attendance::session::{self, AttendanceEvent, AttendanceSession};

pub struct RecordAttendanceEvent<'a, R: AttendanceRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AttendanceRepository + ?Sized> RecordAttendanceEvent<'a, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        event: AttendanceEvent,
        at: DateTime<Utc>,
    ) -> anyhow::Result<AttendanceSession> {
        access::require(actor, Resource::Attendance, Action::Write)?;
        let open = self.repo.find_open(actor.user_id).await?;
        let next = session::transition(open, actor.user_id, event, at)?;
        self.repo.save(&next).await?;
        tracing::info!(
            user_id = %actor.user_id,
            session_id = %next.id,
            event = %event,
            status = %next.status,
            "attendance_event"
        );
        Ok(next)
    }
}
