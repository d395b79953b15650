use crate::application::access::{self, Actor};
use crate::application::ports::attendance_repository::AttendanceRepository;
use crate::domain::access::role::{Action, Resource};
use crate::domain::attendance::session::AttendanceSession;

pub struct CurrentAttendance<'a, R: AttendanceRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AttendanceRepository + ?Sized> CurrentAttendance<'a, R> {
    pub async fn execute(&self, actor: &Actor) -> anyhow::Result<Option<AttendanceSession>> {
        access::require(actor, Resource::Attendance, Action::Read)?;
        self.repo.find_open(actor.user_id).await
    }
}
