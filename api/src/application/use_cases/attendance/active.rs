use crate::application::access::{self, Actor};
use crate::application::ports::attendance_repository::{ActiveAttendee, AttendanceRepository};
use crate::domain::access::role::{Action, Resource};

pub struct ActiveAttendance<'a, R: AttendanceRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AttendanceRepository + ?Sized> ActiveAttendance<'a, R> {
    pub async fn execute(&self, actor: &Actor) -> anyhow::Result<Vec<ActiveAttendee>> {
        access::require(actor, Resource::AttendanceReports, Action::Read)?;
        self.repo.list_open().await
    }
}
