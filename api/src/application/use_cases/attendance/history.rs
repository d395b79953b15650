use chrono::NaiveDate;
use uuid::Uuid;

use crate::application::access::{self, Actor};
use crate::application::ports::attendance_repository::AttendanceRepository;
use crate::domain::access::role::{Action, Resource};
use crate::domain::attendance::session::AttendanceSession;

pub struct AttendanceHistory<'a, R: AttendanceRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AttendanceRepository + ?Sized> AttendanceHistory<'a, R> {
    /// Sessions of `user_id` (the actor when `None`), newest first. Looking
    /// at someone else needs attendance reports access.
    pub async fn execute(
        &self,
        actor: &Actor,
        user_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<AttendanceSession>> {
        let target = user_id.unwrap_or(actor.user_id);
        if target == actor.user_id {
            access::require(actor, Resource::Attendance, Action::Read)?;
        } else {
            access::require(actor, Resource::AttendanceReports, Action::Read)?;
        }
        self.repo.list_for_user(target, from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MemAttendance;
    use crate::domain::access::role::Role;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn other_users_need_reports_access() {
        let repo = MemAttendance::default();
        let worker = Uuid::new_v4();
        repo.seed_closed(worker, Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap());
        repo.seed_closed(worker, Utc.with_ymd_and_hms(2026, 4, 3, 8, 0, 0).unwrap());
        let uc = AttendanceHistory { repo: &repo };

        let staff = Actor::new(Uuid::new_v4(), Role::Staff);
        let err = uc.execute(&staff, Some(worker), None, None).await.unwrap_err();
        assert!(err.downcast_ref::<access::Forbidden>().is_some());

        let manager = Actor::new(Uuid::new_v4(), Role::Manager);
        let all = uc.execute(&manager, Some(worker), None, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].work_date > all[1].work_date);

        let from = NaiveDate::from_ymd_opt(2026, 4, 2);
        let later = uc.execute(&manager, Some(worker), from, None).await.unwrap();
        assert_eq!(later.len(), 1);

        let own = Actor::new(worker, Role::Volunteer);
        assert_eq!(uc.execute(&own, None, None, None).await.unwrap().len(), 2);
    }
}
