use std::marker::PhantomData;

use uuid::Uuid;

use crate::application::access::{self, Actor};
use crate::application::ports::record_repository::RecordRepository;
use crate::domain::access::role::Action;
use crate::domain::records::Record;

pub struct UpdateRecord<'a, R: Record, P: RecordRepository<R> + ?Sized> {
    pub repo: &'a P,
    pub _record: PhantomData<R>,
}

impl<'a, R: Record, P: RecordRepository<R> + ?Sized> UpdateRecord<'a, R, P> {
    pub fn new(repo: &'a P) -> Self {
        Self {
            repo,
            _record: PhantomData,
        }
    }

    /// Merges the patch onto the stored record and validates the result as
    /// a whole before writing it back.
    pub async fn execute(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: &R::Patch,
    ) -> anyhow::Result<Option<R>> {
        access::require(actor, R::RESOURCE, Action::Write)?;
        let current = match self.repo.get(id).await? {
            Some(r) => r,
            None => return Ok(None),
        };
        let draft = current.merge(patch);
        R::validate(&draft)?;
        self.repo.update(id, &draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MemRecords;
    use crate::domain::access::role::Role;
    use crate::domain::records::ValidationError;
    use crate::domain::records::project::{Project, ProjectDraft, ProjectPatch, ProjectStatus};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn patch_is_validated_against_the_stored_record() {
        let repo = MemRecords::<Project>::default();
        let actor = Actor::new(Uuid::new_v4(), Role::Admin);
        let p = repo
            .create(
                actor.user_id,
                &ProjectDraft {
                    name: "Wells".into(),
                    description: None,
                    status: ProjectStatus::Planned,
                    program_id: None,
                    manager_id: None,
                    budget_cents: 500,
                    start_date: NaiveDate::from_ymd_opt(2026, 5, 1),
                    end_date: None,
                },
            )
            .await
            .unwrap();
        let uc = UpdateRecord::new(&repo);

        let err = uc
            .execute(
                &actor,
                p.id,
                &ProjectPatch {
                    end_date: Some(NaiveDate::from_ymd_opt(2026, 4, 1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::DateOrder { .. })
        ));

        let updated = uc
            .execute(
                &actor,
                p.id,
                &ProjectPatch {
                    status: Some(ProjectStatus::Active),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::Active);
        assert_eq!(updated.budget_cents, 500);

        assert!(
            uc.execute(&actor, Uuid::new_v4(), &ProjectPatch::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
