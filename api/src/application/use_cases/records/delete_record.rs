use std::marker::PhantomData;

use uuid::Uuid;

use crate::application::access::{self, Actor};
use crate::application::ports::record_repository::RecordRepository;
use crate::domain::access::role::Action;
use crate::domain::records::Record;

pub struct DeleteRecord<'a, R: Record, P: RecordRepository<R> + ?Sized> {
    pub repo: &'a P,
    pub _record: PhantomData<R>,
}

impl<'a, R: Record, P: RecordRepository<R> + ?Sized> DeleteRecord<'a, R, P> {
    pub fn new(repo: &'a P) -> Self {
        Self {
            repo,
            _record: PhantomData,
        }
    }

    pub async fn execute(&self, actor: &Actor, id: Uuid) -> anyhow::Result<bool> {
        access::require(actor, R::RESOURCE, Action::Write)?;
        let deleted = self.repo.delete(id).await?;
        if deleted {
            tracing::info!(resource = R::RESOURCE.key(), id = %id, by = %actor.user_id, "record_deleted");
        }
        Ok(deleted)
    }
}
