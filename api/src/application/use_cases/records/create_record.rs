use std::marker::PhantomData;

use crate::application::access::{self, Actor};
use crate::application::ports::record_repository::RecordRepository;
use crate::domain::access::role::Action;
use crate::domain::records::Record;

pub struct CreateRecord<'a, R: Record, P: RecordRepository<R> + ?Sized> {
    pub repo: &'a P,
    pub _record: PhantomData<R>,
}

impl<'a, R: Record, P: RecordRepository<R> + ?Sized> CreateRecord<'a, R, P> {
    pub fn new(repo: &'a P) -> Self {
        Self {
            repo,
            _record: PhantomData,
        }
    }

    pub async fn execute(&self, actor: &Actor, draft: &R::Draft) -> anyhow::Result<R> {
        access::require(actor, R::RESOURCE, Action::Write)?;
        R::validate(draft)?;
        let record = self.repo.create(actor.user_id, draft).await?;
        tracing::debug!(resource = R::RESOURCE.key(), id = %record.id(), "record_created");
        Ok(record)
    }
}
