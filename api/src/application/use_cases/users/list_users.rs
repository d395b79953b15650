use crate::application::access::{self, Actor};
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::access::role::{Action, Resource};
use crate::domain::records::{Page, RecordFilter};

pub struct ListUsers<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ListUsers<'a, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        query: Option<String>,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> anyhow::Result<Page<UserRow>> {
        access::require(actor, Resource::Users, Action::Read)?;
        // Same paging rules as the record lists.
        let paging = RecordFilter::new(page, per_page);
        let query = query.filter(|q| !q.trim().is_empty());
        self.repo.list(query, paging.page, paging.per_page).await
    }
}
