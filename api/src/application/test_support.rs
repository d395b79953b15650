//! In-memory port implementations for use case and HTTP tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::application::ports::attendance_repository::{ActiveAttendee, AttendanceRepository};
use crate::application::ports::dashboard_repository::{CurrencyTotal, DashboardRepository};
use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::record_repository::RecordRepository;
use crate::application::ports::storage_port::{StoragePort, StoredBlob};
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::attendance::session::{AttendanceEvent, AttendanceSession};
use crate::domain::files::folder::{Folder, NewFile, StoredFile, union_grantees};
use crate::domain::records::beneficiary::{Beneficiary, BeneficiaryDraft};
use crate::domain::records::distribution::{Distribution, DistributionDraft};
use crate::domain::records::donation::{Donation, DonationDraft};
use crate::domain::records::grant::{Grant, GrantDraft};
use crate::domain::records::partner::{Partner, PartnerDraft};
use crate::domain::records::program::{Program, ProgramDraft};
use crate::domain::records::project::{Project, ProjectDraft};
use crate::domain::records::{Page, Record, RecordFilter};
use crate::infrastructure::storage::content_hash;

fn paginate<T: Clone>(items: Vec<T>, page: i64, per_page: i64) -> Page<T> {
    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(((page - 1) * per_page) as usize)
        .take(per_page as usize)
        .collect();
    Page {
        items,
        total,
        page,
        per_page,
    }
}

// --- users ---

#[derive(Default)]
pub struct MemUsers {
    rows: Mutex<Vec<UserRow>>,
}

impl MemUsers {
    pub fn seed(&self, email: &str, role: &str) -> UserRow {
        let row = UserRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: email.split('@').next().unwrap_or_default().to_string(),
            role: role.to_string(),
            password_hash: None,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        row
    }
}

#[async_trait]
impl UserRepository for MemUsers {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: &str,
    ) -> anyhow::Result<UserRow> {
        let mut rows = self.rows.lock().unwrap();
        anyhow::ensure!(
            !rows.iter().any(|r| r.email.eq_ignore_ascii_case(email)),
            "duplicate email"
        );
        let row = UserRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            password_hash: Some(password_hash.to_string()),
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list(
        &self,
        query: Option<String>,
        page: i64,
        per_page: i64,
    ) -> anyhow::Result<Page<UserRow>> {
        let q = query.map(|q| q.to_lowercase());
        let items: Vec<UserRow> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| match &q {
                Some(q) => r.name.to_lowercase().contains(q) || r.email.to_lowercase().contains(q),
                None => true,
            })
            .cloned()
            .collect();
        Ok(paginate(items, page, per_page))
    }

    async fn directory(&self) -> anyhow::Result<Vec<UserRow>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn update_role(&self, id: Uuid, role: &str) -> anyhow::Result<Option<UserRow>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|r| r.id == id).map(|r| {
            r.role = role.to_string();
            r.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() != before)
    }
}

// --- records ---

/// Builds a stored record from a draft the way the database would.
pub trait Materialize: Record {
    fn materialize(
        id: Uuid,
        created_by: Option<Uuid>,
        created_at: DateTime<Utc>,
        draft: &Self::Draft,
    ) -> Self;
    fn created_by(&self) -> Option<Uuid>;
    fn created_at(&self) -> DateTime<Utc>;
    fn text(&self) -> String;
}

pub struct MemRecords<R: Materialize> {
    rows: Mutex<Vec<R>>,
}

impl<R: Materialize> Default for MemRecords<R> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }
}

impl<R: Materialize> MemRecords<R> {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl<R: Materialize> RecordRepository<R> for MemRecords<R> {
    async fn list(&self, filter: &RecordFilter) -> anyhow::Result<Page<R>> {
        let needle = filter.q.as_deref().map(|q| q.trim().to_lowercase());
        let items: Vec<R> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| match needle.as_deref() {
                Some(n) if !n.is_empty() => r.text().to_lowercase().contains(n),
                _ => true,
            })
            .cloned()
            .collect();
        Ok(paginate(items, filter.page, filter.per_page))
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<R>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id)
            .cloned())
    }

    async fn create(&self, created_by: Uuid, draft: &R::Draft) -> anyhow::Result<R> {
        let row = R::materialize(Uuid::new_v4(), Some(created_by), Utc::now(), draft);
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, draft: &R::Draft) -> anyhow::Result<Option<R>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|r| r.id() == id).map(|r| {
            *r = R::materialize(id, r.created_by(), r.created_at(), draft);
            r.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        Ok(rows.len() != before)
    }
}

macro_rules! materialize {
    ($record:ident, $draft:ident, $text:ident, { $($field:ident),* $(,)? }) => {
        impl Materialize for $record {
            fn materialize(
                id: Uuid,
                created_by: Option<Uuid>,
                created_at: DateTime<Utc>,
                draft: &$draft,
            ) -> Self {
                let d = draft.clone();
                $record {
                    id,
                    $($field: d.$field,)*
                    created_by,
                    created_at,
                    updated_at: Utc::now(),
                }
            }

            fn created_by(&self) -> Option<Uuid> {
                self.created_by
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }

            fn text(&self) -> String {
                self.$text.clone()
            }
        }
    };
}

materialize!(Program, ProgramDraft, name, {
    name, description, status, start_date, end_date
});
materialize!(Project, ProjectDraft, name, {
    name, description, status, program_id, manager_id, budget_cents, start_date, end_date
});
materialize!(Grant, GrantDraft, title, {
    title, partner_id, funder_name, amount_cents, currency, status, project_id, starts_on, ends_on
});
materialize!(Donation, DonationDraft, donor_name, {
    donor_name, donor_email, amount_cents, currency, received_on, method, project_id, notes
});
materialize!(Beneficiary, BeneficiaryDraft, full_name, {
    full_name, gender, date_of_birth, location, contact, project_id, program_id, enrolled_on, notes
});
materialize!(Partner, PartnerDraft, name, {
    name, kind, contact_name, email, phone, website
});
materialize!(Distribution, DistributionDraft, resource_name, {
    resource_name, quantity, unit, beneficiary_id, project_id, distributed_on, notes
});

// --- folders & files ---

#[derive(Default)]
pub struct MemFolders {
    rows: Mutex<Vec<Folder>>,
}

impl MemFolders {
    pub fn seed(&self, owner_id: Uuid, name: &str, parent_id: Option<Uuid>) -> Folder {
        let folder = Folder {
            id: Uuid::new_v4(),
            name: name.to_string(),
            parent_id,
            owner_id,
            shared_with: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(folder.clone());
        folder
    }

    pub fn share(&self, id: Uuid, grantees: &[Uuid]) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(f) = rows.iter_mut().find(|f| f.id == id) {
            f.shared_with = union_grantees(&f.shared_with, grantees, f.owner_id);
        }
    }

    pub fn get_sync(&self, id: Uuid) -> Folder {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .expect("folder exists")
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.rows.lock().unwrap().iter().map(|f| f.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl FolderRepository for MemFolders {
    async fn create(
        &self,
        owner_id: Uuid,
        name: &str,
        parent_id: Option<Uuid>,
        shared_with: &[Uuid],
    ) -> anyhow::Result<Folder> {
        let folder = self.seed(owner_id, name, parent_id);
        self.set_shared_with(folder.id, shared_with).await?;
        Ok(Folder {
            shared_with: shared_with.to_vec(),
            ..folder
        })
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Folder>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .cloned())
    }

    async fn list_children(&self, parent_id: Option<Uuid>) -> anyhow::Result<Vec<Folder>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.parent_id == parent_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: Uuid,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> anyhow::Result<Option<Folder>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|f| f.id == id).map(|f| {
            f.name = name.to_string();
            f.parent_id = parent_id;
            f.updated_at = Utc::now();
            f.clone()
        }))
    }

    async fn set_shared_with(&self, id: Uuid, shared_with: &[Uuid]) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(f) = rows.iter_mut().find(|f| f.id == id) {
            f.shared_with = shared_with.to_vec();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        // Same restriction as the foreign key on folders.parent_id.
        anyhow::ensure!(
            !rows.iter().any(|f| f.parent_id == Some(id)),
            "folder still has children"
        );
        let before = rows.len();
        rows.retain(|f| f.id != id);
        Ok(rows.len() != before)
    }

    async fn list_shared_with(&self, user_id: Uuid) -> anyhow::Result<Vec<Folder>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.shared_with.contains(&user_id))
            .cloned()
            .collect())
    }

    async fn list_owned(&self, owner_id: Uuid) -> anyhow::Result<Vec<Folder>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemFiles {
    rows: Mutex<Vec<StoredFile>>,
}

impl MemFiles {
    pub fn seed(
        &self,
        owner_id: Uuid,
        name: &str,
        folder_id: Option<Uuid>,
        storage_key: Option<&str>,
    ) -> StoredFile {
        let file = StoredFile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            folder_id,
            owner_id,
            storage_key: storage_key.map(str::to_string),
            content_type: None,
            size: 0,
            content_hash: None,
            shared_with: Vec::new(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(file.clone());
        file
    }

    pub fn get_sync(&self, id: Uuid) -> StoredFile {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .expect("file exists")
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FilesRepository for MemFiles {
    async fn insert_file(&self, file: &NewFile) -> anyhow::Result<StoredFile> {
        let stored = StoredFile {
            id: Uuid::new_v4(),
            name: file.name.clone(),
            folder_id: file.folder_id,
            owner_id: file.owner_id,
            storage_key: Some(file.storage_key.clone()),
            content_type: file.content_type.clone(),
            size: file.size,
            content_hash: Some(file.content_hash.clone()),
            shared_with: file.shared_with.clone(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn get_file(&self, id: Uuid) -> anyhow::Result<Option<StoredFile>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .cloned())
    }

    async fn list_in_folder(&self, folder_id: Option<Uuid>) -> anyhow::Result<Vec<StoredFile>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.folder_id == folder_id)
            .cloned()
            .collect())
    }

    async fn set_shared_with(&self, id: Uuid, shared_with: &[Uuid]) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(f) = rows.iter_mut().find(|f| f.id == id) {
            f.shared_with = shared_with.to_vec();
        }
        Ok(())
    }

    async fn delete_file(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|f| f.id != id);
        Ok(rows.len() != before)
    }

    async fn list_shared_with(&self, user_id: Uuid) -> anyhow::Result<Vec<StoredFile>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.shared_with.contains(&user_id))
            .cloned()
            .collect())
    }

    async fn list_owned(&self, owner_id: Uuid) -> anyhow::Result<Vec<StoredFile>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemBlobs {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    failing: Mutex<HashSet<String>>,
}

impl MemBlobs {
    pub fn insert(&self, key: &str, bytes: &[u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
    }

    /// Makes every later `delete` of `key` fail.
    pub fn fail_on(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

#[async_trait]
impl StoragePort for MemBlobs {
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        _content_type: Option<&str>,
    ) -> anyhow::Result<StoredBlob> {
        self.insert(key, bytes);
        Ok(StoredBlob {
            key: key.to_string(),
            size: bytes.len() as i64,
            content_hash: content_hash(bytes),
        })
    }

    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("blob {} not found", key))
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.failing.lock().unwrap().contains(key),
            "simulated delete failure"
        );
        self.blobs.lock().unwrap().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.contains(key))
    }
}

// --- attendance ---

#[derive(Default)]
pub struct MemAttendance {
    sessions: Mutex<Vec<AttendanceSession>>,
}

impl MemAttendance {
    pub fn sessions_for(&self, user_id: Uuid) -> usize {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .count()
    }

    /// A finished eight hour session starting at `at`.
    pub fn seed_closed(&self, user_id: Uuid, at: DateTime<Utc>) {
        let mut s = AttendanceSession::check_in(user_id, at);
        s.apply(AttendanceEvent::CheckOut, at + Duration::hours(8))
            .expect("check out from checked in");
        self.sessions.lock().unwrap().push(s);
    }
}

#[async_trait]
impl AttendanceRepository for MemAttendance {
    async fn find_open(&self, user_id: Uuid) -> anyhow::Result<Option<AttendanceSession>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user_id == user_id && s.is_open())
            .cloned())
    }

    async fn save(&self, session: &AttendanceSession) -> anyhow::Result<()> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => *existing = session.clone(),
            None => {
                anyhow::ensure!(
                    !sessions.iter().any(|s| s.user_id == session.user_id && s.is_open()),
                    "open session already exists"
                );
                sessions.push(session.clone());
            }
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<AttendanceSession>> {
        let mut out: Vec<AttendanceSession> = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter(|s| from.is_none_or(|f| s.work_date >= f))
            .filter(|s| to.is_none_or(|t| s.work_date <= t))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.check_in_at.cmp(&a.check_in_at));
        Ok(out)
    }

    async fn list_open(&self) -> anyhow::Result<Vec<ActiveAttendee>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.is_open())
            .map(|s| ActiveAttendee {
                user_id: s.user_id,
                name: s.user_id.to_string(),
                session: s.clone(),
            })
            .collect())
    }
}

// --- dashboard ---

#[derive(Default)]
pub struct FixedDashboard {
    since: Mutex<Option<NaiveDate>>,
}

impl FixedDashboard {
    pub fn donations_since(&self) -> Option<NaiveDate> {
        *self.since.lock().unwrap()
    }
}

#[async_trait]
impl DashboardRepository for FixedDashboard {
    async fn project_status_counts(&self) -> anyhow::Result<Vec<(String, i64)>> {
        Ok(vec![("active".into(), 4), ("planned".into(), 2)])
    }

    async fn active_program_count(&self) -> anyhow::Result<i64> {
        Ok(3)
    }

    async fn awarded_grant_totals(&self) -> anyhow::Result<Vec<CurrencyTotal>> {
        Ok(vec![CurrencyTotal {
            currency: "USD".into(),
            total_cents: 5_000_000,
            count: 2,
        }])
    }

    async fn donation_totals(&self, since: Option<NaiveDate>) -> anyhow::Result<Vec<CurrencyTotal>> {
        *self.since.lock().unwrap() = since;
        Ok(vec![CurrencyTotal {
            currency: "KES".into(),
            total_cents: 120_000,
            count: 6,
        }])
    }

    async fn beneficiary_count(&self) -> anyhow::Result<i64> {
        Ok(42)
    }

    async fn partner_count(&self) -> anyhow::Result<i64> {
        Ok(7)
    }

    async fn distribution_count(&self, _since: NaiveDate) -> anyhow::Result<i64> {
        Ok(11)
    }

    async fn attendance_counts(&self) -> anyhow::Result<(i64, i64)> {
        Ok((3, 1))
    }
}
