use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub shared_with: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: Uuid,
    pub name: String,
    pub folder_id: Option<Uuid>,
    pub owner_id: Uuid,
    /// Blob key; `None` for records whose upload never completed.
    pub storage_key: Option<String>,
    pub content_type: Option<String>,
    pub size: i64,
    pub content_hash: Option<String>,
    pub shared_with: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
    pub folder_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub storage_key: String,
    pub content_type: Option<String>,
    pub size: i64,
    pub content_hash: String,
    pub shared_with: Vec<Uuid>,
}

/// Anything with an owner and a sharing list.
pub trait Shared {
    fn owner_id(&self) -> Uuid;
    fn shared_with(&self) -> &[Uuid];

    fn is_shared_with(&self, user_id: Uuid) -> bool {
        self.shared_with().contains(&user_id)
    }
}

impl Shared for Folder {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn shared_with(&self) -> &[Uuid] {
        &self.shared_with
    }
}

impl Shared for StoredFile {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn shared_with(&self) -> &[Uuid] {
        &self.shared_with
    }
}

/// Set union that keeps the existing order and never lists the owner.
pub fn union_grantees(existing: &[Uuid], grantees: &[Uuid], owner_id: Uuid) -> Vec<Uuid> {
    let mut out = existing.to_vec();
    for id in grantees {
        if *id != owner_id && !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

pub fn remove_grantees(existing: &[Uuid], grantees: &[Uuid]) -> Vec<Uuid> {
    existing
        .iter()
        .copied()
        .filter(|id| !grantees.contains(id))
        .collect()
}

pub fn sanitize_name(name: &str) -> String {
    let mut s: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    if s.len() > 120 {
        let mut cut = 120;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    if s.is_empty() || s == "." || s == ".." {
        s = "untitled".into();
    }
    s
}
