//! Catalog records managed through the dashboard: programs, projects,
//! funding, beneficiaries, partners and resource distribution.
//!
//! Every record kind has a stored shape, a `Draft` used for create and
//! update, and a `Patch` that is merged onto the stored record and validated
//! again as a whole.

use uuid::Uuid;

use crate::domain::access::role::Resource;

pub mod beneficiary;
pub mod distribution;
pub mod donation;
pub mod grant;
pub mod partner;
pub mod program;
pub mod project;
pub mod validation;

pub use validation::ValidationError;

pub trait Record: Clone + Send + Sync + 'static {
    type Draft: Clone + Send + Sync + 'static;
    type Patch: Clone + Send + Sync + 'static;

    const RESOURCE: Resource;

    fn id(&self) -> Uuid;

    fn validate(draft: &Self::Draft) -> Result<(), ValidationError>;

    /// Draft equal to this record with `patch` applied.
    fn merge(&self, patch: &Self::Patch) -> Self::Draft;
}

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub q: Option<String>,
    pub status: Option<String>,
    pub project_id: Option<Uuid>,
    pub program_id: Option<Uuid>,
    pub page: i64,
    pub per_page: i64,
}

impl RecordFilter {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
            ..Default::default()
        }
    }

    pub fn search(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(contains_pattern)
    }

    pub fn status(&self) -> Option<&str> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Declares a closed string vocabulary stored as TEXT.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? } default $default:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(raw: &str) -> Option<Self> {
                let raw = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(raw))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use text_enum;

/// `ILIKE` pattern matching `needle` anywhere. The wildcards and the escape
/// character itself are matched literally; pair with `ESCAPE '\'`.
pub fn contains_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_clamps_paging() {
        let f = RecordFilter::new(Some(0), Some(1000));
        assert_eq!(f.page, 1);
        assert_eq!(f.per_page, MAX_PER_PAGE);
        assert_eq!(f.offset(), 0);

        let f = RecordFilter::new(Some(3), None);
        assert_eq!(f.limit(), DEFAULT_PER_PAGE);
        assert_eq!(f.offset(), 40);
    }

    #[test]
    fn blank_search_is_ignored() {
        let mut f = RecordFilter::new(None, None);
        f.q = Some("   ".into());
        assert_eq!(f.search(), None);
        f.q = Some(" water ".into());
        assert_eq!(f.search().as_deref(), Some("%water%"));
    }

    #[test]
    fn search_wildcards_match_literally() {
        let mut f = RecordFilter::new(None, None);
        f.q = Some("100%_done".into());
        assert_eq!(f.search().as_deref(), Some(r"%100\%\_done%"));
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
