//! Derived Views
//!
//! Read-only projections over the users sequence: status-filtered views and
//! aggregate counts. Both are recomputed from the current state on every call;
//! nothing here is cached.

use crate::types::UserRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tag that selects every record
pub const ALL_TAG: &str = "all";

/// Status filter for a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewFilter {
    All,
    Status(String),
}

impl ViewFilter {
    /// Parse a tag; "all" (any case) selects everything.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case(ALL_TAG) {
            ViewFilter::All
        } else {
            ViewFilter::Status(tag.to_string())
        }
    }

    /// Untagged records match the default status, as they do in the stats.
    pub fn matches(&self, user: &UserRecord) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Status(tag) => user.effective_status() == tag.as_str(),
        }
    }
}

impl From<&str> for ViewFilter {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

/// Filtered view over a snapshot of the users sequence.
///
/// Owns its snapshot, so it stays valid after the store moves on. `iter()`
/// evaluates the filter lazily and can be called any number of times.
#[derive(Debug, Clone)]
pub struct FilteredView {
    users: Vec<UserRecord>,
    filter: ViewFilter,
}

impl FilteredView {
    pub fn new(users: Vec<UserRecord>, filter: ViewFilter) -> Self {
        Self { users, filter }
    }

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserRecord> + '_ {
        self.users.iter().filter(move |u| self.filter.matches(u))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn to_vec(&self) -> Vec<UserRecord> {
        self.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a FilteredView {
    type Item = &'a UserRecord;
    type IntoIter = Box<dyn Iterator<Item = &'a UserRecord> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Aggregate counts shown on the dashboard's stat cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total: usize,
    /// Records whose status is not "inactive" (no status counts as active)
    pub active: usize,
    pub pending: usize,
    /// Distinct company names among records that have a company
    pub distinct_companies: usize,
}

impl AggregateStats {
    pub fn from_users(users: &[UserRecord]) -> Self {
        let companies: HashSet<&str> = users.iter().filter_map(|u| u.company_name()).collect();
        Self {
            total: users.len(),
            active: users
                .iter()
                .filter(|u| u.effective_status() != "inactive")
                .count(),
            pending: users.iter().filter(|u| u.status() == Some("pending")).count(),
            distinct_companies: companies.len(),
        }
    }
}
