//! User Record Store
//!
//! Single source of truth for the collection state. The store is a cheap
//! cloneable handle; whoever owns the application context hands clones to the
//! dispatcher and to the presentation layer. Every transition takes the write
//! lock once, so readers never observe a half-applied settlement.

pub mod mutation;

use crate::types::{UserId, UserRecord};
use crate::views::{AggregateStats, FilteredView, ViewFilter};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use mutation::{Applied, Mutation};

/// Lifecycle of the most recent remote operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Failed,
    Succeeded,
}

/// How an intent settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The remote call succeeded
    Confirmed,
    /// The remote call failed; the local fallback was applied
    Fallback { error: String },
}

impl Settlement {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Settlement::Confirmed)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Settlement::Confirmed => None,
            Settlement::Fallback { error } => Some(error),
        }
    }
}

/// Owned collection state
#[derive(Debug, Clone, Default)]
pub struct CollectionState {
    /// Fetch/creation order
    pub users: Vec<UserRecord>,
    pub request_status: RequestStatus,
    pub last_error: Option<String>,
    /// Id of the record loaded into the edit form
    pub selected_for_edit: Option<UserId>,
    pub last_settled_at: Option<DateTime<Utc>>,
}

/// Point-in-time copy of the collection state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub users: Vec<UserRecord>,
    pub request_status: RequestStatus,
    pub last_error: Option<String>,
    pub last_settled_at: Option<DateTime<Utc>>,
}

/// Handle to the shared collection state
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    state: Arc<RwLock<CollectionState>>,
}

impl UserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        let store = Self::new();
        mutation::apply(&mut store.state.write().users, Mutation::ReplaceAll(users));
        store
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.read();
        Snapshot {
            users: state.users.clone(),
            request_status: state.request_status,
            last_error: state.last_error.clone(),
            last_settled_at: state.last_settled_at,
        }
    }

    pub fn users(&self) -> Vec<UserRecord> {
        self.state.read().users.clone()
    }

    pub fn request_status(&self) -> RequestStatus {
        self.state.read().request_status
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read().last_error.clone()
    }

    /// Look up a record by id
    pub fn user(&self, id: UserId) -> Option<UserRecord> {
        self.state.read().users.iter().find(|u| u.id == id).cloned()
    }

    /// View of the users matching a status tag, or all of them for "all".
    pub fn filtered_by(&self, filter: impl Into<ViewFilter>) -> FilteredView {
        FilteredView::new(self.users(), filter.into())
    }

    pub fn aggregate_stats(&self) -> AggregateStats {
        AggregateStats::from_users(&self.state.read().users)
    }

    /// Load a record into the edit form, or switch the form to create mode.
    pub fn select(&self, record: Option<&UserRecord>) {
        self.state.write().selected_for_edit = record.map(|r| r.id);
    }

    pub fn clear_selection(&self) {
        self.state.write().selected_for_edit = None;
    }

    /// Currently selected record, resolved by id; `None` once it is removed.
    pub fn selected(&self) -> Option<UserRecord> {
        let state = self.state.read();
        let id = state.selected_for_edit?;
        state.users.iter().find(|u| u.id == id).cloned()
    }

    pub fn clear_error(&self) {
        self.state.write().last_error = None;
    }

    /// Idle -> Pending transition for a new intent.
    pub(crate) fn begin_request(&self) {
        let mut state = self.state.write();
        state.request_status = RequestStatus::Loading;
        state.last_error = None;
    }

    /// Apply a settlement's mutation and status under one write lock.
    pub(crate) fn settle(&self, settlement: &Settlement, mutation: Option<Mutation>) -> Applied {
        let mut state = self.state.write();
        let applied = match mutation {
            Some(mutation) => mutation::apply(&mut state.users, mutation),
            None => Applied::Unchanged,
        };
        match settlement {
            Settlement::Confirmed => {
                state.request_status = RequestStatus::Succeeded;
            }
            Settlement::Fallback { error } => {
                state.request_status = RequestStatus::Failed;
                state.last_error = Some(error.clone());
            }
        }
        state.last_settled_at = Some(Utc::now());
        applied
    }
}
