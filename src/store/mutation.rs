//! Collection mutations.
//!
//! `apply` is the single place the `users` sequence changes. Both settlement
//! branches of an intent go through it, so the confirmed and fallback paths
//! cannot drift apart.

use crate::types::{UserDraft, UserId, UserRecord};
use std::collections::HashSet;
use tracing::warn;

/// A change to the users sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Replace the whole sequence, preserving the given order
    ReplaceAll(Vec<UserRecord>),
    /// Append a new record under a locally allocated id
    Append(UserDraft),
    /// Merge a draft into the record with this id
    Merge { id: UserId, draft: UserDraft },
    /// Remove the record with this id
    Remove(UserId),
}

/// What a mutation did to the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// No mutation was applied
    Unchanged,
    Replaced { count: usize },
    Appended { id: UserId },
    Merged { id: UserId },
    Removed { id: UserId },
    /// Merge or remove targeted an id not in the collection; nothing changed
    Missing { id: UserId },
}

impl Applied {
    /// Returns true if the users sequence was modified
    pub fn changed(&self) -> bool {
        !matches!(self, Applied::Unchanged | Applied::Missing { .. })
    }
}

/// Next free id: one past the largest id in use, or 1 for an empty collection.
///
/// When the largest id is `UserId::MAX` the lowest unused id is taken instead.
pub fn next_id(users: &[UserRecord]) -> UserId {
    match users.iter().map(|u| u.id).max() {
        None => 1,
        Some(max) => max.checked_add(1).unwrap_or_else(|| lowest_free_id(users)),
    }
}

fn lowest_free_id(users: &[UserRecord]) -> UserId {
    let taken: HashSet<UserId> = users.iter().map(|u| u.id).collect();
    // At most `users.len()` ids are taken, so one of the first `len + 1` is free.
    (1..=UserId::MAX).find(|id| !taken.contains(id)).unwrap_or(0)
}

/// Apply one mutation to the sequence.
pub fn apply(users: &mut Vec<UserRecord>, mutation: Mutation) -> Applied {
    match mutation {
        Mutation::ReplaceAll(incoming) => {
            *users = dedup_by_id(incoming);
            Applied::Replaced { count: users.len() }
        }
        Mutation::Append(draft) => {
            let id = next_id(users);
            users.push(UserRecord::from_draft(id, draft));
            Applied::Appended { id }
        }
        Mutation::Merge { id, draft } => match users.iter_mut().find(|u| u.id == id) {
            Some(record) => {
                record.merge(draft);
                Applied::Merged { id }
            }
            None => Applied::Missing { id },
        },
        Mutation::Remove(id) => {
            let before = users.len();
            users.retain(|u| u.id != id);
            if users.len() < before {
                Applied::Removed { id }
            } else {
                Applied::Missing { id }
            }
        }
    }
}

/// Keep the first record for each id.
fn dedup_by_id(incoming: Vec<UserRecord>) -> Vec<UserRecord> {
    let mut seen = HashSet::with_capacity(incoming.len());
    let total = incoming.len();
    let users: Vec<UserRecord> = incoming.into_iter().filter(|u| seen.insert(u.id)).collect();
    if users.len() < total {
        warn!(
            received = total,
            kept = users.len(),
            "Remote payload contained duplicate ids, keeping first occurrence"
        );
    }
    users
}
