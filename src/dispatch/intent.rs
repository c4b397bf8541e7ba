//! Intent types.

use crate::store::Mutation;
use crate::types::{UserDraft, UserId};
use std::fmt;

/// A user-triggered request to refresh or mutate the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Refresh,
    Create(UserDraft),
    Update { id: UserId, draft: UserDraft },
    Delete(UserId),
}

/// Intent discriminant, used for logging and outcome reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Refresh,
    Create,
    Update,
    Delete,
}

impl IntentKind {
    /// Error recorded when a failure carries no description
    pub fn default_failure(&self) -> &'static str {
        match self {
            IntentKind::Refresh => "Failed to fetch users",
            IntentKind::Create => "Failed to create user",
            IntentKind::Update => "Failed to update user",
            IntentKind::Delete => "Failed to delete user",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntentKind::Refresh => "refresh",
            IntentKind::Create => "create",
            IntentKind::Update => "update",
            IntentKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Refresh => IntentKind::Refresh,
            Intent::Create(_) => IntentKind::Create,
            Intent::Update { .. } => IntentKind::Update,
            Intent::Delete(_) => IntentKind::Delete,
        }
    }

    /// Record id the intent targets, if any
    pub fn target(&self) -> Option<UserId> {
        match self {
            Intent::Update { id, .. } | Intent::Delete(id) => Some(*id),
            Intent::Refresh | Intent::Create(_) => None,
        }
    }

    /// Mutation applied without a server payload.
    ///
    /// Refresh has nothing to apply locally.
    pub fn into_local_mutation(self) -> Option<Mutation> {
        match self {
            Intent::Refresh => None,
            Intent::Create(draft) => Some(Mutation::Append(draft)),
            Intent::Update { id, draft } => Some(Mutation::Merge { id, draft }),
            Intent::Delete(id) => Some(Mutation::Remove(id)),
        }
    }
}
