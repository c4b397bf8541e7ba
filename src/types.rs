//! Core types for the user directory.
//!
//! `UserRecord` is one directory entry as the remote collection serves it.
//! `UserDraft` is the same shape without an id, every field optional; it is
//! the payload of create and update intents.

use serde::{Deserialize, Serialize};

/// UserId: identity of a record within the collection
pub type UserId = u64;

/// Status assumed for records that carry no status tag
pub const DEFAULT_STATUS: &str = "active";

/// Company the user belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub name: String,
}

/// Postal address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
}

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Status tag such as "active", "pending" or "inactive"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Record payload without an identity.
///
/// For updates only the `Some` fields are applied; nested `company` and
/// `address` replace the previous value as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UserDraft {
    /// Draft with the two required fields set
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Returns true if no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&UserRecord> for UserDraft {
    /// Pre-fill an edit draft from an existing record.
    fn from(record: &UserRecord) -> Self {
        Self {
            name: Some(record.name.clone()),
            username: record.username.clone(),
            email: Some(record.email.clone()),
            phone: record.phone.clone(),
            website: record.website.clone(),
            company: record.company.clone(),
            address: record.address.clone(),
            status: record.status.clone(),
        }
    }
}

impl UserRecord {
    /// Build a new record from a draft under the given id
    pub fn from_draft(id: UserId, draft: UserDraft) -> Self {
        Self {
            id,
            name: draft.name.unwrap_or_default(),
            username: draft.username,
            email: draft.email.unwrap_or_default(),
            phone: draft.phone,
            website: draft.website,
            company: draft.company,
            address: draft.address,
            status: draft.status,
        }
    }

    /// Overwrite the fields present in `draft`; everything else keeps its value.
    pub fn merge(&mut self, draft: UserDraft) {
        if let Some(name) = draft.name {
            self.name = name;
        }
        if let Some(email) = draft.email {
            self.email = email;
        }
        if draft.username.is_some() {
            self.username = draft.username;
        }
        if draft.phone.is_some() {
            self.phone = draft.phone;
        }
        if draft.website.is_some() {
            self.website = draft.website;
        }
        if draft.company.is_some() {
            self.company = draft.company;
        }
        if draft.address.is_some() {
            self.address = draft.address;
        }
        if draft.status.is_some() {
            self.status = draft.status;
        }
    }

    /// Company name, if any
    pub fn company_name(&self) -> Option<&str> {
        self.company.as_ref().map(|c| c.name.as_str())
    }

    /// Status tag, if any
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Status tag, with untagged records reading as [`DEFAULT_STATUS`]
    pub fn effective_status(&self) -> &str {
        self.status().unwrap_or(DEFAULT_STATUS)
    }
}

/// Check the fields the edit form requires before submission.
///
/// The store never calls this; it is the presentation layer's rule.
pub fn validate_draft(draft: &UserDraft) -> Result<(), String> {
    match draft.name.as_deref() {
        Some(name) if !name.trim().is_empty() => {}
        _ => return Err("Name is required".to_string()),
    }
    match draft.email.as_deref() {
        Some(email) if !email.trim().is_empty() => {}
        _ => return Err("Email is required".to_string()),
    }
    Ok(())
}
