//! Remote Directory Client
//!
//! Port for the remote user collection. Every call is asynchronous and may
//! fail; failures are reported as [`RemoteFailure`] and never carry transport
//! types past this boundary.

pub mod http;
pub mod memory;

use crate::error::RemoteFailure;
use crate::types::{UserDraft, UserId, UserRecord};
use async_trait::async_trait;

pub use http::HttpDirectoryClient;
pub use memory::{Gate, InMemoryDirectory, Operation};

/// Remote collection of user records.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Fetch the whole collection in server order.
    async fn list(&self) -> Result<Vec<UserRecord>, RemoteFailure>;

    /// Create a record; the returned identity is not authoritative.
    async fn create(&self, draft: &UserDraft) -> Result<UserRecord, RemoteFailure>;

    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<UserRecord, RemoteFailure>;

    async fn delete(&self, id: UserId) -> Result<(), RemoteFailure>;
}
