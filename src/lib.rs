//! Userdash: User Directory Dashboard Core
//!
//! Client-side state layer for a user directory dashboard. A [`store::UserStore`]
//! holds the collection of user records; a [`dispatch::Dispatcher`] turns
//! refresh/create/update/delete intents into calls against a remote
//! [`remote::DirectoryClient`] and settles each one with exactly one local
//! mutation. Create, update and delete fall back to the local mutation when the
//! remote call fails, so the collection reflects the attempted change either way.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod remote;
pub mod store;
pub mod tooling;
pub mod types;
pub mod views;

pub use dispatch::{Dispatcher, Intent, IntentKind, IntentOutcome};
pub use error::{ApiError, RemoteFailure};
pub use store::{Applied, RequestStatus, Settlement, Snapshot, UserStore};
pub use types::{Address, Company, UserDraft, UserId, UserRecord};
pub use views::{AggregateStats, FilteredView, ViewFilter};
