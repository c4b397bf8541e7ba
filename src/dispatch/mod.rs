//! Intent Dispatch
//!
//! Turns user intents into a remote call followed by exactly one local
//! settlement. Create, update and delete apply the same mutation whether the
//! remote call succeeds or fails; only the recorded status differs. A failed
//! refresh leaves the collection untouched.
//!
//! Intents are independent: nothing is queued, nothing is cancelled, and the
//! store's request status reflects whichever intent settled last.

pub mod intent;

use crate::error::RemoteFailure;
use crate::remote::DirectoryClient;
use crate::store::{Applied, Mutation, Settlement, UserStore};
use crate::types::{UserDraft, UserId, UserRecord};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use intent::{Intent, IntentKind};

/// Result of a settled intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentOutcome {
    pub kind: IntentKind,
    pub settlement: Settlement,
    pub applied: Applied,
}

impl IntentOutcome {
    pub fn is_confirmed(&self) -> bool {
        self.settlement.is_confirmed()
    }
}

/// What the remote returned on success
enum RemoteResponse {
    Listed(Vec<UserRecord>),
    Created(UserRecord),
    Updated(UserRecord),
    Deleted,
}

/// Reconciles intents against the remote directory and the store.
#[derive(Clone)]
pub struct Dispatcher {
    store: UserStore,
    remote: Arc<dyn DirectoryClient>,
}

impl Dispatcher {
    pub fn new(store: UserStore, remote: Arc<dyn DirectoryClient>) -> Self {
        Self { store, remote }
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Issue an intent and wait for it to settle.
    pub async fn dispatch(&self, intent: Intent) -> IntentOutcome {
        self.begin(&intent);
        self.run(intent).await
    }

    /// Issue an intent as an independent task.
    ///
    /// The store enters `Loading` before this returns; the settlement happens
    /// whenever the task's remote call completes. Must be called from within a
    /// tokio runtime.
    pub fn spawn(&self, intent: Intent) -> JoinHandle<IntentOutcome> {
        self.begin(&intent);
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.run(intent).await })
    }

    pub async fn refresh(&self) -> IntentOutcome {
        self.dispatch(Intent::Refresh).await
    }

    pub async fn create_intent(&self, draft: UserDraft) -> IntentOutcome {
        self.dispatch(Intent::Create(draft)).await
    }

    pub async fn update_intent(&self, id: UserId, draft: UserDraft) -> IntentOutcome {
        self.dispatch(Intent::Update { id, draft }).await
    }

    pub async fn delete_intent(&self, id: UserId) -> IntentOutcome {
        self.dispatch(Intent::Delete(id)).await
    }

    fn begin(&self, intent: &Intent) {
        debug!(intent = %intent.kind(), target = ?intent.target(), "Intent issued");
        self.store.begin_request();
    }

    async fn run(&self, intent: Intent) -> IntentOutcome {
        let kind = intent.kind();
        let response = self.call_remote(&intent).await;
        let (settlement, mutation) = match response {
            Ok(response) => (Settlement::Confirmed, confirmed_mutation(intent, response)),
            Err(failure) => {
                let error = failure.describe_or(kind.default_failure());
                (Settlement::Fallback { error }, intent.into_local_mutation())
            }
        };
        let applied = self.store.settle(&settlement, mutation);

        match &settlement {
            Settlement::Confirmed => {
                info!(intent = %kind, applied = ?applied, "Intent settled");
            }
            Settlement::Fallback { error } => {
                warn!(
                    intent = %kind,
                    applied = ?applied,
                    error = %error,
                    "Remote call failed, applied local fallback"
                );
            }
        }
        if let Applied::Missing { id } = applied {
            debug!(intent = %kind, id, "No record with this id, collection unchanged");
        }

        IntentOutcome {
            kind,
            settlement,
            applied,
        }
    }

    async fn call_remote(&self, intent: &Intent) -> Result<RemoteResponse, RemoteFailure> {
        match intent {
            Intent::Refresh => self.remote.list().await.map(RemoteResponse::Listed),
            Intent::Create(draft) => self.remote.create(draft).await.map(RemoteResponse::Created),
            Intent::Update { id, draft } => self
                .remote
                .update(*id, draft)
                .await
                .map(RemoteResponse::Updated),
            Intent::Delete(id) => self.remote.delete(*id).await.map(|()| RemoteResponse::Deleted),
        }
    }
}

/// Mutation for a confirmed settlement.
///
/// Only refresh uses the payload; the others apply their local mutation, which
/// keeps confirmed and fallback results identical.
fn confirmed_mutation(intent: Intent, response: RemoteResponse) -> Option<Mutation> {
    match (intent, response) {
        (Intent::Refresh, RemoteResponse::Listed(users)) => Some(Mutation::ReplaceAll(users)),
        (intent, RemoteResponse::Created(server)) => {
            debug!(server_id = server.id, "Discarding server-assigned id");
            intent.into_local_mutation()
        }
        (intent, RemoteResponse::Updated(_) | RemoteResponse::Deleted) => {
            intent.into_local_mutation()
        }
        (intent, RemoteResponse::Listed(_)) => intent.into_local_mutation(),
    }
}
