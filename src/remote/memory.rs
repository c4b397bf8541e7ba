//! In-memory directory.
//!
//! Behaves like the public mock API the dashboard talks to: writes are
//! acknowledged but never persisted, so `list` keeps returning the seed.
//! Failures can be injected per operation, and settlement can be held back
//! per operation with a [`Gate`] to force an ordering between concurrent calls.

use super::DirectoryClient;
use crate::error::RemoteFailure;
use crate::types::{Address, Company, UserDraft, UserId, UserRecord};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Remote operation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

/// Holds calls of one operation until released.
#[derive(Debug, Clone)]
pub struct Gate {
    semaphore: Arc<Semaphore>,
}

impl Gate {
    /// Let one held call through.
    pub fn release(&self) {
        self.semaphore.add_permits(1);
    }

    /// Let every current and future call through.
    pub fn open(&self) {
        self.semaphore.close();
    }
}

/// Non-persistent directory backed by a fixed seed
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    seed: RwLock<Vec<UserRecord>>,
    failures: RwLock<HashMap<Operation, String>>,
    gates: RwLock<HashMap<Operation, Gate>>,
    calls: AtomicUsize,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            seed: RwLock::new(users),
            ..Self::default()
        }
    }

    /// Small bundled directory used for offline runs.
    pub fn sample() -> Self {
        let entries = [
            ("Leanne Graham", "Sincere@april.biz", "Romaguera-Crona", "Gwenborough", Some("active")),
            ("Ervin Howell", "Shanna@melissa.tv", "Deckow-Crist", "Wisokyburgh", Some("pending")),
            ("Clementine Bauch", "Nathan@yesenia.net", "Romaguera-Jacobson", "McKenziehaven", None),
            ("Patricia Lebsack", "Julianne.OConner@kory.org", "Robel-Corkery", "South Elvis", Some("inactive")),
            ("Chelsey Dietrich", "Lucio_Hettinger@annie.ca", "Keebler LLC", "Roscoeview", Some("active")),
        ];
        let users = entries
            .iter()
            .enumerate()
            .map(|(i, (name, email, company, city, status))| UserRecord {
                id: i as UserId + 1,
                name: name.to_string(),
                username: None,
                email: email.to_string(),
                phone: None,
                website: None,
                company: Some(Company {
                    name: company.to_string(),
                }),
                address: Some(Address {
                    city: city.to_string(),
                    ..Address::default()
                }),
                status: (*status).map(str::to_string),
            })
            .collect();
        Self::with_users(users)
    }

    /// Make every call of `op` fail with `description` until recovered.
    pub fn fail(&self, op: Operation, description: impl Into<String>) {
        self.failures.write().insert(op, description.into());
    }

    pub fn recover(&self, op: Operation) {
        self.failures.write().remove(&op);
    }

    /// Hold calls of `op` until the returned gate releases them.
    pub fn hold(&self, op: Operation) -> Gate {
        let gate = Gate {
            semaphore: Arc::new(Semaphore::new(0)),
        };
        self.gates.write().insert(op, gate.clone());
        gate
    }

    /// Number of calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wait for the gate (if any), then report the injected failure (if any).
    async fn enter(&self, op: Operation) -> Result<(), RemoteFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.read().get(&op).cloned();
        if let Some(gate) = gate {
            // A closed semaphore means the gate was opened for good.
            if let Ok(permit) = gate.semaphore.acquire().await {
                permit.forget();
            }
        }
        match self.failures.read().get(&op) {
            Some(description) => Err(RemoteFailure::new(description.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DirectoryClient for InMemoryDirectory {
    async fn list(&self) -> Result<Vec<UserRecord>, RemoteFailure> {
        self.enter(Operation::List).await?;
        Ok(self.seed.read().clone())
    }

    async fn create(&self, draft: &UserDraft) -> Result<UserRecord, RemoteFailure> {
        self.enter(Operation::Create).await?;
        let id = self.seed.read().len() as UserId + 1;
        Ok(UserRecord::from_draft(id, draft.clone()))
    }

    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<UserRecord, RemoteFailure> {
        self.enter(Operation::Update).await?;
        let seed = self.seed.read();
        let mut record = seed
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| RemoteFailure::new("Request failed with status code 500"))?;
        record.merge(draft.clone());
        Ok(record)
    }

    async fn delete(&self, _id: UserId) -> Result<(), RemoteFailure> {
        self.enter(Operation::Delete).await
    }
}
