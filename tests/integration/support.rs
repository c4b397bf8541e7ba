use std::sync::Arc;
use userdash::remote::InMemoryDirectory;
use userdash::{Company, Dispatcher, UserDraft, UserRecord, UserStore};

pub fn user(id: u64, name: &str, status: Option<&str>) -> UserRecord {
    let mut record = UserRecord::from_draft(id, UserDraft::new(name, format!("{}@example.com", name.to_lowercase())));
    record.status = status.map(str::to_string);
    record.company = Some(Company {
        name: format!("{} Co", name),
    });
    record
}

/// Dispatcher over an empty store and the given directory
pub fn dispatcher_over(directory: InMemoryDirectory) -> (Dispatcher, Arc<InMemoryDirectory>) {
    let directory = Arc::new(directory);
    let dispatcher = Dispatcher::new(UserStore::new(), directory.clone());
    (dispatcher, directory)
}

pub fn ids(dispatcher: &Dispatcher) -> Vec<u64> {
    dispatcher.store().users().iter().map(|u| u.id).collect()
}
