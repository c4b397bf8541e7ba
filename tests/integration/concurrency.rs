//! Settlement ordering between concurrent intents.
//!
//! Intents are not serialized: whichever settles last decides the request
//! status, and a refresh settling after a local mutation overwrites it with
//! the server's version.

use crate::integration::support::{dispatcher_over, user};
use userdash::remote::{InMemoryDirectory, Operation};
use userdash::{Intent, RequestStatus, UserDraft};

fn rename(name: &str) -> UserDraft {
    UserDraft {
        name: Some(name.to_string()),
        ..UserDraft::default()
    }
}

#[tokio::test]
async fn refresh_settling_after_update_reverts_to_server_version() {
    let (dispatcher, directory) =
        dispatcher_over(InMemoryDirectory::with_users(vec![user(5, "Old", None)]));
    dispatcher.refresh().await;

    let list_gate = directory.hold(Operation::List);
    let update = dispatcher.spawn(Intent::Update {
        id: 5,
        draft: rename("New"),
    });
    let refresh = dispatcher.spawn(Intent::Refresh);

    let updated = update.await.unwrap();
    assert!(updated.is_confirmed());
    assert_eq!(dispatcher.store().user(5).unwrap().name, "New");

    list_gate.release();
    refresh.await.unwrap();
    assert_eq!(dispatcher.store().user(5).unwrap().name, "Old");
}

#[tokio::test]
async fn update_settling_after_refresh_survives() {
    let (dispatcher, directory) =
        dispatcher_over(InMemoryDirectory::with_users(vec![user(5, "Old", None)]));
    dispatcher.refresh().await;

    let update_gate = directory.hold(Operation::Update);
    let update = dispatcher.spawn(Intent::Update {
        id: 5,
        draft: rename("New"),
    });
    let refresh = dispatcher.spawn(Intent::Refresh);

    refresh.await.unwrap();
    assert_eq!(dispatcher.store().user(5).unwrap().name, "Old");

    update_gate.release();
    update.await.unwrap();
    assert_eq!(dispatcher.store().user(5).unwrap().name, "New");
}

#[tokio::test]
async fn request_status_reflects_last_settlement_not_last_issue() {
    let (dispatcher, directory) = dispatcher_over(InMemoryDirectory::new());
    directory.fail(Operation::List, "Network Error");
    let list_gate = directory.hold(Operation::List);

    // Refresh is issued first but settles last, with a failure.
    let refresh = dispatcher.spawn(Intent::Refresh);
    let create = dispatcher.spawn(Intent::Create(UserDraft::new("Ann", "a@x.com")));
    assert_eq!(dispatcher.store().request_status(), RequestStatus::Loading);

    create.await.unwrap();
    assert_eq!(dispatcher.store().request_status(), RequestStatus::Succeeded);

    list_gate.release();
    refresh.await.unwrap();
    let snapshot = dispatcher.store().snapshot();
    assert_eq!(snapshot.request_status, RequestStatus::Failed);
    assert_eq!(snapshot.last_error.as_deref(), Some("Network Error"));
    assert_eq!(snapshot.users.len(), 1);
}

#[tokio::test]
async fn concurrent_creates_allocate_distinct_ids() {
    let (dispatcher, directory) = dispatcher_over(InMemoryDirectory::new());
    let gate = directory.hold(Operation::Create);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            dispatcher.spawn(Intent::Create(UserDraft::new(
                format!("user{}", i),
                format!("user{}@x.com", i),
            )))
        })
        .collect();
    gate.open();

    let outcomes = futures::future::join_all(handles).await;
    assert!(outcomes.iter().all(|o| o.is_ok()));

    let mut ids: Vec<u64> = dispatcher.store().users().iter().map(|u| u.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=8).collect::<Vec<u64>>());
}
