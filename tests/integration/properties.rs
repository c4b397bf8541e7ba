//! Property tests for the reconciliation policy.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use userdash::remote::{InMemoryDirectory, Operation};
use userdash::{Dispatcher, Intent, UserDraft, UserRecord, UserStore};

#[derive(Debug, Clone)]
enum Step {
    Create { name: String, fail: bool },
    Update { id: u64, name: String, fail: bool },
    Delete { id: u64, fail: bool },
    Refresh { fail: bool },
}

impl Step {
    fn operation(&self) -> Operation {
        match self {
            Step::Create { .. } => Operation::Create,
            Step::Update { .. } => Operation::Update,
            Step::Delete { .. } => Operation::Delete,
            Step::Refresh { .. } => Operation::List,
        }
    }

    fn fails(&self) -> bool {
        match self {
            Step::Create { fail, .. }
            | Step::Update { fail, .. }
            | Step::Delete { fail, .. }
            | Step::Refresh { fail } => *fail,
        }
    }

    fn into_intent(self) -> Intent {
        match self {
            Step::Create { name, .. } => Intent::Create(UserDraft::new(name, "p@x.com")),
            Step::Update { id, name, .. } => Intent::Update {
                id,
                draft: UserDraft {
                    name: Some(name),
                    ..UserDraft::default()
                },
            },
            Step::Delete { id, .. } => Intent::Delete(id),
            Step::Refresh { .. } => Intent::Refresh,
        }
    }
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        ("[a-z]{1,8}", any::<bool>()).prop_map(|(name, fail)| Step::Create { name, fail }),
        (1u64..12, "[a-z]{1,8}", any::<bool>())
            .prop_map(|(id, name, fail)| Step::Update { id, name, fail }),
        (1u64..12, any::<bool>()).prop_map(|(id, fail)| Step::Delete { id, fail }),
        any::<bool>().prop_map(|fail| Step::Refresh { fail }),
    ]
}

fn seed_strategy() -> impl Strategy<Value = Vec<UserRecord>> {
    prop::collection::btree_set(1u64..10, 0..6).prop_map(|ids| {
        ids.into_iter()
            .map(|id| UserRecord::from_draft(id, UserDraft::new(format!("u{}", id), "s@x.com")))
            .collect()
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn run_steps(seed: Vec<UserRecord>, steps: Vec<Step>, check: impl Fn(&[UserRecord])) {
    runtime().block_on(async {
        let directory = Arc::new(InMemoryDirectory::with_users(seed));
        let dispatcher = Dispatcher::new(UserStore::new(), directory.clone());
        for step in steps {
            let op = step.operation();
            if step.fails() {
                directory.fail(op, "Network Error");
            } else {
                directory.recover(op);
            }
            dispatcher.dispatch(step.into_intent()).await;
            check(&dispatcher.store().users());
        }
    });
}

fn apply_with(seed: Vec<UserRecord>, intent: Intent, fail: bool) -> Vec<UserRecord> {
    runtime().block_on(async {
        let directory = Arc::new(InMemoryDirectory::with_users(seed.clone()));
        let dispatcher = Dispatcher::new(UserStore::with_users(seed), directory.clone());
        if fail {
            for op in [Operation::Create, Operation::Update, Operation::Delete] {
                directory.fail(op, "Network Error");
            }
        }
        dispatcher.dispatch(intent).await;
        dispatcher.store().users()
    })
}

proptest! {
    #[test]
    fn ids_stay_unique(seed in seed_strategy(), steps in prop::collection::vec(step_strategy(), 0..20)) {
        run_steps(seed, steps, |users| {
            let ids: HashSet<u64> = users.iter().map(|u| u.id).collect();
            assert_eq!(ids.len(), users.len());
        });
    }

    #[test]
    fn mutations_converge_regardless_of_remote(seed in seed_strategy(), step in step_strategy()) {
        prop_assume!(!matches!(step, Step::Refresh { .. }));
        let intent = step.into_intent();
        let confirmed = apply_with(seed.clone(), intent.clone(), false);
        let fallback = apply_with(seed, intent, true);
        prop_assert_eq!(confirmed, fallback);
    }

    #[test]
    fn failed_refresh_preserves_users(seed in seed_strategy()) {
        let users = runtime().block_on(async {
            let directory = Arc::new(InMemoryDirectory::new());
            directory.fail(Operation::List, "Network Error");
            let dispatcher = Dispatcher::new(UserStore::with_users(seed.clone()), directory);
            dispatcher.refresh().await;
            dispatcher.store().users()
        });
        prop_assert_eq!(users, seed);
    }
}
