//! Shared fixtures for ledger integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use ascend::ledger::{create_habit, sign_up};
use ascend::store::{
    fetch_doc, run_transaction, CommitBatch, DocKey, DocumentStore, MemoryStore, StoreError,
    VersionedDoc,
};
use ascend::{Category, CategoryProgress, Difficulty, Habit, HabitKind, NewHabit, User};

pub const ATTEMPTS: u32 = 5;

/// 2024-03-04, a Monday
pub fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Sign up `id` with 100 life
pub fn seed_user(store: &dyn DocumentStore, id: &str) -> User {
    sign_up(store, ATTEMPTS, id, id, 100, monday()).unwrap()
}

/// Memory store with one signed-up user `ada`
pub fn store_with_user() -> MemoryStore {
    let store = MemoryStore::new();
    seed_user(&store, "ada");
    store
}

pub fn add_habit(
    store: &dyn DocumentStore,
    user_id: &str,
    kind: HabitKind,
    difficulty: Difficulty,
    category: Category,
) -> Habit {
    create_habit(
        store,
        ATTEMPTS,
        user_id,
        NewHabit {
            name: format!("{:?} {:?} habit", difficulty, category),
            kind,
            difficulty,
            category,
        },
        monday(),
    )
    .unwrap()
}

pub fn user(store: &dyn DocumentStore, id: &str) -> User {
    fetch_doc(store, id).unwrap().unwrap()
}

pub fn habit(store: &dyn DocumentStore, id: &str) -> Habit {
    fetch_doc(store, id).unwrap().unwrap()
}

/// Overwrite fields of a stored user
pub fn edit_user(store: &dyn DocumentStore, id: &str, edit: impl Fn(&mut User)) {
    run_transaction::<_, StoreError, _>(store, ATTEMPTS, |tx| {
        let mut user: User = tx.get(id)?.unwrap();
        edit(&mut user);
        tx.put(&user)
    })
    .unwrap();
}

pub fn set_progress(store: &dyn DocumentStore, id: &str, category: Category, level: u32, exp: u32) {
    edit_user(store, id, |u| {
        u.categories.insert(category, CategoryProgress::at(level, exp));
    });
}

/// Store that reports a conflict for the first `failures` commits
pub struct FlakyStore {
    pub inner: MemoryStore,
    failures: AtomicU32,
    pub commits: AtomicU32,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore, failures: u32) -> Self {
        Self {
            inner,
            failures: AtomicU32::new(failures),
            commits: AtomicU32::new(0),
        }
    }

    pub fn commit_count(&self) -> u32 {
        self.commits.load(Ordering::SeqCst)
    }
}

impl DocumentStore for FlakyStore {
    fn fetch(&self, key: &DocKey) -> Result<Option<VersionedDoc>, StoreError> {
        self.inner.fetch(key)
    }

    fn commit(&self, batch: CommitBatch) -> Result<(), StoreError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        let left = self.failures.load(Ordering::SeqCst);
        if left > 0 {
            self.failures.store(left - 1, Ordering::SeqCst);
            return Err(StoreError::Conflict("forced".into()));
        }
        self.inner.commit(batch)
    }
}
