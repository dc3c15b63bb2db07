//! Versioned document storage with optimistic transactions
//!
//! Every document carries a version that is bumped on each write. A
//! transaction records the version of everything it reads and stages its
//! writes; commit applies the writes only if none of the read versions
//! moved, otherwise the body is re-run.
//!
//! # Usage
//!
//! ```ignore
//! let store = SqliteStore::open(&path)?;
//! let coins = run_transaction(&store, 5, |tx| {
//!     let mut user: User = tx.get(user_id)?.ok_or(...)?;
//!     user.coins += 10;
//!     tx.put(&user)?;
//!     Ok(user.coins)
//! })?;
//! ```

mod error;
mod memory;
mod sqlite;
mod transaction;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use transaction::{run_transaction, Transaction};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{Habit, User};

/// Top-level document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    Users,
    Habits,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Habits => "habits",
        }
    }
}

/// Address of a single document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocKey {
    pub collection: Collection,
    pub id: String,
}

impl DocKey {
    pub fn new(collection: Collection, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for DocKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection.as_str(), self.id)
    }
}

/// A stored document body together with its version
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedDoc {
    pub version: i64,
    pub body: serde_json::Value,
}

/// A staged change to one document
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Put(serde_json::Value),
    Delete,
}

/// Everything a transaction wants to commit
#[derive(Debug, Clone, Default)]
pub struct CommitBatch {
    /// Version each read document had (`None` if it did not exist)
    pub expected: Vec<(DocKey, Option<i64>)>,
    pub writes: Vec<(DocKey, Write)>,
}

/// Backend contract: point reads plus an atomic conditional commit.
///
/// `commit` must either apply every write or none, and must fail with
/// [`StoreError::Conflict`] when any expected version does not match.
pub trait DocumentStore: Send + Sync {
    fn fetch(&self, key: &DocKey) -> Result<Option<VersionedDoc>, StoreError>;

    fn commit(&self, batch: CommitBatch) -> Result<(), StoreError>;
}

/// A typed document living in a fixed collection
pub trait Document: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn doc_id(&self) -> &str;

    fn key_for(id: &str) -> DocKey {
        DocKey::new(Self::COLLECTION, id)
    }
}

impl Document for User {
    const COLLECTION: Collection = Collection::Users;

    fn doc_id(&self) -> &str {
        &self.id
    }
}

impl Document for Habit {
    const COLLECTION: Collection = Collection::Habits;

    fn doc_id(&self) -> &str {
        &self.id
    }
}

/// Read a single document outside of any transaction
pub fn fetch_doc<D: Document>(store: &dyn DocumentStore, id: &str) -> Result<Option<D>, StoreError> {
    match store.fetch(&D::key_for(id))? {
        Some(doc) => Ok(Some(serde_json::from_value(doc.body)?)),
        None => Ok(None),
    }
}
