//! In-process document store

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{CommitBatch, DocKey, DocumentStore, StoreError, VersionedDoc, Write};

/// Document store kept entirely in memory
///
/// Cloning shares the same underlying documents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<Mutex<HashMap<DocKey, VersionedDoc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> Result<usize, StoreError> {
        let docs = self.docs.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(docs.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl DocumentStore for MemoryStore {
    fn fetch(&self, key: &DocKey) -> Result<Option<VersionedDoc>, StoreError> {
        let docs = self.docs.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(docs.get(key).cloned())
    }

    fn commit(&self, batch: CommitBatch) -> Result<(), StoreError> {
        let mut docs = self.docs.lock().map_err(|_| StoreError::Poisoned)?;

        for (key, expected) in &batch.expected {
            let current = docs.get(key).map(|d| d.version);
            if current != *expected {
                return Err(StoreError::Conflict(key.to_string()));
            }
        }

        for (key, write) in batch.writes {
            match write {
                Write::Put(body) => {
                    let version = docs.get(&key).map(|d| d.version + 1).unwrap_or(1);
                    docs.insert(key, VersionedDoc { version, body });
                }
                Write::Delete => {
                    docs.remove(&key);
                }
            }
        }
        Ok(())
    }
}
