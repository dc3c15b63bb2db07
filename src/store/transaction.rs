//! Optimistic read-modify-write transactions

use std::collections::BTreeMap;

use super::{CommitBatch, DocKey, Document, DocumentStore, StoreError, Write};

/// Handle passed to a transaction body
///
/// Reads go to the store (or to a write staged earlier in the same body);
/// writes are buffered until commit.
pub struct Transaction<'a> {
    store: &'a dyn DocumentStore,
    reads: BTreeMap<DocKey, Option<i64>>,
    writes: BTreeMap<DocKey, Write>,
}

impl<'a> Transaction<'a> {
    fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            reads: BTreeMap::new(),
            writes: BTreeMap::new(),
        }
    }

    /// Read a document, recording its version for the commit check
    pub fn get<D: Document>(&mut self, id: &str) -> Result<Option<D>, StoreError> {
        let key = D::key_for(id);
        if let Some(staged) = self.writes.get(&key) {
            return match staged {
                Write::Put(body) => Ok(Some(serde_json::from_value(body.clone())?)),
                Write::Delete => Ok(None),
            };
        }

        let doc = self.store.fetch(&key)?;
        // First observed version wins; a later re-read that differs will
        // fail the commit check anyway.
        self.reads
            .entry(key)
            .or_insert_with(|| doc.as_ref().map(|d| d.version));

        match doc {
            Some(doc) => Ok(Some(serde_json::from_value(doc.body)?)),
            None => Ok(None),
        }
    }

    /// Stage a full replacement of a document
    pub fn put<D: Document>(&mut self, doc: &D) -> Result<(), StoreError> {
        let body = serde_json::to_value(doc)?;
        self.writes.insert(D::key_for(doc.doc_id()), Write::Put(body));
        Ok(())
    }

    /// Stage deletion of a document
    pub fn delete<D: Document>(&mut self, id: &str) {
        self.writes.insert(D::key_for(id), Write::Delete);
    }

    pub fn has_writes(&self) -> bool {
        !self.writes.is_empty()
    }

    fn into_batch(self) -> CommitBatch {
        CommitBatch {
            expected: self.reads.into_iter().collect(),
            writes: self.writes.into_iter().collect(),
        }
    }
}

/// Run `body` as an all-or-nothing transaction against `store`.
///
/// The body is re-executed from scratch whenever the commit finds that a
/// document it read has changed. Errors returned by the body abort the
/// transaction without writing anything. After `max_attempts` conflicting
/// commits the call fails with [`StoreError::RetriesExhausted`].
pub fn run_transaction<T, E, F>(store: &dyn DocumentStore, max_attempts: u32, mut body: F) -> Result<T, E>
where
    F: FnMut(&mut Transaction<'_>) -> Result<T, E>,
    E: From<StoreError>,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let mut tx = Transaction::new(store);
        let value = body(&mut tx)?;

        if !tx.has_writes() {
            return Ok(value);
        }

        match store.commit(tx.into_batch()) {
            Ok(()) => return Ok(value),
            Err(StoreError::Conflict(key)) => {
                tracing::debug!(attempt, %key, "Transaction conflict, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(StoreError::RetriesExhausted {
        attempts: max_attempts,
    }
    .into())
}
