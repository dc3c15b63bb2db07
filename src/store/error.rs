//! Document store errors

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A document read by the transaction changed before commit
    #[error("Document changed concurrently: {0}")]
    Conflict(String),

    #[error("Transaction still conflicting after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Document encoding error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Failed to prepare database: {0}")]
    Io(#[from] std::io::Error),
}
