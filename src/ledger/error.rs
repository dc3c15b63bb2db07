//! Ledger error taxonomy

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// Optimistic retries ran out; nothing was written
    #[error("Gave up after {attempts} conflicting attempts")]
    TransactionConflict { attempts: u32 },

    /// Storage or transport failure; nothing was written
    #[error("Backend failure: {0}")]
    Backend(StoreError),

    #[error("Not enough coins: need {needed}, have {available}")]
    InsufficientCoins { needed: u64, available: u64 },

    #[error("Moment {0} is not on offer this week")]
    NotOffered(String),

    #[error("Moment {0} was already bought this week")]
    AlreadyPurchased(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Ledger task did not finish: {0}")]
    Interrupted(String),
}

impl LedgerError {
    pub(crate) fn user_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "user",
            id: id.to_string(),
        }
    }

    pub(crate) fn habit_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "habit",
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RetriesExhausted { attempts } => Self::TransactionConflict { attempts },
            other => Self::Backend(other),
        }
    }
}

impl From<tokio::task::JoinError> for LedgerError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Interrupted(err.to_string())
    }
}
