//! Settings configuration types

use std::path::PathBuf;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Reward ledger settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// How many times a conflicting transaction body is re-run before giving up
    #[serde(default = "default_max_transaction_attempts")]
    pub max_transaction_attempts: u32,

    /// Day of the week on which category progress and life reset.
    /// Accepts "mon", "monday", "Tue", ...
    #[serde(default = "default_reset_weekday")]
    pub reset_weekday: String,

    /// Life points (current and max) given to new users
    #[serde(default = "default_starting_life")]
    pub starting_life: u32,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            max_transaction_attempts: default_max_transaction_attempts(),
            reset_weekday: default_reset_weekday(),
            starting_life: default_starting_life(),
        }
    }
}

impl LedgerSettings {
    /// Parsed reset weekday, Monday if the configured value is not a weekday
    pub fn reset_weekday(&self) -> Weekday {
        self.reset_weekday.parse().unwrap_or_else(|_| {
            tracing::warn!(
                value = %self.reset_weekday,
                "Unknown reset_weekday, falling back to Monday"
            );
            Weekday::Mon
        })
    }
}

fn default_max_transaction_attempts() -> u32 {
    5
}

fn default_reset_weekday() -> String {
    "monday".to_string()
}

fn default_starting_life() -> u32 {
    100
}

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Database file. Defaults to `~/.ascend/ascend.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}
