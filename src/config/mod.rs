//! Configuration loading and management

mod io;
mod settings;

pub use settings::{LedgerSettings, StorageSettings};

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure (`~/.ascend/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// User id to act as when `--user` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<String>,

    /// Reward ledger settings
    #[serde(default)]
    pub ledger: LedgerSettings,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Resolve the user to act as: explicit flag first, then `default_user`
    pub fn resolve_user(&self, explicit: Option<String>) -> Result<String> {
        explicit
            .or_else(|| self.default_user.clone())
            .context("No user given. Pass --user or set default_user in config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(
            r#"
            default_user = "ada"

            [ledger]
            reset_weekday = "sun"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_user.as_deref(), Some("ada"));
        assert_eq!(config.ledger.reset_weekday(), chrono::Weekday::Sun);
        assert_eq!(config.ledger.max_transaction_attempts, 5);
        assert_eq!(config.ledger.starting_life, 100);
        assert!(config.storage.database_path.is_none());
    }

    #[test]
    fn test_resolve_user_prefers_flag() {
        let config = Config {
            default_user: Some("ada".into()),
            ..Config::default()
        };
        assert_eq!(config.resolve_user(Some("bob".into())).unwrap(), "bob");
        assert_eq!(config.resolve_user(None).unwrap(), "ada");
        assert!(Config::default().resolve_user(None).is_err());
    }
}
