//! Init command implementation

use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing::info;

use ascend::config::{Config, StorageSettings};

/// Write a starter config file
pub fn init_command(
    config_path: Option<PathBuf>,
    default_user: Option<String>,
    database: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let path = config_path.unwrap_or_else(Config::global_config_path);

    if path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    let config = Config {
        default_user,
        storage: StorageSettings {
            database_path: database,
        },
        ..Config::default()
    };
    config.save_to_file(&path)?;

    info!(path = %path.display(), "Wrote config");
    println!("Created {}", path.display());
    println!("Database: {}", config.database_path().display());
    match &config.default_user {
        Some(user) => println!("Acting as '{}' by default.", user),
        None => println!("Next: ascend signup <id>, then pass --user <id> or set default_user."),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        init_command(Some(path.clone()), Some("ada".into()), None, false).unwrap();
        assert!(init_command(Some(path.clone()), None, None, false).is_err());
        init_command(Some(path.clone()), Some("bob".into()), None, true).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.default_user.as_deref(), Some("bob"));
    }
}
