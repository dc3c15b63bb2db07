//! Configuration file I/O operations

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::Config;

impl Config {
    /// Get the global config directory path (~/.ascend/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ascend")
    }

    /// Get the global config file path (~/.ascend/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from `path`, or the global config when `None`.
    ///
    /// A missing file is not an error: defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::global_config_path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    /// Database file to open: configured path or `~/.ascend/ascend.db`
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("ascend.db"))
    }

    /// Write the config next to its final path and rename it into place,
    /// holding `config.toml.lock` so concurrent `init` runs serialize.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        let _lock = hold_lock(path)?;
        let staged = path.with_extension("toml.tmp");
        let mut file = File::create(&staged)
            .with_context(|| format!("Failed to create {}", staged.display()))?;
        file.write_all(content.as_bytes())
            .and_then(|()| file.sync_all())
            .with_context(|| format!("Failed to write {}", staged.display()))?;

        std::fs::rename(&staged, path)
            .with_context(|| format!("Failed to move config into place: {}", path.display()))
    }
}

/// Exclusive lock on the sidecar lock file; released when the handle drops
fn hold_lock(path: &Path) -> Result<File> {
    let lock_path = path.with_extension("toml.lock");
    let lock = File::create(&lock_path)
        .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;
    lock.lock_exclusive().context("Failed to lock config")?;
    Ok(lock)
}
