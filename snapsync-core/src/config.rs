//! YAML sync configuration.
//!
//! # File format
//!
//! ```yaml
//! pairs:
//!   - source: code/out/doc
//!     destination: ../snapshot/doc
//!   - source: code/out/prebake.zip
//!     destination: ../snapshot/prebake.zip
//! commit_message: remove obsolete files from the snapshot tree  # optional
//! metadata_names: [".svn"]                                      # optional
//! ```
//!
//! Relative pair paths are anchored at the directory holding the config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::PathPair;

/// File name looked up in the working directory when no config is given.
pub const DEFAULT_CONFIG_FILE: &str = "snapsync.yaml";

/// Message for the commit that isolates deletions when a type conflict was seen.
pub const DEFAULT_COMMIT_MESSAGE: &str = "remove obsolete files from the snapshot tree";

/// Entry names never descended into or reported.
pub const DEFAULT_METADATA_NAMES: &[&str] = &[".svn"];

/// Which trees to reconcile and how to word the generated VCS commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub pairs: Vec<PathPair>,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default = "default_metadata_names")]
    pub metadata_names: Vec<String>,
}

fn default_commit_message() -> String {
    DEFAULT_COMMIT_MESSAGE.to_owned()
}

fn default_metadata_names() -> Vec<String> {
    DEFAULT_METADATA_NAMES.iter().map(|s| s.to_string()).collect()
}

impl Default for SyncConfig {
    /// The release layout: built docs, reports and the distribution zip
    /// published into a sibling `snapshot` checkout.
    fn default() -> Self {
        Self {
            pairs: vec![
                PathPair::new("code/out/doc", "../snapshot/doc"),
                PathPair::new("code/out/reports", "../snapshot/reports"),
                PathPair::new("code/out/prebake.zip", "../snapshot/prebake.zip"),
            ],
            commit_message: default_commit_message(),
            metadata_names: default_metadata_names(),
        }
    }
}

impl SyncConfig {
    /// Config with the given pairs and default wording.
    pub fn with_pairs(pairs: Vec<PathPair>) -> Self {
        Self {
            pairs,
            ..Self::default()
        }
    }
}

/// Load a config file.
///
/// Returns `ConfigError::NotFound` if absent, `ConfigError::Parse` (with path
/// + line context) if malformed, `ConfigError::NoPairs` if `pairs` is empty.
pub fn load_at(path: &Path) -> Result<SyncConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: SyncConfig =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if config.pairs.is_empty() {
        return Err(ConfigError::NoPairs {
            path: path.to_path_buf(),
        });
    }

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    config.pairs = config.pairs.iter().map(|p| p.resolve(base)).collect();
    Ok(config)
}

/// `<dir>/snapsync.yaml` — pure, no I/O.
pub fn default_path_at(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_CONFIG_FILE)
}

/// Load `<dir>/snapsync.yaml` if present, otherwise fall back to
/// [`SyncConfig::default`].
pub fn load_or_default_at(dir: &Path) -> Result<SyncConfig, ConfigError> {
    let path = default_path_at(dir);
    if path.exists() {
        load_at(&path)
    } else {
        Ok(SyncConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_layout_has_three_pairs() {
        let config = SyncConfig::default();
        assert_eq!(config.pairs.len(), 3);
        assert_eq!(config.pairs[2].source, PathBuf::from("code/out/prebake.zip"));
        assert_eq!(config.metadata_names, vec![".svn".to_string()]);
    }

    #[test]
    fn optional_fields_fall_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapsync.yaml");
        fs::write(&path, "pairs:\n  - source: a\n    destination: b\n").unwrap();

        let config = load_at(&path).unwrap();
        assert_eq!(config.commit_message, DEFAULT_COMMIT_MESSAGE);
        assert_eq!(config.metadata_names, vec![".svn".to_string()]);
        assert_eq!(config.pairs[0].source, tmp.path().join("a"));
        assert_eq!(config.pairs[0].destination, tmp.path().join("b"));
    }

    #[test]
    fn load_or_default_without_file_uses_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_or_default_at(tmp.path()).unwrap();
        assert_eq!(config, SyncConfig::default());
    }
}
