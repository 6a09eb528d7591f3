//! Domain types shared by the reconciler and the CLI.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Node classification
// ---------------------------------------------------------------------------

/// What exists at one side of a [`PathPair`].
///
/// Computed independently for the source and the destination path. Anything
/// that exists and is not a directory counts as a [`NodeKind::File`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Missing,
    File,
    Directory,
}

impl NodeKind {
    /// All three classifications, in declaration order.
    pub fn all() -> &'static [NodeKind] {
        &[NodeKind::Missing, NodeKind::File, NodeKind::Directory]
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Missing => write!(f, "missing"),
            NodeKind::File => write!(f, "file"),
            NodeKind::Directory => write!(f, "directory"),
        }
    }
}

// ---------------------------------------------------------------------------
// Path pair
// ---------------------------------------------------------------------------

/// Corresponding locations in the build tree (`source`) and the snapshot
/// tree (`destination`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathPair {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl PathPair {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// The pair for entry `name` directly under both sides.
    pub fn join(&self, name: impl AsRef<OsStr>) -> Self {
        let name = name.as_ref();
        Self {
            source: self.source.join(name),
            destination: self.destination.join(name),
        }
    }

    /// Anchor relative paths at `base`. Absolute paths are left alone.
    pub fn resolve(&self, base: &Path) -> Self {
        Self {
            source: base.join(&self.source),
            destination: base.join(&self.destination),
        }
    }
}

impl fmt::Display for PathPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.source.display(),
            self.destination.display()
        )
    }
}
