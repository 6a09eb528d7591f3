//! Error types for snapsync-reconcile.

use std::path::PathBuf;

use thiserror::Error;

use snapsync_core::ConfigError;

/// All errors that can abort a reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A symlink whose target does not exist.
    #[error("dangling symlink at {path}")]
    BrokenLink { path: PathBuf },

    /// A path that cannot be written into a command line unchanged.
    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },

    /// The command sink could not accept a command.
    #[error("failed to emit command: {0}")]
    Emit(#[source] std::io::Error),

    /// An error loading the sync configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
