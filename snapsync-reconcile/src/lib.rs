//! # snapsync-reconcile
//!
//! Tree reconciler: compares a build output tree with a published snapshot
//! tree and describes, as shell and `svn` command lines, what has to happen
//! for the snapshot to match. Nothing is executed here.
//!
//! Call [`pipeline::run`] to reconcile every pair of a [`SyncConfig`]
//! against the real filesystem, or build a [`Reconciler`] over any
//! [`FileSystem`] and drive [`Reconciler::sync`] yourself.
//!
//! [`SyncConfig`]: snapsync_core::SyncConfig

pub mod command;
pub mod dispatch;
pub mod error;
pub mod fs;
pub mod pipeline;
pub mod reconciler;
pub mod shell;

pub use command::{Command, CommandSink, ScriptWriter};
pub use dispatch::{actions_for, Action};
pub use error::SyncError;
pub use fs::{FileSystem, OsFileSystem};
pub use reconciler::{Reconciler, Session, SyncReport};
