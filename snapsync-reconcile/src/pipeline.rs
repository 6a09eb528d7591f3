//! Shared reconcile entrypoint used by the CLI.

use std::path::Path;

use snapsync_core::{config, SyncConfig};

use crate::{Command, CommandSink, Reconciler, SyncError, SyncReport};

/// Reconcile every pair in `config` against the real filesystem, streaming
/// commands into `sink`.
pub fn run<S>(config: &SyncConfig, sink: &mut S) -> Result<SyncReport, SyncError>
where
    S: CommandSink + ?Sized,
{
    Reconciler::from_config(config).sync(&config.pairs, sink)
}

/// [`run`] into a collected command list.
pub fn plan(config: &SyncConfig) -> Result<(Vec<Command>, SyncReport), SyncError> {
    Reconciler::from_config(config).plan(&config.pairs)
}

/// Load `<dir>/snapsync.yaml` (or the built-in layout) and [`run`] it.
pub fn run_in<S>(dir: &Path, sink: &mut S) -> Result<SyncReport, SyncError>
where
    S: CommandSink + ?Sized,
{
    let config = config::load_or_default_at(dir)?;
    run(&config, sink)
}
