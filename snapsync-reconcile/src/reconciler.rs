//! Tree walk and session bookkeeping.
//!
//! ## `handle` — per-pair protocol
//!
//! 1. Classify the source and the destination independently.
//! 2. Look up the ordered actions for that pair in [`actions_for`].
//! 3. Run them in order. `Recurse` visits every child before the actions
//!    queued after it.
//!
//! The walk keeps its own stack of pending work instead of recursing, so
//! tree depth is bounded by memory rather than by the thread stack.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::PathBuf;

use serde::Serialize;

use snapsync_core::config::{DEFAULT_COMMIT_MESSAGE, DEFAULT_METADATA_NAMES};
use snapsync_core::{NodeKind, PathPair, SyncConfig};

use crate::command::{Command, CommandSink, Counting};
use crate::dispatch::{actions_for, Action};
use crate::error::SyncError;
use crate::fs::{FileSystem, OsFileSystem};

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// State shared by every pair of one [`Reconciler::sync`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    conflict: bool,
    adds: Vec<PathBuf>,
    deletes: Vec<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a file/directory type change was seen. Never cleared.
    pub fn conflict(&self) -> bool {
        self.conflict
    }

    pub fn pending_adds(&self) -> &[PathBuf] {
        &self.adds
    }

    pub fn pending_deletes(&self) -> &[PathBuf] {
        &self.deletes
    }
}

/// Summary of a finished [`Reconciler::sync`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Commands handed to the sink, batches included.
    pub commands: usize,
    pub adds: Vec<PathBuf>,
    pub deletes: Vec<PathBuf>,
    pub conflict: bool,
}

// ---------------------------------------------------------------------------
// Work list
// ---------------------------------------------------------------------------

enum Task {
    /// Classify a pair, then run its actions from the start.
    ///
    /// A side whose parent is not a directory has no children, so it is
    /// known to be missing without asking the filesystem.
    Visit {
        pair: PathPair,
        source_known_missing: bool,
        destination_known_missing: bool,
    },
    /// Continue a classified pair's actions after its children were visited.
    Resume {
        pair: PathPair,
        source: NodeKind,
        destination: NodeKind,
        next: usize,
    },
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Decides the commands that bring destination trees in line with source trees.
pub struct Reconciler<F: FileSystem> {
    fs: F,
    metadata_names: BTreeSet<OsString>,
    commit_message: String,
}

impl Reconciler<OsFileSystem> {
    /// Reconciler over the real filesystem, worded and filtered per `config`.
    pub fn from_config(config: &SyncConfig) -> Self {
        Reconciler::new(OsFileSystem)
            .with_metadata_names(config.metadata_names.iter().cloned())
            .with_commit_message(config.commit_message.clone())
    }
}

impl<F: FileSystem> Reconciler<F> {
    /// Reconciler with the default metadata names and commit message.
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            metadata_names: DEFAULT_METADATA_NAMES.iter().map(OsString::from).collect(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_owned(),
        }
    }

    /// Entry names skipped by [`Reconciler::children`].
    pub fn with_metadata_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.metadata_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Message for the commit that isolates deletions after a conflict.
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Union of the entry names directly under both sides, without
    /// version-control metadata. A side that is not a directory contributes
    /// nothing.
    pub fn children(&self, pair: &PathPair) -> Result<BTreeSet<OsString>, SyncError> {
        let source = self.fs.classify(&pair.source)?;
        let destination = self.fs.classify(&pair.destination)?;
        self.children_of(pair, source, destination)
    }

    fn children_of(
        &self,
        pair: &PathPair,
        source: NodeKind,
        destination: NodeKind,
    ) -> Result<BTreeSet<OsString>, SyncError> {
        let mut names = BTreeSet::new();
        if source == NodeKind::Directory {
            names.extend(self.fs.list_entries(&pair.source)?);
        }
        if destination == NodeKind::Directory {
            names.extend(self.fs.list_entries(&pair.destination)?);
        }
        names.retain(|name| !self.metadata_names.contains(name));
        Ok(names)
    }

    /// Reconcile one pair and everything beneath it.
    ///
    /// Immediate commands go to `sink`; adds, deletes and the conflict flag
    /// accumulate in `session`.
    pub fn handle<S>(
        &self,
        pair: &PathPair,
        session: &mut Session,
        sink: &mut S,
    ) -> Result<(), SyncError>
    where
        S: CommandSink + ?Sized,
    {
        let mut stack = vec![Task::Visit {
            pair: pair.clone(),
            source_known_missing: false,
            destination_known_missing: false,
        }];

        'tasks: while let Some(task) = stack.pop() {
            let (pair, source, destination, start) = match task {
                Task::Visit {
                    pair,
                    source_known_missing,
                    destination_known_missing,
                } => {
                    require_utf8(&pair)?;
                    let source = if source_known_missing {
                        NodeKind::Missing
                    } else {
                        self.fs.classify(&pair.source)?
                    };
                    let destination = if destination_known_missing {
                        NodeKind::Missing
                    } else {
                        self.fs.classify(&pair.destination)?
                    };
                    tracing::debug!("{source}/{destination}: {pair}");
                    (pair, source, destination, 0)
                }
                Task::Resume {
                    pair,
                    source,
                    destination,
                    next,
                } => (pair, source, destination, next),
            };

            let actions = actions_for(source, destination);
            for (index, action) in actions.iter().enumerate().skip(start) {
                match action {
                    Action::Remove => sink.emit(&Command::Remove {
                        path: pair.destination.clone(),
                        recursive: destination == NodeKind::Directory,
                    })?,
                    Action::Copy => sink.emit(&copy(&pair))?,
                    Action::CopyIfDifferent => {
                        if !self.fs.same_contents(&pair.source, &pair.destination)? {
                            sink.emit(&copy(&pair))?;
                        }
                    }
                    Action::Mkdir => sink.emit(&Command::Mkdir {
                        path: pair.destination.clone(),
                    })?,
                    Action::VcsAdd => session.adds.push(pair.destination.clone()),
                    Action::VcsDelete => session.deletes.push(pair.destination.clone()),
                    Action::FlagConflict => {
                        tracing::warn!(
                            "type conflict ({source} replaces {destination}) at {}",
                            pair.destination.display()
                        );
                        session.conflict = true;
                    }
                    Action::Recurse => {
                        let children = self.children_of(&pair, source, destination)?;
                        let source_known_missing = source != NodeKind::Directory;
                        let destination_known_missing = destination != NodeKind::Directory;
                        let children: Vec<PathPair> =
                            children.iter().map(|name| pair.join(name)).collect();

                        stack.push(Task::Resume {
                            pair,
                            source,
                            destination,
                            next: index + 1,
                        });
                        // Reversed so the first child is popped first.
                        for child in children.into_iter().rev() {
                            stack.push(Task::Visit {
                                pair: child,
                                source_known_missing,
                                destination_known_missing,
                            });
                        }
                        continue 'tasks;
                    }
                }
            }
        }
        Ok(())
    }

    /// Reconcile every pair in order, then emit the batched VCS commands.
    ///
    /// Batches: `svn delete` over all pending deletes; if a type conflict was
    /// seen, a commit of exactly those deletes; then `svn add` over all
    /// pending adds. An error stops the run where it happened.
    pub fn sync<S>(&self, pairs: &[PathPair], sink: &mut S) -> Result<SyncReport, SyncError>
    where
        S: CommandSink + ?Sized,
    {
        let mut session = Session::new();
        let mut sink = Counting::new(sink);

        for pair in pairs {
            tracing::info!("reconciling {pair}");
            self.handle(pair, &mut session, &mut sink)?;
        }

        if !session.deletes.is_empty() {
            sink.emit(&Command::VcsDelete {
                paths: session.deletes.clone(),
            })?;
            if session.conflict {
                sink.emit(&Command::VcsCommit {
                    message: self.commit_message.clone(),
                    paths: session.deletes.clone(),
                })?;
            }
        }
        if !session.adds.is_empty() {
            sink.emit(&Command::VcsAdd {
                paths: session.adds.clone(),
            })?;
        }

        tracing::info!(
            "{} commands ({} adds, {} deletes, conflict: {})",
            sink.count,
            session.adds.len(),
            session.deletes.len(),
            session.conflict
        );
        Ok(SyncReport {
            commands: sink.count,
            adds: session.adds,
            deletes: session.deletes,
            conflict: session.conflict,
        })
    }

    /// [`Reconciler::sync`] into a collected command list.
    pub fn plan(&self, pairs: &[PathPair]) -> Result<(Vec<Command>, SyncReport), SyncError> {
        let mut commands = Vec::new();
        let report = self.sync(pairs, &mut commands)?;
        Ok((commands, report))
    }
}

/// Emitted command lines are text; a name that does not round-trip would
/// name a path that does not exist.
fn require_utf8(pair: &PathPair) -> Result<(), SyncError> {
    for path in [&pair.source, &pair.destination] {
        if path.to_str().is_none() {
            return Err(SyncError::NonUtf8Path { path: path.clone() });
        }
    }
    Ok(())
}

fn copy(pair: &PathPair) -> Command {
    Command::Copy {
        from: pair.source.clone(),
        to: pair.destination.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
