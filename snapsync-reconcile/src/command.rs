//! Emitted commands and the sinks that receive them.
//!
//! | Command      | Shell line                                  |
//! |--------------|---------------------------------------------|
//! | `Remove`     | `rm <dst>` (`rm -r <dst>` for directories)  |
//! | `Copy`       | `cp -f <src> <dst>`                         |
//! | `Mkdir`      | `mkdir <dst>`                               |
//! | `VcsDelete`  | `svn delete <paths>...`                     |
//! | `VcsCommit`  | `svn commit -m <message> <paths>...`        |
//! | `VcsAdd`     | `svn add --depth=empty <paths>...`          |

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::SyncError;
use crate::shell;

const VCS_PROGRAM: &str = "svn";

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// One command line the caller has to run to update the snapshot tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Remove { path: PathBuf, recursive: bool },
    Copy { from: PathBuf, to: PathBuf },
    Mkdir { path: PathBuf },
    VcsDelete { paths: Vec<PathBuf> },
    VcsCommit { message: String, paths: Vec<PathBuf> },
    VcsAdd { paths: Vec<PathBuf> },
}

impl Command {
    /// Unquoted argument vector, program first.
    pub fn argv(&self) -> Vec<String> {
        match self {
            Command::Remove { path, recursive } => {
                let mut argv = vec!["rm".to_owned()];
                if *recursive {
                    argv.push("-r".to_owned());
                }
                argv.push(lossy(path));
                argv
            }
            Command::Copy { from, to } => {
                vec!["cp".to_owned(), "-f".to_owned(), lossy(from), lossy(to)]
            }
            Command::Mkdir { path } => vec!["mkdir".to_owned(), lossy(path)],
            Command::VcsDelete { paths } => vcs(&["delete"], paths),
            Command::VcsCommit { message, paths } => {
                vcs(&["commit", "-m", message.as_str()], paths)
            }
            Command::VcsAdd { paths } => vcs(&["add", "--depth=empty"], paths),
        }
    }

    /// Whether this is a version-control invocation rather than a plain
    /// file operation.
    pub fn is_vcs(&self) -> bool {
        matches!(
            self,
            Command::VcsDelete { .. } | Command::VcsCommit { .. } | Command::VcsAdd { .. }
        )
    }
}

impl fmt::Display for Command {
    /// The shell-quoted command line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell::join(self.argv()))
    }
}

fn lossy(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn vcs(verb_and_flags: &[&str], paths: &[PathBuf]) -> Vec<String> {
    let mut argv = Vec::with_capacity(1 + verb_and_flags.len() + paths.len());
    argv.push(VCS_PROGRAM.to_owned());
    argv.extend(verb_and_flags.iter().map(|s| s.to_string()));
    argv.extend(paths.iter().map(|p| lossy(p)));
    argv
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Receives commands in the order the reconciler decides on them.
pub trait CommandSink {
    fn emit(&mut self, command: &Command) -> Result<(), SyncError>;
}

impl CommandSink for Vec<Command> {
    fn emit(&mut self, command: &Command) -> Result<(), SyncError> {
        self.push(command.clone());
        Ok(())
    }
}

/// Writes one shell-quoted line per command, flushing after each so a
/// failure later in the walk leaves every earlier line visible.
pub struct ScriptWriter<W: Write> {
    out: W,
}

impl<W: Write> ScriptWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CommandSink for ScriptWriter<W> {
    fn emit(&mut self, command: &Command) -> Result<(), SyncError> {
        writeln!(self.out, "{command}").map_err(SyncError::Emit)?;
        self.out.flush().map_err(SyncError::Emit)
    }
}

/// Counts what passes through to the wrapped sink.
pub(crate) struct Counting<'a, S: CommandSink + ?Sized> {
    inner: &'a mut S,
    pub(crate) count: usize,
}

impl<'a, S: CommandSink + ?Sized> Counting<'a, S> {
    pub(crate) fn new(inner: &'a mut S) -> Self {
        Self { inner, count: 0 }
    }
}

impl<S: CommandSink + ?Sized> CommandSink for Counting<'_, S> {
    fn emit(&mut self, command: &Command) -> Result<(), SyncError> {
        self.inner.emit(command)?;
        self.count += 1;
        Ok(())
    }
}
