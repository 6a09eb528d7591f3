//! The policy table: what to do for each (source, destination) classification.
//!
//! | src       | dst       | actions                                                  |
//! |-----------|-----------|----------------------------------------------------------|
//! | missing   | missing   | —                                                        |
//! | missing   | file      | remove, vcs-delete                                       |
//! | missing   | directory | recurse, remove, vcs-delete                              |
//! | file      | missing   | copy, vcs-add                                            |
//! | file      | file      | copy-if-different                                        |
//! | file      | directory | recurse, remove, vcs-delete, copy, vcs-add, flag-conflict |
//! | directory | missing   | mkdir, vcs-add, recurse                                  |
//! | directory | file      | remove, vcs-delete, mkdir, vcs-add, recurse, flag-conflict |
//! | directory | directory | recurse                                                  |
//!
//! A type change at one position (file ↔ directory) is flagged so the
//! version-control deletes can be committed before the adds.

use serde::Serialize;

use snapsync_core::NodeKind;

/// A single step taken against a path pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Emit `rm` for the destination.
    Remove,
    /// Emit `cp -f` from source onto destination.
    Copy,
    /// [`Action::Copy`], but only when the file contents differ.
    CopyIfDifferent,
    /// Emit `mkdir` for the destination.
    Mkdir,
    /// Visit every child of either side.
    Recurse,
    /// Queue the destination for the batched `svn add`.
    VcsAdd,
    /// Queue the destination for the batched `svn delete`.
    VcsDelete,
    /// Mark the session as needing a separate delete commit.
    FlagConflict,
}

/// Ordered actions for a classification pair. Total over all nine pairs.
pub fn actions_for(source: NodeKind, destination: NodeKind) -> &'static [Action] {
    use Action::*;
    use NodeKind::{Directory as D, File as F, Missing as M};

    match (source, destination) {
        (M, M) => &[],
        (M, F) => &[Remove, VcsDelete],
        (M, D) => &[Recurse, Remove, VcsDelete],
        (F, M) => &[Copy, VcsAdd],
        (F, F) => &[CopyIfDifferent],
        (F, D) => &[Recurse, Remove, VcsDelete, Copy, VcsAdd, FlagConflict],
        (D, M) => &[Mkdir, VcsAdd, Recurse],
        (D, F) => &[Remove, VcsDelete, Mkdir, VcsAdd, Recurse, FlagConflict],
        (D, D) => &[Recurse],
    }
}
