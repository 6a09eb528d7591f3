//! Read-only filesystem queries used by the reconciler.
//!
//! The reconciler never writes. Everything it needs to know about either
//! tree goes through [`FileSystem`], so a walk can run against the real disk
//! ([`OsFileSystem`]) or anything else that can answer the same questions.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use snapsync_core::NodeKind;

use crate::error::{io_err, SyncError};

const COMPARE_BUF_SIZE: usize = 64 * 1024;

/// Queries the reconciler makes against either tree.
pub trait FileSystem {
    /// `Missing` if nothing is at `path`, `Directory` for directories,
    /// `File` for anything else that exists.
    fn classify(&self, path: &Path) -> Result<NodeKind, SyncError>;

    /// Names of the entries directly under the directory at `path`.
    fn list_entries(&self, path: &Path) -> Result<BTreeSet<OsString>, SyncError>;

    /// Byte-exact content equality of two files.
    fn same_contents(&self, a: &Path, b: &Path) -> Result<bool, SyncError>;

    /// Whether anything is at `path`.
    fn exists(&self, path: &Path) -> Result<bool, SyncError> {
        Ok(self.classify(path)? != NodeKind::Missing)
    }

    /// Whether `path` is a directory.
    fn is_directory(&self, path: &Path) -> Result<bool, SyncError> {
        Ok(self.classify(path)? == NodeKind::Directory)
    }
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn classify(&self, path: &Path) -> Result<NodeKind, SyncError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(NodeKind::Directory),
            Ok(_) => Ok(NodeKind::File),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                // metadata() follows links; a link to nowhere is not absence.
                match std::fs::symlink_metadata(path) {
                    Ok(meta) if meta.file_type().is_symlink() => Err(SyncError::BrokenLink {
                        path: path.to_path_buf(),
                    }),
                    _ => Ok(NodeKind::Missing),
                }
            }
            // A path below a regular file cannot exist.
            Err(err) if err.kind() == ErrorKind::NotADirectory => Ok(NodeKind::Missing),
            Err(err) => Err(io_err(path, err)),
        }
    }

    fn list_entries(&self, path: &Path) -> Result<BTreeSet<OsString>, SyncError> {
        let mut names = BTreeSet::new();
        for entry in std::fs::read_dir(path).map_err(|e| io_err(path, e))? {
            let entry = entry.map_err(|e| io_err(path, e))?;
            names.insert(entry.file_name());
        }
        Ok(names)
    }

    fn same_contents(&self, a: &Path, b: &Path) -> Result<bool, SyncError> {
        let len_a = std::fs::metadata(a).map_err(|e| io_err(a, e))?.len();
        let len_b = std::fs::metadata(b).map_err(|e| io_err(b, e))?.len();
        if len_a != len_b {
            return Ok(false);
        }

        let mut reader_a = open_buffered(a)?;
        let mut reader_b = open_buffered(b)?;
        loop {
            let chunk_a = reader_a.fill_buf().map_err(|e| io_err(a, e))?;
            let chunk_b = reader_b.fill_buf().map_err(|e| io_err(b, e))?;
            if chunk_a.is_empty() || chunk_b.is_empty() {
                return Ok(chunk_a.is_empty() && chunk_b.is_empty());
            }
            let n = chunk_a.len().min(chunk_b.len());
            if chunk_a[..n] != chunk_b[..n] {
                return Ok(false);
            }
            reader_a.consume(n);
            reader_b.consume(n);
        }
    }
}

fn open_buffered(path: &Path) -> Result<BufReader<File>, SyncError> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    Ok(BufReader::with_capacity(COMPARE_BUF_SIZE, file))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn classify_reports_all_three_kinds() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f");
        fs::write(&file, "x").unwrap();

        let fs_ = OsFileSystem;
        assert_eq!(fs_.classify(tmp.path()).unwrap(), NodeKind::Directory);
        assert_eq!(fs_.classify(&file).unwrap(), NodeKind::File);
        assert_eq!(
            fs_.classify(&tmp.path().join("absent")).unwrap(),
            NodeKind::Missing
        );
        assert!(fs_.exists(&file).unwrap());
        assert!(!fs_.is_directory(&file).unwrap());
    }

    #[test]
    fn path_below_a_file_is_missing() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f");
        fs::write(&file, "x").unwrap();
        assert_eq!(
            OsFileSystem.classify(&file.join("child")).unwrap(),
            NodeKind::Missing
        );
    }

    #[test]
    #[cfg(unix)]
    fn dangling_symlink_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), &link).unwrap();

        let err = OsFileSystem.classify(&link).expect_err("dangling link");
        assert!(matches!(err, SyncError::BrokenLink { .. }), "got: {err}");
    }

    #[test]
    fn list_entries_returns_direct_children_only() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("sub/deeper")).unwrap();
        fs::write(tmp.path().join("a"), "").unwrap();

        let names = OsFileSystem.list_entries(tmp.path()).unwrap();
        let names: Vec<_> = names.iter().map(|n| n.to_string_lossy().into_owned()).collect();
        assert_eq!(names, vec!["a", "sub"]);
    }

    #[test]
    fn same_contents_compares_bytes_not_metadata() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        let c = tmp.path().join("c");
        let d = tmp.path().join("d");
        fs::write(&a, "same bytes").unwrap();
        fs::write(&b, "same bytes").unwrap();
        fs::write(&c, "diff bytes").unwrap();
        fs::write(&d, "longer content").unwrap();

        assert!(OsFileSystem.same_contents(&a, &b).unwrap());
        assert!(!OsFileSystem.same_contents(&a, &c).unwrap());
        assert!(!OsFileSystem.same_contents(&a, &d).unwrap());
    }

    #[test]
    fn same_contents_spans_multiple_buffers() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        let mut data = vec![7u8; COMPARE_BUF_SIZE * 3 + 11];
        fs::write(&a, &data).unwrap();
        *data.last_mut().unwrap() = 8;
        fs::write(&b, &data).unwrap();

        assert!(!OsFileSystem.same_contents(&a, &b).unwrap());
        assert!(OsFileSystem.same_contents(&a, &a).unwrap());
    }

    #[test]
    fn unreadable_file_fails_comparison() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        fs::write(&a, "x").unwrap();

        let err = OsFileSystem
            .same_contents(&a, &tmp.path().join("gone"))
            .expect_err("missing file must not compare");
        assert!(matches!(err, SyncError::Io { .. }), "got: {err}");
    }
}
