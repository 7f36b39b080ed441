//! File-system seam for corpus discovery and extraction.
//!
//! [`OsFs`] reads the real disk; [`MemoryFs`] is an in-memory corpus used by
//! tests across the workspace.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Kind of a directory entry, as far as discovery cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// A single child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Read-only view of a file system holding a documentation corpus.
pub trait CorpusFs: Send + Sync {
    /// List the children of `dir`, in any order.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>>;

    /// Read a whole file as text. Invalid UTF-8 is replaced, not rejected.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

// ---------------------------------------------------------------------------
// OsFs
// ---------------------------------------------------------------------------

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl CorpusFs for OsFs {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            // Symlinks are not followed here: a linked directory is never
            // descended, and a link only gets opened if its name is a document.
            let file_type = entry.file_type()?;
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = std::fs::read(path)?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(path = %path.display(), "invalid UTF-8, decoding lossily");
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryFs
// ---------------------------------------------------------------------------

/// An in-memory file tree. Parent directories are created implicitly.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    denied: HashSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file and all of its ancestor directories.
    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            self.add_dir_all(parent);
        }
        self.files.insert(path, content.into());
        self
    }

    /// Add an empty directory (and its ancestors).
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.add_dir_all(path.as_ref());
        self
    }

    /// Make a file or directory fail with `PermissionDenied` when read.
    pub fn deny(mut self, path: impl AsRef<Path>) -> Self {
        self.denied.insert(path.as_ref().to_path_buf());
        self
    }

    fn add_dir_all(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn check_access(&self, path: &Path) -> io::Result<()> {
        if self.denied.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        Ok(())
    }
}

impl CorpusFs for MemoryFs {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
        if !self.dirs.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            ));
        }
        self.check_access(dir)?;

        let child_name = |path: &Path| -> Option<String> {
            (path.parent() == Some(dir))
                .then(|| path.file_name())
                .flatten()
                .map(|name| name.to_string_lossy().into_owned())
        };

        let dirs = self.dirs.iter().filter_map(|p| {
            child_name(p).map(|name| DirEntry {
                name,
                kind: EntryKind::Dir,
            })
        });
        let files = self.files.keys().filter_map(|p| {
            child_name(p).map(|name| DirEntry {
                name,
                kind: EntryKind::File,
            })
        });

        Ok(dirs.chain(files).collect())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.check_access(path)?;
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_fs_lists_children() {
        let fs = MemoryFs::new()
            .with_file("docs/intro.md", "hi")
            .with_file("docs/protocol/a.md", "a")
            .with_dir("docs/empty");

        let mut names: Vec<_> = fs
            .read_dir(Path::new("docs"))
            .unwrap()
            .into_iter()
            .map(|e| (e.name, e.kind))
            .collect();
        names.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(
            names,
            vec![
                ("empty".to_string(), EntryKind::Dir),
                ("intro.md".to_string(), EntryKind::File),
                ("protocol".to_string(), EntryKind::Dir),
            ]
        );
        assert_eq!(fs.read_to_string(Path::new("docs/protocol/a.md")).unwrap(), "a");
    }

    #[test]
    fn memory_fs_missing_and_denied() {
        let fs = MemoryFs::new()
            .with_file("docs/secret.md", "x")
            .deny("docs/secret.md");

        let err = fs.read_dir(Path::new("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err = fs.read_to_string(Path::new("docs/secret.md")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn os_fs_reads_disk() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("a.md"), "hello").unwrap();

        let mut entries = OsFs.read_dir(tmp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(entries[0].name, "a.md");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].kind, EntryKind::Dir);

        assert_eq!(OsFs.read_to_string(&tmp.path().join("a.md")).unwrap(), "hello");
    }

    #[test]
    fn os_fs_decodes_invalid_utf8_lossily() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("latin1.md");
        std::fs::write(&path, b"caf\xe9 au lait").unwrap();

        let text = OsFs.read_to_string(&path).unwrap();
        assert_eq!(text, "caf\u{FFFD} au lait");
    }

    #[cfg(unix)]
    #[test]
    fn os_fs_does_not_follow_symlinks_when_listing() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("real.md"), "real").unwrap();
        symlink(tmp.path().join("real.md"), tmp.path().join("linked.md")).unwrap();
        symlink(tmp.path().join("missing.png"), tmp.path().join("dangling.png")).unwrap();
        symlink("..", tmp.path().join("up")).unwrap();

        let mut entries = OsFs.read_dir(tmp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        let kinds: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("dangling.png", EntryKind::File),
                ("linked.md", EntryKind::File),
                ("real.md", EntryKind::File),
                ("up", EntryKind::File),
            ]
        );
        assert_eq!(OsFs.read_to_string(&tmp.path().join("linked.md")).unwrap(), "real");
    }
}
