//! Corpus discovery: enumerate the documents under a root directory.
//!
//! The walk is depth-first, pre-order, with each directory's children visited
//! in byte order of their names, so the sequence is identical for an
//! unchanged file tree. Directories are read lazily as the walk reaches them,
//! and [`Corpus::walk`] can be called any number of times to restart.

mod fs;

use std::path::{Path, PathBuf};

use llmsgen_shared::{DocumentLocation, LlmsGenError, Result};
use tracing::{debug, info, instrument};

pub use fs::{CorpusFs, DirEntry, EntryKind, MemoryFs, OsFs};

/// File extensions recognized as documents.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["md", "mdx"];

// ---------------------------------------------------------------------------
// Corpus
// ---------------------------------------------------------------------------

/// A documentation corpus rooted at a directory of some [`CorpusFs`].
pub struct Corpus<'a> {
    fs: &'a dyn CorpusFs,
    root: PathBuf,
}

impl<'a> Corpus<'a> {
    pub fn new(fs: &'a dyn CorpusFs, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a fresh walk over the corpus.
    pub fn walk(&self) -> DocumentWalk<'a> {
        DocumentWalk {
            fs: self.fs,
            pending_root: Some(self.root.clone()),
            stack: Vec::new(),
            failed: false,
        }
    }
}

/// Enumerate every document under `root`, failing on the first unreadable
/// directory.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn discover(fs: &dyn CorpusFs, root: &Path) -> Result<Vec<DocumentLocation>> {
    let locations = Corpus::new(fs, root)
        .walk()
        .collect::<Result<Vec<_>>>()?;

    info!(documents = locations.len(), "discovery complete");
    Ok(locations)
}

/// Whether `name` carries a recognized document extension.
pub fn is_document(name: &str) -> bool {
    DOCUMENT_EXTENSIONS
        .iter()
        .any(|ext| name.strip_suffix(ext).is_some_and(|rest| rest.ends_with('.')))
}

// ---------------------------------------------------------------------------
// DocumentWalk
// ---------------------------------------------------------------------------

/// Lazy iterator over the documents of a [`Corpus`].
///
/// Yields `Err` once for the first directory that cannot be read, then ends.
pub struct DocumentWalk<'a> {
    fs: &'a dyn CorpusFs,
    pending_root: Option<PathBuf>,
    stack: Vec<Frame>,
    failed: bool,
}

/// A directory being walked: its path, its relative prefix, remaining children.
struct Frame {
    dir: PathBuf,
    prefix: String,
    entries: std::vec::IntoIter<DirEntry>,
}

impl DocumentWalk<'_> {
    fn open(&self, dir: PathBuf, prefix: String) -> Result<Frame> {
        let mut entries = self
            .fs
            .read_dir(&dir)
            .map_err(|e| LlmsGenError::file_system(&dir, e))?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(dir = %dir.display(), entries = entries.len(), "reading directory");

        Ok(Frame {
            dir,
            prefix,
            entries: entries.into_iter(),
        })
    }

    fn descend(&mut self, dir: PathBuf, prefix: String) -> Option<LlmsGenError> {
        match self.open(dir, prefix) {
            Ok(frame) => {
                self.stack.push(frame);
                None
            }
            Err(e) => {
                self.failed = true;
                self.stack.clear();
                Some(e)
            }
        }
    }
}

impl Iterator for DocumentWalk<'_> {
    type Item = Result<DocumentLocation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(root) = self.pending_root.take() {
            if let Some(e) = self.descend(root, String::new()) {
                return Some(Err(e));
            }
        }

        loop {
            let frame = self.stack.last_mut()?;
            let Some(entry) = frame.entries.next() else {
                self.stack.pop();
                continue;
            };

            let path = frame.dir.join(&entry.name);
            let relative = if frame.prefix.is_empty() {
                entry.name
            } else {
                format!("{}/{}", frame.prefix, entry.name)
            };

            match entry.kind {
                EntryKind::Dir => {
                    if let Some(e) = self.descend(path, relative) {
                        return Some(Err(e));
                    }
                }
                EntryKind::File if is_document(&relative) => {
                    return Some(Ok(DocumentLocation {
                        absolute: path,
                        relative,
                    }));
                }
                EntryKind::File => {}
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
