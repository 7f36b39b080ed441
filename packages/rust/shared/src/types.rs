//! Core domain types for the documentation corpus.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{LlmsGenError, Result};

/// Position assigned to documents without explicit position metadata.
/// Sorts after any realistic `sidebar_position`.
pub const SENTINEL_POSITION: i64 = 999;

/// Section key of documents that sit directly in the corpus root.
pub const ROOT_SECTION: &str = "";

// ---------------------------------------------------------------------------
// DocumentLocation
// ---------------------------------------------------------------------------

/// A discovered document file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    /// Path as handed to the file system (root joined with the relative path).
    pub absolute: PathBuf,
    /// Path below the corpus root, always `/`-separated.
    pub relative: String,
}

impl DocumentLocation {
    /// Section key: the first path segment, or the root key for top-level files.
    pub fn section_key(&self) -> &str {
        match self.relative.split_once('/') {
            Some((first, _)) => first,
            None => ROOT_SECTION,
        }
    }

    /// File name with its extension removed (`protocol/intro.mdx` -> `intro`).
    pub fn file_stem(&self) -> &str {
        let name = self.relative.rsplit('/').next().unwrap_or(&self.relative);
        match name.rfind('.') {
            Some(0) | None => name,
            Some(dot) => &name[..dot],
        }
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A normalized corpus document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Relative, slash-normalized path below the corpus root.
    pub path: String,
    /// Section key (first path segment, or `""` for root documents).
    pub section: String,
    /// Title from metadata, else the filename stem.
    pub title: String,
    /// Explicit position, else [`SENTINEL_POSITION`].
    pub order: i64,
    /// Content with the metadata block removed, trimmed.
    pub body: String,
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// A group of documents sharing a section key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: String,
    pub display_title: String,
    pub documents: Vec<Document>,
}

impl Section {
    /// Create an empty section.
    pub fn new(key: impl Into<String>, display_title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_title: display_title.into(),
            documents: Vec::new(),
        }
    }

    /// Whether this is the root section (rendered one heading level higher).
    pub fn is_root(&self) -> bool {
        self.key == ROOT_SECTION
    }
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// One canonical section: its key and display title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    /// First path segment below the corpus root (`""` for the root).
    pub key: String,
    /// Heading text used in the artifact.
    pub title: String,
}

impl TaxonomyEntry {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
        }
    }
}

/// Immutable, ordered list of known sections.
///
/// Order is render order. Only sections listed here are ever rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
}

impl Taxonomy {
    /// Build a taxonomy, rejecting duplicate keys and a misplaced root key.
    pub fn new(entries: Vec<TaxonomyEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (i, entry) in entries.iter().enumerate() {
            if !seen.insert(entry.key.as_str()) {
                return Err(LlmsGenError::validation(format!(
                    "duplicate taxonomy key {:?}",
                    entry.key
                )));
            }
            if entry.key == ROOT_SECTION && i != 0 {
                return Err(LlmsGenError::validation(
                    "the root section key \"\" must come first in the taxonomy",
                ));
            }
            if entry.key.contains('/') {
                return Err(LlmsGenError::validation(format!(
                    "taxonomy key {:?} must be a single path segment",
                    entry.key
                )));
            }
        }
        Ok(Self { entries })
    }

    /// The Mehr Network documentation sections, in llms.txt order.
    pub fn mehr_network() -> Self {
        Self {
            entries: vec![
                TaxonomyEntry::new("", "Overview"),
                TaxonomyEntry::new("protocol", "Protocol Stack"),
                TaxonomyEntry::new("services", "Core Services"),
                TaxonomyEntry::new("economics", "Economics"),
                TaxonomyEntry::new("hardware", "Hardware"),
                TaxonomyEntry::new("interoperability", "Interoperability"),
                TaxonomyEntry::new("marketplace", "Marketplace"),
                TaxonomyEntry::new("applications", "Applications"),
                TaxonomyEntry::new("development", "Development"),
            ],
        }
    }

    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Display title for `key`, or the key itself when it is not listed.
    pub fn display_title<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.title.as_str())
            .unwrap_or(key)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::mehr_network()
    }
}
