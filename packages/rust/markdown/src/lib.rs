//! Document extraction: front matter, metadata, and normalized [`Document`]s.
//!
//! Front matter is the optional YAML block fenced by `---` lines at the very
//! start of a document. Only `title` and the position keys are recognized;
//! anything malformed degrades to "no metadata" with a warning.

mod frontmatter;

use tracing::{debug, warn};

use llmsgen_shared::{Document, DocumentLocation, LlmsGenError, SENTINEL_POSITION};

pub use frontmatter::{FrontMatter, Metadata, parse_metadata, split_front_matter};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Metadata and body separated from a document's raw text.
#[derive(Debug)]
pub struct Extraction<'a> {
    /// Recognized metadata; empty when absent or malformed.
    pub metadata: Metadata,
    /// Untrimmed text after the metadata block.
    pub body: &'a str,
    /// The recoverable problem, if the metadata block was unusable.
    pub issue: Option<LlmsGenError>,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Separate metadata from body. Never fails: metadata problems are reported
/// in [`Extraction::issue`].
pub fn extract<'a>(path: &str, raw: &'a str) -> Extraction<'a> {
    match split_front_matter(raw) {
        FrontMatter::Absent { body } => Extraction {
            metadata: Metadata::default(),
            body,
            issue: None,
        },
        FrontMatter::Unclosed { body } => Extraction {
            metadata: Metadata::default(),
            body,
            issue: Some(LlmsGenError::metadata_parse(
                path,
                "metadata block opened with --- but never closed",
            )),
        },
        FrontMatter::Present { yaml, body } => match parse_metadata(yaml) {
            Ok(metadata) => Extraction {
                metadata,
                body,
                issue: None,
            },
            Err(message) => Extraction {
                metadata: Metadata::default(),
                body,
                issue: Some(LlmsGenError::metadata_parse(path, message)),
            },
        },
    }
}

/// Build the normalized [`Document`] for a discovered file's content.
pub fn build_document(location: &DocumentLocation, raw: &str) -> Document {
    let Extraction {
        metadata,
        body,
        issue,
    } = extract(&location.relative, raw);

    if let Some(e) = issue {
        warn!(path = %location.relative, error = %e, "ignoring unusable metadata");
    }

    let title = metadata
        .title
        .unwrap_or_else(|| location.file_stem().to_string());
    let order = metadata.position.unwrap_or(SENTINEL_POSITION);

    debug!(path = %location.relative, %title, order, "document extracted");

    Document {
        path: location.relative.clone(),
        section: location.section_key().to_string(),
        title,
        order,
        body: body.trim().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn location(relative: &str) -> DocumentLocation {
        DocumentLocation {
            absolute: PathBuf::from("docs").join(relative),
            relative: relative.into(),
        }
    }

    #[test]
    fn document_with_metadata() {
        let raw = "---\ntitle: MHR Token\nsidebar_position: 1\n---\n\n# MHR\n\nSupply is fixed.\n\n";
        let doc = build_document(&location("economics/mhr-token.md"), raw);

        assert_eq!(doc.path, "economics/mhr-token.md");
        assert_eq!(doc.section, "economics");
        assert_eq!(doc.title, "MHR Token");
        assert_eq!(doc.order, 1);
        assert_eq!(doc.body, "# MHR\n\nSupply is fixed.");
    }

    #[test]
    fn document_without_metadata_uses_filename() {
        let doc = build_document(&location("introduction.md"), "\n  Welcome to Mehr.  \n");

        assert_eq!(doc.section, "");
        assert_eq!(doc.title, "introduction");
        assert_eq!(doc.order, SENTINEL_POSITION);
        assert_eq!(doc.body, "Welcome to Mehr.");
    }

    #[test]
    fn malformed_metadata_degrades() {
        let raw = "---\ntitle: [broken\n---\nStill here.";
        let extraction = extract("faq.md", raw);
        assert!(extraction.issue.as_ref().is_some_and(LlmsGenError::is_recoverable));
        assert_eq!(extraction.metadata, Metadata::default());

        let doc = build_document(&location("faq.md"), raw);
        assert_eq!(doc.title, "faq");
        assert_eq!(doc.order, SENTINEL_POSITION);
        assert_eq!(doc.body, "Still here.");
    }

    #[test]
    fn unclosed_metadata_keeps_text_as_body() {
        let raw = "---\ntitle: Draft\nSome text";
        let doc = build_document(&location("services/draft.mdx"), raw);
        assert_eq!(doc.title, "draft");
        assert_eq!(doc.body, raw);
    }

    #[test]
    fn title_only_metadata_keeps_sentinel_order() {
        let doc = build_document(&location("protocol/routing.md"), "---\ntitle: Routing\n---\nx");
        assert_eq!(doc.title, "Routing");
        assert_eq!(doc.order, SENTINEL_POSITION);
    }
}
