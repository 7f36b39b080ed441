//! Artifact generation: the flattened `llms-full.txt` corpus.
//!
//! Output layout:
//! ```text
//! # {title}
//!
//! > {description}
//! > Source: {source_url}
//! > Generated: 2026-01-31
//!
//! ---
//!
//! # Overview                      <- root section (## for the others)
//!
//! ## Introduction                  <- document (### under non-root sections)
//! <!-- Source: docs/introduction.md -->
//!
//! {body}
//!
//! ---
//!
//! ```

use chrono::NaiveDate;
use tracing::{debug, instrument};

use llmsgen_shared::{HeaderConfig, Section, Taxonomy};

/// Horizontal rule separating the header and each document.
const SEPARATOR: &str = "---";

/// Rendered `llms-full.txt` content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmsFullTxt {
    pub text: String,
    /// Sections emitted (non-empty and listed in the taxonomy).
    pub section_count: usize,
    /// Documents emitted.
    pub document_count: usize,
}

/// Render the flattened corpus.
///
/// Sections are emitted in `taxonomy` order; sections that are empty or whose
/// key is not in the taxonomy are skipped. Documents keep the order they have
/// in their section.
#[instrument(skip_all, fields(sections = sections.len(), generated = %generated))]
pub fn generate_llms_full_txt(
    header: &HeaderConfig,
    source_root: &str,
    generated: NaiveDate,
    taxonomy: &Taxonomy,
    sections: &[Section],
) -> LlmsFullTxt {
    let mut lines: Vec<String> = Vec::new();
    push_header(&mut lines, header, generated);

    let mut section_count = 0;
    let mut document_count = 0;

    for entry in taxonomy.entries() {
        let Some(section) = sections.iter().find(|s| s.key == entry.key) else {
            continue;
        };
        if section.documents.is_empty() {
            continue;
        }

        let depth = if section.is_root() { 1 } else { 2 };
        lines.push(heading(depth, &section.display_title));
        lines.push(String::new());

        for doc in &section.documents {
            lines.push(heading(depth + 1, &doc.title));
            lines.push(provenance(source_root, &doc.path));
            lines.push(String::new());
            lines.push(doc.body.clone());
            lines.push(String::new());
            lines.push(SEPARATOR.to_string());
            lines.push(String::new());
        }

        debug!(section = %section.key, documents = section.documents.len(), "rendered section");
        section_count += 1;
        document_count += section.documents.len();
    }

    LlmsFullTxt {
        text: lines.join("\n"),
        section_count,
        document_count,
    }
}

fn push_header(lines: &mut Vec<String>, header: &HeaderConfig, generated: NaiveDate) {
    lines.push(heading(1, &header.title));
    lines.push(String::new());
    lines.push(format!("> {}", header.description));
    lines.push(format!("> Source: {}", header.source_url));
    lines.push(format!("> Generated: {}", generated.format("%Y-%m-%d")));
    lines.push(String::new());
    lines.push(SEPARATOR.to_string());
    lines.push(String::new());
}

fn heading(depth: usize, text: &str) -> String {
    format!("{} {text}", "#".repeat(depth))
}

/// HTML comment recording where a document came from.
fn provenance(source_root: &str, path: &str) -> String {
    format!("<!-- Source: {source_root}/{path} -->")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
