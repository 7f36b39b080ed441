//! Artifact publication.
//!
//! The artifact is written to a hidden temp file beside the destination and
//! renamed over it, so the destination only ever holds a complete rendering.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use llmsgen_shared::{LlmsGenError, Result};

/// What was published, for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Destination path.
    pub path: PathBuf,
    /// Bytes written.
    pub size_bytes: u64,
    /// Documents discovered in the corpus, rendered or not.
    pub document_count: usize,
    /// Documents emitted into the artifact.
    pub rendered_count: usize,
    /// Hex SHA-256 of the artifact.
    pub sha256: String,
}

impl PublishReport {
    pub fn size_kib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }

    /// One-line success message, e.g. `✓ Generated static/llms-full.txt (12.3 KB, 42 documents)`.
    pub fn summary(&self) -> String {
        format!(
            "✓ Generated {} ({:.1} KB, {} documents)",
            self.path.display(),
            self.size_kib(),
            self.document_count
        )
    }
}

/// Atomically replace `destination` with `content`.
#[instrument(skip(content), fields(path = %destination.display(), size = content.len()))]
pub fn publish(
    destination: &Path,
    content: &str,
    document_count: usize,
    rendered_count: usize,
) -> Result<PublishReport> {
    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|e| LlmsGenError::write(&parent, e))?;

    let file_name = destination
        .file_name()
        .ok_or_else(|| {
            LlmsGenError::write(
                destination,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "destination has no file name",
                ),
            )
        })?
        .to_string_lossy();
    let temp = parent.join(format!(".{file_name}.tmp"));

    // Write to temp file first
    if let Err(e) = std::fs::write(&temp, content) {
        let _ = std::fs::remove_file(&temp);
        return Err(LlmsGenError::write(&temp, e));
    }

    // Atomic rename
    if let Err(e) = std::fs::rename(&temp, destination) {
        let _ = std::fs::remove_file(&temp);
        return Err(LlmsGenError::write(destination, e));
    }

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(temp = %temp.display(), "renamed artifact into place");

    let report = PublishReport {
        path: destination.to_path_buf(),
        size_bytes: content.len() as u64,
        document_count,
        rendered_count,
        sha256,
    };

    info!(
        size_bytes = report.size_bytes,
        documents = document_count,
        rendered = rendered_count,
        "artifact published"
    );

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
