//! Error types for llmsgen.
//!
//! Library crates use [`LlmsGenError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all llmsgen operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmsGenError {
    /// A corpus directory or document could not be read. Fatal.
    #[error("file system error at {path:?}: {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A document's metadata block is malformed. Recoverable: callers
    /// degrade to empty metadata.
    #[error("metadata parse error in {path}: {message}")]
    MetadataParse { path: String, message: String },

    /// The artifact destination could not be created or written. Fatal.
    #[error("write error at {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Data validation error (duplicate taxonomy keys, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LlmsGenError>;

impl LlmsGenError {
    /// Wrap a read-side `std::io::Error` with the path that failed.
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Wrap a write-side `std::io::Error` with the destination that failed.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create a metadata parse error for the document at `path`.
    pub fn metadata_parse(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::MetadataParse {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Whether the run may continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MetadataParse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = LlmsGenError::config("missing docs_dir");
        assert_eq!(err.to_string(), "config error: missing docs_dir");

        let err = LlmsGenError::metadata_parse("protocol/intro.md", "unclosed block");
        assert!(err.to_string().contains("protocol/intro.md"));
        assert!(err.to_string().contains("unclosed block"));
    }

    #[test]
    fn only_metadata_errors_are_recoverable() {
        let denied = || std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");

        assert!(LlmsGenError::metadata_parse("a.md", "bad").is_recoverable());
        assert!(!LlmsGenError::file_system("docs", denied()).is_recoverable());
        assert!(!LlmsGenError::write("out.txt", denied()).is_recoverable());
        assert!(!LlmsGenError::config("x").is_recoverable());
    }
}
