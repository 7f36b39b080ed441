//! Shared types, error model, and configuration for llmsgen.
//!
//! This crate is the foundation depended on by all other llmsgen crates.
//! It provides:
//! - [`LlmsGenError`]: the unified error type
//! - Domain types ([`Document`], [`Section`], [`Taxonomy`], [`DocumentLocation`])
//! - Configuration ([`AppConfig`], [`BuildConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BuildConfig, CONFIG_FILE_NAME, CorpusConfig, HeaderConfig, load_config,
    load_config_from,
};
pub use error::{LlmsGenError, Result};
pub use types::{
    Document, DocumentLocation, ROOT_SECTION, SENTINEL_POSITION, Section, Taxonomy, TaxonomyEntry,
};
