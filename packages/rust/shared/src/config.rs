//! Build configuration for llmsgen.
//!
//! Project config lives at `./llmsgen.toml` (or a path given on the command
//! line). CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{LlmsGenError, Result};
use crate::types::{Taxonomy, TaxonomyEntry};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "llmsgen.toml";

// ---------------------------------------------------------------------------
// Config structs (matching llmsgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level project config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input corpus and output location.
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Artifact header block.
    #[serde(default)]
    pub header: HeaderConfig,

    /// Canonical taxonomy. Empty means the built-in Mehr Network sections.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<TaxonomyEntry>,
}

/// `[corpus]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Root directory of the documentation corpus.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Destination of the flattened artifact.
    #[serde(default = "default_output")]
    pub output: String,

    /// Extract documents on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            output: default_output(),
            parallel: true,
        }
    }
}

fn default_docs_dir() -> String {
    "docs".into()
}
fn default_output() -> String {
    "static/llms-full.txt".into()
}
fn default_true() -> bool {
    true
}

/// `[header]` section: the fixed block at the top of the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_description")]
    pub description: String,

    /// Canonical source reference. Must be an absolute URL.
    #[serde(default = "default_source_url")]
    pub source_url: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            source_url: default_source_url(),
        }
    }
}

fn default_title() -> String {
    "Mehr Network — Complete Documentation".into()
}
fn default_description() -> String {
    "Decentralized mesh networking infrastructure powered by Proof of Service.".into()
}
fn default_source_url() -> String {
    "https://mehr.network".into()
}

// ---------------------------------------------------------------------------
// Build config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime build configuration, validated and merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Corpus root on disk.
    pub docs_dir: PathBuf,
    /// Corpus root label used in provenance markers (e.g. `docs`).
    pub source_root: String,
    /// Artifact destination.
    pub output: PathBuf,
    /// Whether extraction may fan out across threads.
    pub parallel: bool,
    pub header: HeaderConfig,
    pub taxonomy: Taxonomy,
}

impl TryFrom<&AppConfig> for BuildConfig {
    type Error = LlmsGenError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let taxonomy = if config.sections.is_empty() {
            Taxonomy::default()
        } else {
            Taxonomy::new(config.sections.clone())?
        };

        Ok(Self {
            docs_dir: PathBuf::from(&config.corpus.docs_dir),
            source_root: source_root_label(&config.corpus.docs_dir),
            output: PathBuf::from(&config.corpus.output),
            parallel: config.corpus.parallel,
            header: config.header.clone(),
            taxonomy,
        })
    }
}

impl AppConfig {
    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.corpus.docs_dir.trim().is_empty() {
            return Err(LlmsGenError::config("corpus.docs_dir must not be empty"));
        }
        if self.corpus.output.trim().is_empty() {
            return Err(LlmsGenError::config("corpus.output must not be empty"));
        }
        Url::parse(&self.header.source_url).map_err(|e| {
            LlmsGenError::config(format!(
                "header.source_url {:?} is not a valid URL: {e}",
                self.header.source_url
            ))
        })?;
        Ok(())
    }
}

/// Normalize a configured corpus directory into a `/`-separated label.
///
/// An absolute directory is labelled by its last component only, so the
/// host's path never leaks into the artifact.
fn source_root_label(docs_dir: &str) -> String {
    let path = Path::new(docs_dir);
    if path.is_absolute() || path.has_root() {
        return path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string());
    }

    let label = docs_dir.replace('\\', "/");
    let label = label.trim_start_matches("./").trim_end_matches('/');
    if label.is_empty() {
        ".".to_string()
    } else {
        label.to_string()
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `./llmsgen.toml`. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = Path::new(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(path)
}

/// Load the project config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content =
        std::fs::read_to_string(path).map_err(|e| LlmsGenError::file_system(path, e))?;

    toml::from_str(&content).map_err(|e| {
        LlmsGenError::config(format!("failed to parse {}: {e}", path.display()))
    })
}
