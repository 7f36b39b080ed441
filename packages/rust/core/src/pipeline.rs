//! End-to-end build: corpus → discovery → extraction → grouping → ordering →
//! rendering → `llms-full.txt`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, instrument};

use llmsgen_artifacts::LlmsFullTxt;
use llmsgen_discovery::CorpusFs;
use llmsgen_shared::{BuildConfig, Document, DocumentLocation, LlmsGenError, Result};

use crate::clock::Clock;
use crate::grouping::{self, Grouping};
use crate::publish::{self, PublishReport};

/// A section that was left out of the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlistedSection {
    pub key: String,
    pub documents: usize,
}

/// Everything computed before the artifact is written.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Documents found by discovery.
    pub discovered: usize,
    /// Grouped and ordered documents.
    pub grouping: Grouping,
    /// The rendered artifact.
    pub artifact: LlmsFullTxt,
}

/// Result of a successful build.
#[derive(Debug)]
pub struct BuildResult {
    pub report: PublishReport,
    /// Sections emitted into the artifact.
    pub section_count: usize,
    /// Sections discovered but not in the taxonomy.
    pub unlisted: Vec<UnlistedSection>,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each document is read and parsed. May be called from
    /// several threads at once.
    fn document_extracted(&self, path: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn document_extracted(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Run every phase up to, but not including, writing the artifact.
///
/// 1. Discover documents under `config.docs_dir`
/// 2. Read and parse each one (in parallel when enabled)
/// 3. Group by section and order within sections
/// 4. Render `llms-full.txt`
#[instrument(skip_all, fields(docs_dir = %config.docs_dir.display()))]
pub fn assemble(
    config: &BuildConfig,
    fs: &dyn CorpusFs,
    clock: &dyn Clock,
    progress: &dyn ProgressReporter,
) -> Result<Assembly> {
    // --- Phase 1: Discovery ---
    progress.phase("Discovering documents");
    let locations = llmsgen_discovery::discover(fs, &config.docs_dir)?;

    // --- Phase 2: Extraction ---
    progress.phase("Extracting documents");
    let documents = extract_all(fs, &locations, config.parallel, progress)?;

    // --- Phase 3: Grouping & ordering ---
    progress.phase("Grouping sections");
    let mut grouping = grouping::group_documents(&config.taxonomy, documents);
    grouping::order_sections(&mut grouping);

    // --- Phase 4: Rendering ---
    progress.phase("Rendering llms-full.txt");
    let artifact = llmsgen_artifacts::generate_llms_full_txt(
        &config.header,
        &config.source_root,
        clock.today(),
        &config.taxonomy,
        &grouping.listed,
    );

    Ok(Assembly {
        discovered: locations.len(),
        grouping,
        artifact,
    })
}

/// Run the full build and publish the artifact to `config.output`.
///
/// Any fatal error aborts before the destination is touched.
#[instrument(skip_all, fields(output = %config.output.display()))]
pub fn build(
    config: &BuildConfig,
    fs: &dyn CorpusFs,
    clock: &dyn Clock,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();

    let assembly = assemble(config, fs, clock, progress)?;

    // --- Phase 5: Publication ---
    progress.phase("Writing artifact");
    let report = publish::publish(
        &config.output,
        &assembly.artifact.text,
        assembly.discovered,
        assembly.artifact.document_count,
    )?;

    let unlisted = assembly
        .grouping
        .unlisted
        .iter()
        .map(|s| UnlistedSection {
            key: s.key.clone(),
            documents: s.documents.len(),
        })
        .collect();

    let result = BuildResult {
        report,
        section_count: assembly.artifact.section_count,
        unlisted,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        documents = result.report.document_count,
        rendered = result.report.rendered_count,
        sections = result.section_count,
        unlisted_sections = result.unlisted.len(),
        elapsed_ms = result.elapsed.as_millis(),
        "build complete"
    );

    Ok(result)
}

/// Read and parse every location, preserving discovery order.
fn extract_all(
    fs: &dyn CorpusFs,
    locations: &[DocumentLocation],
    parallel: bool,
    progress: &dyn ProgressReporter,
) -> Result<Vec<Document>> {
    let total = locations.len();
    let done = AtomicUsize::new(0);

    let extract_one = |location: &DocumentLocation| -> Result<Document> {
        let raw = fs
            .read_to_string(&location.absolute)
            .map_err(|e| LlmsGenError::file_system(&location.absolute, e))?;
        let doc = llmsgen_markdown::build_document(location, &raw);

        let current = done.fetch_add(1, Ordering::Relaxed) + 1;
        progress.document_extracted(&location.relative, current, total);
        Ok(doc)
    };

    // Indexed collect keeps input order regardless of completion order.
    let documents = if parallel {
        locations.par_iter().map(extract_one).collect::<Result<Vec<_>>>()?
    } else {
        locations.iter().map(extract_one).collect::<Result<Vec<_>>>()?
    };

    info!(documents = documents.len(), parallel, "extraction complete");
    Ok(documents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
