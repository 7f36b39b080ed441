//! CLI definition, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use llmsgen_core::{BuildResult, ProgressReporter, SystemClock};
use llmsgen_discovery::OsFs;
use llmsgen_shared::{AppConfig, BuildConfig, load_config, load_config_from};
use tracing::{error, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// llmsgen: flatten a documentation tree into a single llms-full.txt.
#[derive(Parser)]
#[command(
    name = "llmsgen",
    version,
    about = "Flatten a documentation corpus into one ordered, LLM-ready text file.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./llmsgen.toml when present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Corpus root directory (overrides `corpus.docs_dir`).
    #[arg(long, global = true)]
    pub docs_dir: Option<String>,

    /// Artifact destination (overrides `corpus.output`).
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Extract documents on a single thread.
    #[arg(long, global = true)]
    pub sequential: bool,

    /// Defaults to building the artifact.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build llms-full.txt (the default).
    Build,

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved configuration (file + flags).
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "warn,llmsgen=info",
        1 => "warn,llmsgen=debug",
        _ => "warn,llmsgen=trace",
    };
    let env_filter = EnvFilter::new(filter);

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    match cli.command {
        None | Some(Command::Build) => cmd_build(&config),
        Some(Command::Config {
            action: ConfigAction::Show,
        }) => cmd_config_show(&config),
    }
}

/// Load the config file and apply flag overrides.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)
            .wrap_err_with(|| format!("loading config {}", path.display()))?,
        None => load_config()?,
    };

    if let Some(docs_dir) = &cli.docs_dir {
        config.corpus.docs_dir = docs_dir.clone();
    }
    if let Some(output) = &cli.output {
        config.corpus.output = output.clone();
    }
    if cli.sequential {
        config.corpus.parallel = false;
    }

    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(config: &AppConfig) -> Result<()> {
    let build_config = BuildConfig::try_from(config)?;

    info!(
        docs_dir = %build_config.docs_dir.display(),
        output = %build_config.output.display(),
        sections = build_config.taxonomy.entries().len(),
        "building llms-full.txt"
    );

    let reporter = CliProgress::new();
    let outcome = llmsgen_core::build(&build_config, &OsFs, &SystemClock, &reporter);
    reporter.finish();

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "build failed; no artifact was written");
            return Err(e).wrap_err("failed to generate llms-full.txt");
        }
    };

    println!("{}", result.report.summary());

    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    // Surface validation problems before printing.
    BuildConfig::try_from(config)?;
    let toml_str = toml_string(config)?;
    println!("{toml_str}");
    Ok(())
}

fn toml_string(config: &AppConfig) -> Result<String> {
    let mut shown = config.clone();
    if shown.sections.is_empty() {
        shown.sections = llmsgen_shared::Taxonomy::default().entries().to_vec();
    }
    Ok(toml::to_string_pretty(&shown)?)
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Spinner on stderr that follows pipeline phases.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn document_extracted(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Extracting [{current}/{total}] {path}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
