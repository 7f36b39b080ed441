//! llmsgen CLI: flatten a documentation corpus into `llms-full.txt`.
//!
//! Run with no arguments from the site root: reads `docs/`, writes
//! `static/llms-full.txt`, and reports the artifact size and document count.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
