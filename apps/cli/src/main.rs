//! nbgallery CLI: builds a Quarto gallery page from Jupyter notebooks.
//!
//! Scans documentation notebooks for marked plots, thumbnails them, and
//! writes a sectioned gallery page that links back to each plot.

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
