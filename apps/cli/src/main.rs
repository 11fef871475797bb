//! frameworkgen CLI: compliance framework data → static site content.
//!
//! Downloads the framework spreadsheet, normalizes each tab into YAML, and
//! renders the YAML into markdown sections for the website.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
