//! Main CLI entry point and command routing

use anyhow::{Context, Result};
use papergraph_core::AppConfig;

use crate::cli_builder::build_cli;
use crate::commands::{
    basic::BasicCommand, grobid::GrobidCommand, papers::PapersCommand, status::StatusCommand,
    CommandHandler,
};

/// Parse arguments, load configuration and run the selected demo.
/// Argument errors exit through clap with status 2.
pub async fn run() -> Result<()> {
    let matches = build_cli().get_matches();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    match matches.subcommand() {
        Some(("basic", sub_matches)) => BasicCommand::new().execute(sub_matches, &config).await,
        Some(("papers", sub_matches)) => PapersCommand::new().execute(sub_matches, &config).await,
        Some(("grobid", sub_matches)) => GrobidCommand::new().execute(sub_matches, &config).await,
        Some(("status", sub_matches)) => StatusCommand::new().execute(sub_matches, &config).await,
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
