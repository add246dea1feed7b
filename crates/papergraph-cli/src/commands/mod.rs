//! CLI command modules, one per demo

pub mod basic;
pub mod grobid;
pub mod papers;
pub mod status;

use anyhow::Result;
use clap::ArgMatches;
use papergraph_core::AppConfig;

/// Trait for CLI command handlers
#[allow(async_fn_in_trait)]
pub trait CommandHandler {
    /// Execute the command with the given arguments and configuration
    async fn execute(&self, matches: &ArgMatches, config: &AppConfig) -> Result<()>;
}
