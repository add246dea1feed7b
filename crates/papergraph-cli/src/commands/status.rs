use anyhow::{bail, Result};
use clap::ArgMatches;
use papergraph_core::grobid::GrobidClient;
use papergraph_core::neo4j::{with_session, GraphSession};
use papergraph_core::AppConfig;

use super::CommandHandler;
use crate::response_formatter::{print_banner, print_success, print_warning};

/// Read-only connectivity report for both services
pub struct StatusCommand;

impl StatusCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StatusCommand {
    fn default() -> Self {
        Self::new()
    }
}

async fn ping(session: &GraphSession) -> Result<String> {
    session.ping().await?;
    Ok(session.database().to_string())
}

impl CommandHandler for StatusCommand {
    async fn execute(&self, _matches: &ArgMatches, config: &AppConfig) -> Result<()> {
        print_banner("Service status");

        let neo4j = with_session(&config.neo4j, |session| Box::pin(ping(session))).await;
        match &neo4j {
            Ok(database) => print_success(&format!(
                "Neo4j reachable at {} (database {database})",
                config.neo4j.uri
            )),
            Err(e) => print_warning(&format!("Neo4j unreachable at {}: {e:#}", config.neo4j.uri)),
        }

        let client = GrobidClient::new(&config.grobid)?;
        match client.version().await {
            Ok(version) => print_success(&format!(
                "GROBID {version} available at {}",
                client.base_url()
            )),
            Err(e) => print_warning(&format!(
                "GROBID unavailable at {}: {e}; the grobid demo will use sample data",
                client.base_url()
            )),
        }

        if neo4j.is_err() {
            bail!("Neo4j is not reachable");
        }
        Ok(())
    }
}
