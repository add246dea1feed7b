//! CLI argument parsing and command building

use clap::Command;

/// Build the main CLI command structure
pub fn build_cli() -> Command {
    Command::new("papergraph")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Neo4j and GROBID demonstrations over a small paper graph")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("basic")
                .about("Create people and companies, link them and query the result"),
        )
        .subcommand(
            Command::new("papers")
                .about("Load three sample papers and run the citation query battery"),
        )
        .subcommand(
            Command::new("grobid")
                .about("Extract paper headers from PDFs with GROBID, falling back to sample data"),
        )
        .subcommand(
            Command::new("status").about("Check Neo4j connectivity and GROBID availability"),
        )
}
