//! papergraph command-line interface
//!
//! Demo commands that populate and query a Neo4j graph, optionally from
//! PDFs run through GROBID.
//!
//! # Key Modules
//!
//! - [`cli`] - entry point and command routing
//! - [`cli_builder`] - clap command definition
//! - [`commands`] - one handler per demo
//! - [`sample_data`] - literal records the demos insert
//! - [`response_formatter`] - console output helpers

pub mod cli;
pub mod cli_builder;
pub mod commands;
pub mod response_formatter;
pub mod sample_data;
