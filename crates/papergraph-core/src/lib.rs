//! Core library for papergraph
//!
//! Configuration, error types, the Neo4j session and CRUD layer, the GROBID
//! client with its TEI parser, and the paper store built on top of both.
//!
//! # Key Modules
//!
//! - [`neo4j`] - session scope manager and graph CRUD helpers
//! - [`grobid`] - header extraction against a GROBID service
//! - [`papers`] - persistence of extracted paper records as graph nodes
//! - [`config`] - environment-driven configuration

pub mod config;
pub mod error;
pub mod grobid;
pub mod neo4j;
pub mod papers;
pub mod types;

pub use config::{AppConfig, GrobidConfig, Neo4jConfig};
pub use error::{ConfigError, GraphError, GrobidError};
pub use types::{AuthorName, NodeRecord, PaperMetadata, Properties, RelationshipRecord};
