use crate::error::ConfigError;

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_NEO4J_USER: &str = "neo4j";
pub const DEFAULT_NEO4J_DATABASE: &str = "neo4j";
pub const DEFAULT_GROBID_URL: &str = "http://localhost:8070";
pub const DEFAULT_PDF_DIR: &str = "./papers";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GrobidConfig {
    pub base_url: String,
    pub consolidate_header: bool,
    pub timeout: Option<Duration>,
}

impl Default for GrobidConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GROBID_URL.to_string(),
            consolidate_header: false,
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub neo4j: Neo4jConfig,
    pub grobid: GrobidConfig,
    pub pdf_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from the process environment, reading a `.env`
    /// file first when one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let neo4j = Neo4jConfig {
            uri: var("NEO4J_URI").unwrap_or_else(|| DEFAULT_NEO4J_URI.to_string()),
            user: var("NEO4J_USERNAME").unwrap_or_else(|| DEFAULT_NEO4J_USER.to_string()),
            password: var("NEO4J_PASSWORD").ok_or(ConfigError::Missing("NEO4J_PASSWORD"))?,
            database: var("NEO4J_DATABASE")
                .unwrap_or_else(|| DEFAULT_NEO4J_DATABASE.to_string()),
        };

        let consolidate_header = match var("GROBID_CONSOLIDATE_HEADER") {
            Some(value) => parse_flag("GROBID_CONSOLIDATE_HEADER", &value)?,
            None => false,
        };

        let timeout = match var("GROBID_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                    var: "GROBID_TIMEOUT_SECS",
                    value: value.clone(),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let grobid = GrobidConfig {
            base_url: var("GROBID_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GROBID_URL.to_string()),
            consolidate_header,
            timeout,
        };

        let pdf_dir = PathBuf::from(var("PAPERGRAPH_PDF_DIR").unwrap_or_else(|| DEFAULT_PDF_DIR.to_string()));

        debug!(
            "Loaded config: neo4j={} db={} grobid={} pdf_dir={}",
            neo4j.uri,
            neo4j.database,
            grobid.base_url,
            pdf_dir.display()
        );

        Ok(Self {
            neo4j,
            grobid,
            pdf_dir,
        })
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
        }),
    }
}
