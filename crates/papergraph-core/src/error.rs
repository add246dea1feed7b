use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which side of a relationship an endpoint filter describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    From,
    To,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::From => write!(f, "source"),
            Endpoint::To => write!(f, "target"),
        }
    }
}

/// Errors raised by the graph layer
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid {kind} identifier: {value:?}")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("invalid property {key:?}: {reason}")]
    InvalidProperty { key: String, reason: String },

    #[error("{endpoint} endpoint :{label} matched {matched} nodes, expected exactly one")]
    Cardinality {
        endpoint: Endpoint,
        label: String,
        matched: i64,
    },

    #[error("unexpected query result: {0}")]
    UnexpectedResult(String),

    #[error("database error: {0}")]
    Database(#[from] neo4rs::Error),

    #[error("failed to decode row: {0}")]
    Decode(#[from] neo4rs::DeError),
}

/// Errors raised while talking to GROBID or reading its output
#[derive(Debug, Error)]
pub enum GrobidError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GROBID returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed TEI document: {0}")]
    MalformedTei(String),
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}
