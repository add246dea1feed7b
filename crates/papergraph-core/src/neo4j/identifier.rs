//! Validated label and relationship-type names
//!
//! Cypher cannot bind labels or relationship types as parameters, so they are
//! the only caller-supplied text that reaches query strings. Both types accept
//! plain identifiers only and always render backtick-quoted.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::error::GraphError;

const MAX_IDENTIFIER_LEN: usize = 64;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"));

fn validate(kind: &'static str, value: &str) -> Result<String, GraphError> {
    if value.len() > MAX_IDENTIFIER_LEN || !IDENTIFIER.is_match(value) {
        return Err(GraphError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Validate a property name that has to appear in query text (index
/// definitions) and return it backtick-quoted
pub fn quoted_property_key(value: &str) -> Result<String, GraphError> {
    validate("property", value).map(|key| format!("`{key}`"))
}

/// A node label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(value: &str) -> Result<Self, GraphError> {
        validate("label", value).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form used inside query text
    pub fn quoted(&self) -> String {
        format!("`{}`", self.0)
    }
}

impl FromStr for Label {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A relationship type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelType(String);

impl RelType {
    pub fn new(value: &str) -> Result<Self, GraphError> {
        validate("relationship type", value).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn quoted(&self) -> String {
        format!("`{}`", self.0)
    }
}

impl FromStr for RelType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
