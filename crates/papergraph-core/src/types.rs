use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property mapping for nodes and relationships
pub type Properties = Map<String, Value>;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: String,
    pub labels: Vec<String>,
    pub properties: Properties,
}

impl NodeRecord {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RelationshipRecord {
    pub id: String,
    pub rel_type: String,
    pub start_id: String,
    pub end_id: String,
    pub properties: Properties,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AuthorName {
    pub forename: Option<String>,
    pub surname: Option<String>,
}

impl AuthorName {
    pub fn new(forename: &str, surname: &str) -> Self {
        Self {
            forename: Some(forename.to_string()),
            surname: Some(surname.to_string()),
        }
    }

    /// Display name, "Forename Surname" with whichever parts are present
    pub fn full_name(&self) -> String {
        [self.forename.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Bibliographic fields extracted from a paper. Every field is best-effort.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PaperMetadata {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub authors: Vec<AuthorName>,
    pub year: Option<i32>,
    pub doi: Option<String>,
    /// At most [`crate::grobid::MAX_REFERENCES`] reference titles
    pub references: Vec<String>,
    pub reference_count: usize,
}

impl PaperMetadata {
    /// Names of the fields that were not found in the source document
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.is_none() {
            missing.push("title");
        }
        if self.abstract_text.is_none() {
            missing.push("abstract");
        }
        if self.authors.is_empty() {
            missing.push("authors");
        }
        if self.year.is_none() {
            missing.push("year");
        }
        if self.doi.is_none() {
            missing.push("doi");
        }
        if self.references.is_empty() {
            missing.push("references");
        }
        missing
    }

    pub fn author_names(&self) -> Vec<String> {
        self.authors
            .iter()
            .map(AuthorName::full_name)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_skips_absent_parts() {
        let only_surname = AuthorName {
            forename: None,
            surname: Some("Curie".into()),
        };
        assert_eq!(only_surname.full_name(), "Curie");
        assert_eq!(AuthorName::new("Marie", "Curie").full_name(), "Marie Curie");
    }

    #[test]
    fn empty_record_reports_every_field_missing() {
        let record = PaperMetadata::default();
        assert_eq!(
            record.missing_fields(),
            vec!["title", "abstract", "authors", "year", "doi", "references"]
        );
    }
}
