//! Literal records inserted by the demos

use papergraph_core::{AuthorName, PaperMetadata, Properties};
use serde_json::{json, Value};

pub struct Person {
    pub name: &'static str,
    pub age: i64,
    pub city: &'static str,
    pub skills: &'static [&'static str],
}

impl Person {
    pub fn properties(&self) -> Properties {
        to_properties(json!({
            "name": self.name,
            "age": self.age,
            "city": self.city,
            "skills": self.skills,
        }))
    }
}

pub struct Company {
    pub name: &'static str,
    pub industry: &'static str,
    pub founded: i64,
}

impl Company {
    pub fn properties(&self) -> Properties {
        to_properties(json!({
            "name": self.name,
            "industry": self.industry,
            "founded": self.founded,
        }))
    }
}

/// (person, company, since, role)
pub type Employment = (&'static str, &'static str, i64, &'static str);

/// (person, person, since)
pub type Acquaintance = (&'static str, &'static str, i64);

pub const PEOPLE: &[Person] = &[
    Person {
        name: "Alice Johnson",
        age: 30,
        city: "London",
        skills: &["rust", "graphs"],
    },
    Person {
        name: "Bob Smith",
        age: 35,
        city: "Berlin",
        skills: &["python", "sql"],
    },
    Person {
        name: "Carol White",
        age: 28,
        city: "London",
        skills: &["design"],
    },
];

pub const COMPANIES: &[Company] = &[
    Company {
        name: "Acme Corp",
        industry: "Manufacturing",
        founded: 1990,
    },
    Company {
        name: "Globex",
        industry: "Technology",
        founded: 2005,
    },
];

pub const EMPLOYMENTS: &[Employment] = &[
    ("Alice Johnson", "Globex", 2019, "Engineer"),
    ("Bob Smith", "Acme Corp", 2015, "Manager"),
    ("Carol White", "Globex", 2021, "Designer"),
];

pub const ACQUAINTANCES: &[Acquaintance] = &[
    ("Alice Johnson", "Bob Smith", 2010),
    ("Alice Johnson", "Carol White", 2020),
];

pub fn to_properties(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        _ => Properties::new(),
    }
}

fn author(full: &str) -> AuthorName {
    match full.rsplit_once(' ') {
        Some((forename, surname)) => AuthorName::new(forename, surname),
        None => AuthorName {
            forename: None,
            surname: Some(full.to_string()),
        },
    }
}

pub const GRAPH_DATABASES: &str = "Graph Databases for Scholarly Knowledge";
pub const METADATA_EXTRACTION: &str = "Extracting Bibliographic Metadata with Machine Learning";
pub const CITATION_NETWORKS: &str = "Citation Networks at Scale";

/// Three papers in citation order: each only cites papers listed before it
pub fn sample_papers() -> Vec<PaperMetadata> {
    let paper = |title: &str,
                 year: i32,
                 doi: &str,
                 authors: &[&str],
                 abstract_text: &str,
                 references: &[&str]| PaperMetadata {
        title: Some(title.to_string()),
        abstract_text: Some(abstract_text.to_string()),
        authors: authors.iter().map(|a| author(a)).collect(),
        year: Some(year),
        doi: Some(doi.to_string()),
        references: references.iter().map(|r| r.to_string()).collect(),
        reference_count: references.len(),
    };

    vec![
        paper(
            GRAPH_DATABASES,
            2018,
            "10.5555/papergraph.2018.001",
            &["Alice Chen", "Bob Martinez"],
            "We model papers, authors and citations as a property graph and show \
             how common bibliometric questions become short traversals.",
            &["A Relational Model of Data for Large Shared Data Banks"],
        ),
        paper(
            METADATA_EXTRACTION,
            2019,
            "10.5555/papergraph.2019.002",
            &["Alice Chen", "Carol Singh"],
            "A sequence labelling approach to recovering titles, authors and \
             references from scientific PDFs.",
            &[
                GRAPH_DATABASES,
                "Conditional Random Fields: Probabilistic Models for Segmenting and Labeling Sequence Data",
            ],
        ),
        paper(
            CITATION_NETWORKS,
            2021,
            "10.5555/papergraph.2021.003",
            &["Alice Chen", "Bob Martinez", "David Okafor"],
            "We analyse the structure of a citation network built from \
             automatically extracted metadata.",
            &[
                GRAPH_DATABASES,
                METADATA_EXTRACTION,
                "Collective Dynamics of Small-World Networks",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use papergraph_core::grobid::MAX_REFERENCES;
    use std::collections::{BTreeMap, HashSet};

    #[test]
    fn sample_papers_are_complete() {
        for paper in sample_papers() {
            assert!(paper.missing_fields().is_empty(), "{:?}", paper.title);
            assert!(paper.references.len() <= MAX_REFERENCES);
        }
    }

    #[test]
    fn papers_only_cite_earlier_papers() {
        let mut seen = HashSet::new();
        let all: HashSet<String> = sample_papers()
            .into_iter()
            .filter_map(|p| p.title)
            .collect();
        for paper in sample_papers() {
            for reference in &paper.references {
                if all.contains(reference) {
                    assert!(seen.contains(reference), "{reference} cited before stored");
                }
            }
            seen.insert(paper.title.clone().unwrap());
        }
    }

    #[test]
    fn alice_is_the_most_prolific_author() {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for paper in sample_papers() {
            for name in paper.author_names() {
                *counts.entry(name).or_default() += 1;
            }
        }
        assert_eq!(counts["Alice Chen"], 3);
        assert_eq!(counts["Bob Martinez"], 2);
        assert_eq!(counts["Carol Singh"], 1);
        assert_eq!(counts["David Okafor"], 1);
    }

    #[test]
    fn relationship_endpoints_exist() {
        let people: HashSet<&str> = PEOPLE.iter().map(|p| p.name).collect();
        let companies: HashSet<&str> = COMPANIES.iter().map(|c| c.name).collect();
        for (person, company, _, _) in EMPLOYMENTS {
            assert!(people.contains(person) && companies.contains(company));
        }
        for (a, b, _) in ACQUAINTANCES {
            assert!(people.contains(a) && people.contains(b));
        }
    }

    #[test]
    fn person_properties_hold_skill_lists() {
        let props = PEOPLE[0].properties();
        assert_eq!(props["skills"], json!(["rust", "graphs"]));
        assert_eq!(props["age"], json!(30));
    }
}
