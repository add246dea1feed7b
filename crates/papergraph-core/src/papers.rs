//! Persistence of paper records as `Paper`, `Author` and `Reference` nodes

use chrono::Utc;
use log::{debug, info};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::GraphError;
use crate::neo4j::{GraphOps, Label, RelType};
use crate::types::{NodeRecord, PaperMetadata, Properties};

pub const PAPER: &str = "Paper";
pub const AUTHOR: &str = "Author";
pub const REFERENCE: &str = "Reference";
pub const AUTHORED: &str = "AUTHORED";
pub const CITES: &str = "CITES";

/// Read queries over the paper graph. `$limit` is bound by the caller.
pub mod queries {
    pub const MOST_PROLIFIC_AUTHORS: &str = "\
        MATCH (a:Author)-[:AUTHORED]->(p:Paper) \
        RETURN a.name AS author, count(p) AS papers \
        ORDER BY papers DESC, author ASC \
        LIMIT $limit";

    pub const MOST_CITED_PAPERS: &str = "\
        MATCH (citing:Paper)-[:CITES]->(p:Paper) \
        RETURN p.title AS title, count(citing) AS citations \
        ORDER BY citations DESC, title ASC \
        LIMIT $limit";

    pub const PAPERS_PER_YEAR: &str = "\
        MATCH (p:Paper) WHERE p.year IS NOT NULL \
        RETURN p.year AS year, count(p) AS papers \
        ORDER BY year ASC";

    pub const CO_AUTHOR_PAIRS: &str = "\
        MATCH (a1:Author)-[:AUTHORED]->(p:Paper)<-[:AUTHORED]-(a2:Author) \
        WHERE a1.name < a2.name \
        RETURN a1.name AS first, a2.name AS second, count(p) AS shared \
        ORDER BY shared DESC, first ASC, second ASC \
        LIMIT $limit";

    pub const REFERENCES_BY_PAPER: &str = "\
        MATCH (p:Paper) \
        OPTIONAL MATCH (p)-[:CITES]->(r) \
        WITH p, collect(r.title) AS cited \
        RETURN p.title AS title, cited \
        ORDER BY title ASC";
}

/// Where a stored record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSource {
    Grobid,
    Sample,
}

impl PaperSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperSource::Grobid => "grobid",
            PaperSource::Sample => "sample",
        }
    }
}

/// Counts of what one `store_paper` call wrote
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreSummary {
    /// A paper with the same DOI was already stored; nothing was written
    pub duplicate: bool,
    pub authors_created: usize,
    pub authors_reused: usize,
    pub paper_citations: usize,
    pub external_references: usize,
}

fn props(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        _ => Properties::new(),
    }
}

/// Node properties for a paper; absent fields are left out
pub fn paper_properties(paper: &PaperMetadata, id: &str, source: PaperSource) -> Properties {
    let mut properties = props(json!({
        "id": id,
        "source": source.as_str(),
        "ingested_at": Utc::now().to_rfc3339(),
        "authors": paper.author_names(),
        "reference_count": paper.reference_count as i64,
    }));
    if let Some(title) = &paper.title {
        properties.insert("title".into(), json!(title));
    }
    if let Some(abstract_text) = &paper.abstract_text {
        properties.insert("abstract".into(), json!(abstract_text));
    }
    if let Some(year) = paper.year {
        properties.insert("year".into(), json!(year));
    }
    if let Some(doi) = &paper.doi {
        properties.insert("doi".into(), json!(doi));
    }
    properties
}

/// Writes paper records through [`GraphOps`]
pub struct PaperStore<'a> {
    ops: &'a GraphOps<'a>,
    paper: Label,
    author: Label,
    reference: Label,
    authored: RelType,
    cites: RelType,
}

impl<'a> PaperStore<'a> {
    pub fn new(ops: &'a GraphOps<'a>) -> Result<Self, GraphError> {
        Ok(Self {
            ops,
            paper: Label::new(PAPER)?,
            author: Label::new(AUTHOR)?,
            reference: Label::new(REFERENCE)?,
            authored: RelType::new(AUTHORED)?,
            cites: RelType::new(CITES)?,
        })
    }

    /// Remove every paper, author and reference node
    pub async fn clear(&self) -> Result<i64, GraphError> {
        let mut removed = 0;
        for label in [&self.paper, &self.author, &self.reference] {
            removed += self.ops.clear_label(label).await?;
        }
        Ok(removed)
    }

    pub async fn ensure_indexes(&self) -> Result<(), GraphError> {
        self.ops.ensure_index(&self.paper, "id").await?;
        self.ops.ensure_index(&self.paper, "title").await?;
        self.ops.ensure_index(&self.author, "name").await?;
        Ok(())
    }

    /// Store one paper with its authors and references. A paper whose DOI
    /// is already stored is not written again; the existing node is
    /// returned with [`StoreSummary::duplicate`] set.
    pub async fn store_paper(
        &self,
        paper: &PaperMetadata,
        source: PaperSource,
    ) -> Result<(NodeRecord, StoreSummary), GraphError> {
        if let Some(doi) = &paper.doi {
            let existing = self
                .ops
                .find_nodes(&self.paper, &props(json!({ "id": doi })))
                .await?;
            if let Some(node) = existing.into_iter().next() {
                info!("Paper {} already stored, skipping", doi);
                let summary = StoreSummary {
                    duplicate: true,
                    ..Default::default()
                };
                return Ok((node, summary));
            }
        }

        let id = paper
            .doi
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let node = self
            .ops
            .create_node(&self.paper, &paper_properties(paper, &id, source))
            .await?;
        let paper_key = props(json!({ "id": id }));
        let mut summary = StoreSummary::default();

        for (position, name) in paper.author_names().iter().enumerate() {
            let author_key = props(json!({ "name": name }));
            if self.ops.find_nodes(&self.author, &author_key).await?.is_empty() {
                self.ops.create_node(&self.author, &author_key).await?;
                summary.authors_created += 1;
            } else {
                summary.authors_reused += 1;
            }
            self.ops
                .create_relationship(
                    &self.author,
                    &author_key,
                    &self.paper,
                    &paper_key,
                    &self.authored,
                    &props(json!({ "position": position as i64 + 1 })),
                )
                .await?;
        }

        for title in &paper.references {
            let title_key = props(json!({ "title": title }));
            let cited = self.ops.find_nodes(&self.paper, &title_key).await?;
            if cited.len() == 1 {
                self.ops
                    .create_relationship(
                        &self.paper,
                        &paper_key,
                        &self.paper,
                        &title_key,
                        &self.cites,
                        &Properties::new(),
                    )
                    .await?;
                summary.paper_citations += 1;
            } else {
                if self.ops.find_nodes(&self.reference, &title_key).await?.is_empty() {
                    self.ops.create_node(&self.reference, &title_key).await?;
                }
                self.ops
                    .create_relationship(
                        &self.paper,
                        &paper_key,
                        &self.reference,
                        &title_key,
                        &self.cites,
                        &Properties::new(),
                    )
                    .await?;
                summary.external_references += 1;
            }
        }

        debug!("Stored paper {} ({:?})", id, summary);
        info!(
            "Stored paper {:?} with {} authors",
            paper.title.as_deref().unwrap_or("<untitled>"),
            paper.authors.len()
        );
        Ok((node, summary))
    }
}
