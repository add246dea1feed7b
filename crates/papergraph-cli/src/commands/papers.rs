use anyhow::Result;
use clap::ArgMatches;
use log::warn;
use papergraph_core::neo4j::{with_session, GraphOps, GraphSession, Label, RelType};
use papergraph_core::papers::{queries, PaperSource, PaperStore, AUTHOR, AUTHORED, CITES, PAPER, REFERENCE};
use papergraph_core::{AppConfig, PaperMetadata, Properties};
use serde_json::json;

use super::CommandHandler;
use crate::response_formatter::{
    print_banner, print_paper, print_rows, print_step, print_success, print_warning,
};
use crate::sample_data::{sample_papers, to_properties};

const TOP_N: i64 = 5;

/// Three literal papers and the citation query battery
pub struct PapersCommand;

impl PapersCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PapersCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for PapersCommand {
    async fn execute(&self, _matches: &ArgMatches, config: &AppConfig) -> Result<()> {
        print_banner("Paper graph demo");
        with_session(&config.neo4j, |session| Box::pin(run_papers(session))).await
    }
}

async fn run_papers(session: &GraphSession) -> Result<()> {
    let ops = session.ops();
    let store = PaperStore::new(&ops)?;

    print_step("Clearing previous paper data");
    let removed = store.clear().await?;
    print_success(&format!("removed {removed} nodes"));
    store.ensure_indexes().await?;

    store_papers(&store, &sample_papers(), PaperSource::Sample, OnPaperError::Abort).await?;
    run_paper_queries(&ops).await
}

/// What to do when storing one paper fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnPaperError {
    Abort,
    Skip,
}

/// Store each paper in order, printing what was written. Returns the titles
/// of papers skipped under [`OnPaperError::Skip`] with their errors.
pub(crate) async fn store_papers(
    store: &PaperStore<'_>,
    papers: &[PaperMetadata],
    source: PaperSource,
    on_error: OnPaperError,
) -> Result<Vec<(String, String)>> {
    print_step(&format!("Storing {} papers", papers.len()));
    let mut skipped = Vec::new();
    for paper in papers {
        let title = paper.title.as_deref().unwrap_or("<untitled>");
        let summary = match store.store_paper(paper, source).await {
            Ok((_, summary)) => summary,
            Err(e) if on_error == OnPaperError::Skip => {
                warn!("Skipping paper {:?}: {}", title, e);
                print_warning(&format!("{title} not stored: {e}"));
                skipped.push((title.to_string(), e.to_string()));
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        print_paper(paper);
        if summary.duplicate {
            print_warning("already stored under the same DOI, skipped");
            continue;
        }
        println!(
            "    stored: {} new authors, {} reused, {} paper citations, {} external references",
            summary.authors_created,
            summary.authors_reused,
            summary.paper_citations,
            summary.external_references
        );
    }
    Ok(skipped)
}

/// Counts plus the fixed battery of read queries over the paper graph
pub(crate) async fn run_paper_queries(ops: &GraphOps<'_>) -> Result<()> {
    print_step("Graph summary");
    let papers = ops.count_nodes(&Label::new(PAPER)?).await?;
    let authors = ops.count_nodes(&Label::new(AUTHOR)?).await?;
    let references = ops.count_nodes(&Label::new(REFERENCE)?).await?;
    let authored = ops.count_relationships(&RelType::new(AUTHORED)?).await?;
    let cites = ops.count_relationships(&RelType::new(CITES)?).await?;
    print_success(&format!(
        "{papers} papers, {authors} authors, {references} external references, \
         {authored} AUTHORED, {cites} CITES"
    ));

    let limit = to_properties(json!({ "limit": TOP_N }));

    print_step("Running queries");
    let rows = ops.run_cypher_query(queries::MOST_PROLIFIC_AUTHORS, &limit).await?;
    print_rows("Most prolific authors", &rows, &["author", "papers"]);

    let rows = ops.run_cypher_query(queries::MOST_CITED_PAPERS, &limit).await?;
    print_rows("Most cited papers", &rows, &["title", "citations"]);

    let rows = ops
        .run_cypher_query(queries::PAPERS_PER_YEAR, &Properties::new())
        .await?;
    print_rows("Papers per year", &rows, &["year", "papers"]);

    let rows = ops.run_cypher_query(queries::CO_AUTHOR_PAIRS, &limit).await?;
    print_rows("Co-author pairs", &rows, &["first", "second", "shared"]);

    let rows = ops
        .run_cypher_query(queries::REFERENCES_BY_PAPER, &Properties::new())
        .await?;
    print_rows("References by paper", &rows, &["title", "cited"]);

    Ok(())
}
