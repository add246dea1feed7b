//! Loads the sample papers into a live Neo4j server. Run with
//! `NEO4J_PASSWORD=... cargo test -- --ignored`. Wipes the paper labels.

use papergraph_cli::sample_data::sample_papers;
use papergraph_core::neo4j::with_session;
use papergraph_core::papers::{queries, PaperSource, PaperStore};
use papergraph_core::{AppConfig, GraphError};
use serde_json::{json, Value};

#[tokio::test]
#[ignore]
async fn test_most_prolific_authors_are_ordered_by_paper_count() {
    let config = AppConfig::from_env().expect("NEO4J_PASSWORD must be set");

    let rows = with_session(&config.neo4j, |session| {
        Box::pin(async move {
            let ops = session.ops();
            let store = PaperStore::new(&ops)?;
            store.clear().await?;
            for paper in sample_papers() {
                store.store_paper(&paper, PaperSource::Sample).await?;
            }
            let params = json!({ "limit": 5 }).as_object().cloned().unwrap_or_default();
            let rows = ops
                .run_cypher_query(queries::MOST_PROLIFIC_AUTHORS, &params)
                .await?;
            store.clear().await?;
            Ok::<Vec<Value>, GraphError>(rows)
        })
    })
    .await
    .unwrap();

    assert_eq!(
        rows,
        vec![
            json!({ "author": "Alice Chen", "papers": 3 }),
            json!({ "author": "Bob Martinez", "papers": 2 }),
            json!({ "author": "Carol Singh", "papers": 1 }),
            json!({ "author": "David Okafor", "papers": 1 }),
        ]
    );
}
