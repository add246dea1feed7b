//! Tests against a live Neo4j server. Run with
//! `NEO4J_PASSWORD=... cargo test -- --ignored`; `NEO4J_URI` defaults to
//! `bolt://localhost:7687`.

use papergraph_core::error::Endpoint;
use papergraph_core::neo4j::{with_session, GraphOps, GraphSession, Label, RelType};
use papergraph_core::papers::{queries, PaperSource, PaperStore, AUTHORED, CITES, PAPER};
use papergraph_core::{AppConfig, AuthorName, GraphError, Neo4jConfig, PaperMetadata, Properties};
use serde_json::{json, Value};

fn neo4j_config() -> Neo4jConfig {
    AppConfig::from_env()
        .expect("NEO4J_PASSWORD must be set for integration tests")
        .neo4j
}

fn props(value: Value) -> Properties {
    value.as_object().cloned().unwrap_or_default()
}

async fn open() -> GraphSession {
    GraphSession::open(&neo4j_config())
        .await
        .expect("Neo4j should be reachable")
}

#[tokio::test]
#[ignore]
async fn test_created_node_is_found_by_its_properties() {
    let session = open().await;
    let ops = session.ops();
    let label = Label::new("PgTestFind").unwrap();
    ops.clear_label(&label).await.unwrap();

    let properties = props(json!({
        "name": "Alice",
        "age": 30,
        "score": 1.5,
        "active": true,
        "tags": ["a", "b"],
    }));
    let created = ops.create_node(&label, &properties).await.unwrap();
    assert_eq!(created.properties, properties);
    assert!(created.labels.contains(&"PgTestFind".to_string()));

    let found = ops.find_nodes(&label, &properties).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, created.id);
    assert_eq!(found[0].properties, properties);

    let found = ops
        .find_nodes(&label, &props(json!({ "name": "Alice", "age": 30 })))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let none = ops
        .find_nodes(&label, &props(json!({ "name": "Alice", "age": 31 })))
        .await
        .unwrap();
    assert!(none.is_empty());

    let everything = ops.find_nodes(&label, &Properties::new()).await.unwrap();
    assert_eq!(everything.len(), 1);

    ops.clear_label(&label).await.unwrap();
    session.close();
}

#[tokio::test]
#[ignore]
async fn test_null_filter_matches_missing_property() {
    let session = open().await;
    let ops = session.ops();
    let label = Label::new("PgTestNull").unwrap();
    ops.clear_label(&label).await.unwrap();

    ops.create_node(&label, &props(json!({ "name": "with", "city": "Paris" })))
        .await
        .unwrap();
    ops.create_node(&label, &props(json!({ "name": "without" })))
        .await
        .unwrap();

    let found = ops
        .find_nodes(&label, &props(json!({ "city": null })))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get_str("name"), Some("without"));

    ops.clear_label(&label).await.unwrap();
    session.close();
}

#[tokio::test]
#[ignore]
async fn test_relationship_requires_exactly_one_node_per_side() {
    let session = open().await;
    let ops = session.ops();
    let person = Label::new("PgTestPerson").unwrap();
    let knows = RelType::new("PG_TEST_KNOWS").unwrap();
    ops.clear_label(&person).await.unwrap();

    for (name, city) in [("Ann", "Oslo"), ("Ben", "Oslo"), ("Cy", "Rome")] {
        ops.create_node(&person, &props(json!({ "name": name, "city": city })))
            .await
            .unwrap();
    }

    let created = ops
        .create_relationship(
            &person,
            &props(json!({ "name": "Ann" })),
            &person,
            &props(json!({ "name": "Cy" })),
            &knows,
            &props(json!({ "since": 2020 })),
        )
        .await
        .unwrap();
    assert_eq!(created.rel_type, "PG_TEST_KNOWS");
    assert_eq!(created.properties["since"], json!(2020));

    let ambiguous = ops
        .create_relationship(
            &person,
            &props(json!({ "city": "Oslo" })),
            &person,
            &props(json!({ "name": "Cy" })),
            &knows,
            &Properties::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        ambiguous,
        GraphError::Cardinality {
            endpoint: Endpoint::From,
            matched: 2,
            ..
        }
    ));

    let missing = ops
        .create_relationship(
            &person,
            &props(json!({ "name": "Ann" })),
            &person,
            &props(json!({ "name": "Nobody" })),
            &knows,
            &Properties::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        missing,
        GraphError::Cardinality {
            endpoint: Endpoint::To,
            matched: 0,
            ..
        }
    ));

    assert_eq!(ops.count_relationships(&knows).await.unwrap(), 1);

    ops.clear_label(&person).await.unwrap();
    session.close();
}

async fn populate_chain(ops: &GraphOps<'_>, label: &Label, next: &RelType) {
    for i in 0..3 {
        ops.create_node(label, &props(json!({ "n": i }))).await.unwrap();
    }
    for i in 0..2 {
        ops.create_relationship(
            label,
            &props(json!({ "n": i })),
            label,
            &props(json!({ "n": i + 1 })),
            next,
            &Properties::new(),
        )
        .await
        .unwrap();
    }
}

#[tokio::test]
#[ignore]
async fn test_clear_label_is_idempotent() {
    let session = open().await;
    let ops = session.ops();
    let label = Label::new("PgTestClear").unwrap();
    let next = RelType::new("PG_TEST_NEXT").unwrap();
    ops.clear_label(&label).await.unwrap();

    populate_chain(&ops, &label, &next).await;
    assert_eq!(ops.count_nodes(&label).await.unwrap(), 3);
    assert_eq!(ops.count_relationships(&next).await.unwrap(), 2);

    assert_eq!(ops.clear_label(&label).await.unwrap(), 3);
    assert_eq!(ops.clear_label(&label).await.unwrap(), 0);
    assert_eq!(ops.count_nodes(&label).await.unwrap(), 0);
    assert_eq!(ops.count_relationships(&next).await.unwrap(), 0);

    populate_chain(&ops, &label, &next).await;
    assert_eq!(ops.count_nodes(&label).await.unwrap(), 3);
    assert_eq!(ops.count_relationships(&next).await.unwrap(), 2);

    ops.clear_label(&label).await.unwrap();
    session.close();
}

#[tokio::test]
#[ignore]
async fn test_null_is_not_accepted_as_a_stored_value() {
    let session = open().await;
    let ops = session.ops();
    let label = Label::new("PgTestNullWrite").unwrap();
    ops.clear_label(&label).await.unwrap();

    let err = ops
        .create_node(&label, &props(json!({ "name": "Ada", "nickname": null })))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidProperty { ref key, .. } if key == "nickname"));
    assert_eq!(ops.count_nodes(&label).await.unwrap(), 0);
    session.close();
}

#[tokio::test]
#[ignore]
async fn test_cypher_rows_are_keyed_by_column() {
    let rows = with_session(&neo4j_config(), |session| {
        Box::pin(async move {
            session
                .ops()
                .run_cypher_query(
                    "UNWIND $values AS v RETURN v AS value, v * 2 AS doubled ORDER BY v",
                    &props(json!({ "values": [1, 2] })),
                )
                .await
        })
    })
    .await
    .unwrap();

    assert_eq!(
        rows,
        vec![
            json!({ "value": 1, "doubled": 2 }),
            json!({ "value": 2, "doubled": 4 }),
        ]
    );
}

fn paper(title: &str, year: i32, authors: &[(&str, &str)], references: &[&str]) -> PaperMetadata {
    PaperMetadata {
        title: Some(title.to_string()),
        doi: Some(format!("10.0000/pg-test.{}", title.to_lowercase())),
        year: Some(year),
        authors: authors.iter().map(|(f, s)| AuthorName::new(f, s)).collect(),
        references: references.iter().map(|r| r.to_string()).collect(),
        reference_count: references.len(),
        ..Default::default()
    }
}

/// Uses the real `Paper`/`Author`/`Reference` labels, so it wipes them.
#[tokio::test]
#[ignore]
async fn test_paper_store_links_authors_and_citations() {
    let session = open().await;
    let ops = session.ops();
    let store = PaperStore::new(&ops).unwrap();
    store.clear().await.unwrap();
    store.ensure_indexes().await.unwrap();

    let first = paper("First", 2018, &[("Ada", "One"), ("Bo", "Two")], &["Elsewhere"]);
    let second = paper("Second", 2020, &[("Ada", "One")], &["First", "Elsewhere"]);

    let (_, summary) = store.store_paper(&first, PaperSource::Sample).await.unwrap();
    assert_eq!(summary.authors_created, 2);
    assert_eq!(summary.external_references, 1);

    let (_, summary) = store.store_paper(&second, PaperSource::Sample).await.unwrap();
    assert_eq!(summary.authors_created, 0);
    assert_eq!(summary.authors_reused, 1);
    assert_eq!(summary.paper_citations, 1);
    assert_eq!(summary.external_references, 1);

    assert_eq!(ops.count_nodes(&Label::new(PAPER).unwrap()).await.unwrap(), 2);
    assert_eq!(ops.count_relationships(&RelType::new(AUTHORED).unwrap()).await.unwrap(), 3);
    assert_eq!(ops.count_relationships(&RelType::new(CITES).unwrap()).await.unwrap(), 3);

    let (again, summary) = store.store_paper(&second, PaperSource::Sample).await.unwrap();
    assert!(summary.duplicate);
    assert_eq!(again.get_str("title"), Some("Second"));
    assert_eq!(ops.count_nodes(&Label::new(PAPER).unwrap()).await.unwrap(), 2);
    assert_eq!(ops.count_relationships(&RelType::new(AUTHORED).unwrap()).await.unwrap(), 3);

    let rows = ops
        .run_cypher_query(queries::MOST_PROLIFIC_AUTHORS, &props(json!({ "limit": 5 })))
        .await
        .unwrap();
    assert_eq!(
        rows,
        vec![
            json!({ "author": "Ada One", "papers": 2 }),
            json!({ "author": "Bo Two", "papers": 1 }),
        ]
    );

    store.clear().await.unwrap();
    session.close();
}
