use anyhow::{bail, Result};
use clap::ArgMatches;
use papergraph_core::neo4j::{with_session, GraphSession, Label, RelType};
use papergraph_core::{AppConfig, GraphError, Properties};
use serde_json::json;

use super::CommandHandler;
use crate::response_formatter::{
    print_banner, print_node, print_relationship, print_rows, print_step, print_success,
    print_warning,
};
use crate::sample_data::{to_properties, ACQUAINTANCES, COMPANIES, EMPLOYMENTS, PEOPLE};

/// People and companies: node creation, relationships, lookups and queries
pub struct BasicCommand;

impl BasicCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BasicCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for BasicCommand {
    async fn execute(&self, _matches: &ArgMatches, config: &AppConfig) -> Result<()> {
        print_banner("Basic graph demo");
        with_session(&config.neo4j, |session| Box::pin(run_basic(session))).await
    }
}

fn by_name(name: &str) -> Properties {
    to_properties(json!({ "name": name }))
}

async fn run_basic(session: &GraphSession) -> Result<()> {
    let ops = session.ops();
    let person = Label::new("Person")?;
    let company = Label::new("Company")?;
    let works_at = RelType::new("WORKS_AT")?;
    let knows = RelType::new("KNOWS")?;

    print_step("Clearing previous demo data");
    for label in [&person, &company] {
        let removed = ops.clear_label(label).await?;
        print_success(&format!("removed {removed} :{label} nodes"));
    }

    print_step("Creating people");
    for p in PEOPLE {
        print_node(&ops.create_node(&person, &p.properties()).await?);
    }

    print_step("Creating companies");
    for c in COMPANIES {
        print_node(&ops.create_node(&company, &c.properties()).await?);
    }

    print_step("Linking employees to companies");
    for (name, employer, since, role) in EMPLOYMENTS {
        let rel = ops
            .create_relationship(
                &person,
                &by_name(name),
                &company,
                &by_name(employer),
                &works_at,
                &to_properties(json!({ "since": since, "role": role })),
            )
            .await?;
        print_relationship(name, &rel, employer);
    }

    print_step("Linking acquaintances");
    for (name, friend, since) in ACQUAINTANCES {
        let rel = ops
            .create_relationship(
                &person,
                &by_name(name),
                &person,
                &by_name(friend),
                &knows,
                &to_properties(json!({ "since": since })),
            )
            .await?;
        print_relationship(name, &rel, friend);
    }

    print_step("Finding people in London");
    let londoners = ops
        .find_nodes(&person, &to_properties(json!({ "city": "London" })))
        .await?;
    print_success(&format!("{} found", londoners.len()));
    for node in &londoners {
        print_node(node);
    }

    print_step("Finding technology companies");
    for node in ops
        .find_nodes(&company, &to_properties(json!({ "industry": "Technology" })))
        .await?
    {
        print_node(&node);
    }

    print_step("Running queries");
    let rows = ops
        .run_cypher_query(
            "MATCH (p:Person)-[w:WORKS_AT]->(c:Company) \
             RETURN p.name AS person, c.name AS company, w.role AS role, w.since AS since \
             ORDER BY person",
            &Properties::new(),
        )
        .await?;
    print_rows("Who works where", &rows, &["person", "company", "role", "since"]);

    let rows = ops
        .run_cypher_query(
            "MATCH (a:Person)-[:WORKS_AT]->(c:Company)<-[:WORKS_AT]-(b:Person) \
             WHERE a.name < b.name \
             RETURN a.name AS first, b.name AS second, c.name AS company",
            &Properties::new(),
        )
        .await?;
    print_rows("Colleagues", &rows, &["first", "second", "company"]);

    let rows = ops
        .run_cypher_query(
            "MATCH (p:Person) WHERE p.age > $min_age \
             RETURN p.name AS name, p.age AS age ORDER BY age DESC",
            &to_properties(json!({ "min_age": 29 })),
        )
        .await?;
    print_rows("People older than 29", &rows, &["name", "age"]);

    let rows = ops
        .run_cypher_query(
            "MATCH (:Person {name: $name})-[k:KNOWS]->(f:Person) \
             RETURN f.name AS friend, f.city AS city, k.since AS since ORDER BY friend",
            &to_properties(json!({ "name": "Alice Johnson" })),
        )
        .await?;
    print_rows("Alice's acquaintances", &rows, &["friend", "city", "since"]);

    print_step("Relationship endpoints must match exactly one node");
    for (description, from) in [
        ("ambiguous source", json!({ "city": "London" })),
        ("missing source", json!({ "name": "Nobody" })),
    ] {
        match ops
            .create_relationship(
                &person,
                &to_properties(from),
                &company,
                &by_name("Acme Corp"),
                &works_at,
                &Properties::new(),
            )
            .await
        {
            Err(e @ GraphError::Cardinality { .. }) => {
                print_warning(&format!("{description} rejected: {e}"))
            }
            Err(e) => return Err(e.into()),
            Ok(rel) => bail!("{description} unexpectedly created relationship {}", rel.id),
        }
    }

    let people = ops.count_nodes(&person).await?;
    let companies = ops.count_nodes(&company).await?;
    let employments = ops.count_relationships(&works_at).await?;
    let acquaintances = ops.count_relationships(&knows).await?;
    print_success(&format!(
        "{people} people, {companies} companies, {employments} WORKS_AT, {acquaintances} KNOWS"
    ));

    Ok(())
}
