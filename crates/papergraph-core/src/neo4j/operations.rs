//! Graph CRUD helpers
//!
//! Labels and relationship types are validated identifiers; every value is
//! sent as a bound parameter. Property filters use dynamic property access
//! (`n[key]`) over a map parameter, so property names never reach the query
//! text either.

use log::{debug, info, warn};
use neo4rs::{query, Graph, Query, Row, Txn};
use serde_json::Value;

use crate::error::{Endpoint, GraphError};
use crate::neo4j::identifier::{quoted_property_key, Label, RelType};
use crate::neo4j::properties::{filter_param, from_json, to_bolt, write_param};
use crate::types::{NodeRecord, Properties, RelationshipRecord};

/// CRUD helpers over a borrowed connection pool
pub struct GraphOps<'a> {
    graph: &'a Graph,
}

/// Cypher predicate matching `var` against every key of map parameter
/// `param`. A null filter value matches a missing property.
fn property_filter(var: &str, param: &str) -> String {
    format!(
        "all(key IN keys(${param}) WHERE CASE WHEN ${param}[key] IS NULL \
         THEN {var}[key] IS NULL ELSE {var}[key] = ${param}[key] END)"
    )
}

fn node_projection(var: &str) -> String {
    format!("elementId({var}) AS id, labels({var}) AS labels, properties({var}) AS properties")
}

fn node_from_row(row: &Row) -> Result<NodeRecord, GraphError> {
    Ok(NodeRecord {
        id: row.get("id")?,
        labels: row.get("labels")?,
        properties: from_json(row.get::<Value>("properties")?)?,
    })
}

fn relationship_from_row(row: &Row) -> Result<RelationshipRecord, GraphError> {
    Ok(RelationshipRecord {
        id: row.get("id")?,
        rel_type: row.get("rel_type")?,
        start_id: row.get("start_id")?,
        end_id: row.get("end_id")?,
        properties: from_json(row.get::<Value>("properties")?)?,
    })
}

pub(crate) fn create_node_query(label: &Label) -> String {
    format!(
        "CREATE (n:{}) SET n = $props RETURN {}",
        label.quoted(),
        node_projection("n")
    )
}

pub(crate) fn find_nodes_query(label: &Label) -> String {
    format!(
        "MATCH (n:{}) WHERE {} RETURN {}",
        label.quoted(),
        property_filter("n", "props"),
        node_projection("n")
    )
}

pub(crate) fn count_matches_query(label: &Label) -> String {
    format!(
        "MATCH (n:{}) WHERE {} RETURN count(n) AS matched",
        label.quoted(),
        property_filter("n", "props")
    )
}

pub(crate) fn create_relationship_query(from: &Label, to: &Label, rel_type: &RelType) -> String {
    format!(
        "MATCH (a:{from}) WHERE {from_filter} \
         MATCH (b:{to}) WHERE {to_filter} \
         CREATE (a)-[r:{rel}]->(b) SET r = $rel_props \
         RETURN elementId(r) AS id, type(r) AS rel_type, elementId(a) AS start_id, \
         elementId(b) AS end_id, properties(r) AS properties",
        from = from.quoted(),
        from_filter = property_filter("a", "from_props"),
        to = to.quoted(),
        to_filter = property_filter("b", "to_props"),
        rel = rel_type.quoted(),
    )
}

impl<'a> GraphOps<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    async fn fetch_rows(&self, q: Query) -> Result<Vec<Row>, GraphError> {
        let mut result = self.graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    async fn fetch_count(&self, q: Query, column: &str) -> Result<i64, GraphError> {
        let rows = self.fetch_rows(q).await?;
        let row = rows
            .first()
            .ok_or_else(|| GraphError::UnexpectedResult("count query returned no rows".to_string()))?;
        Ok(row.get::<i64>(column)?)
    }

    /// Insert one node with `label` and `properties`. Null values are
    /// rejected with [`GraphError::InvalidProperty`].
    pub async fn create_node(
        &self,
        label: &Label,
        properties: &Properties,
    ) -> Result<NodeRecord, GraphError> {
        let cypher = create_node_query(label);
        debug!("Executing node creation query: {}", cypher);

        let rows = self
            .fetch_rows(query(&cypher).param("props", write_param(properties)?))
            .await?;
        let row = rows
            .first()
            .ok_or_else(|| GraphError::UnexpectedResult(format!("no node returned for :{label}")))?;
        node_from_row(row)
    }

    /// All nodes with `label` whose properties equal every entry of
    /// `properties`. An empty filter matches every node with the label.
    pub async fn find_nodes(
        &self,
        label: &Label,
        properties: &Properties,
    ) -> Result<Vec<NodeRecord>, GraphError> {
        let cypher = find_nodes_query(label);
        debug!("Executing node lookup query: {}", cypher);

        let rows = self
            .fetch_rows(query(&cypher).param("props", filter_param(properties)?))
            .await?;
        rows.iter().map(node_from_row).collect()
    }

    /// Create a directed `rel_type` edge between the single node matching
    /// the `from` filter and the single node matching the `to` filter.
    ///
    /// Both sides are counted inside the same transaction as the write. If
    /// either side matches zero or several nodes the transaction is rolled
    /// back and [`GraphError::Cardinality`] is returned.
    pub async fn create_relationship(
        &self,
        from_label: &Label,
        from_props: &Properties,
        to_label: &Label,
        to_props: &Properties,
        rel_type: &RelType,
        rel_props: &Properties,
    ) -> Result<RelationshipRecord, GraphError> {
        let from_param = filter_param(from_props)?;
        let to_param = filter_param(to_props)?;
        let rel_param = write_param(rel_props)?;

        let mut txn = self.graph.start_txn().await?;

        let attempt = async {
            for (endpoint, label, param) in [
                (Endpoint::From, from_label, from_param.clone()),
                (Endpoint::To, to_label, to_param.clone()),
            ] {
                let counted = query(&count_matches_query(label)).param("props", param);
                let rows = fetch_rows_in_txn(&mut txn, counted).await?;
                let matched = match rows.first() {
                    Some(row) => row.get::<i64>("matched")?,
                    None => 0,
                };
                if matched != 1 {
                    return Err(GraphError::Cardinality {
                        endpoint,
                        label: label.to_string(),
                        matched,
                    });
                }
            }

            let cypher = create_relationship_query(from_label, to_label, rel_type);
            debug!("Executing relationship creation query: {}", cypher);
            let create = query(&cypher)
                .param("from_props", from_param.clone())
                .param("to_props", to_param.clone())
                .param("rel_props", rel_param.clone());
            let rows = fetch_rows_in_txn(&mut txn, create).await?;
            match rows.as_slice() {
                [row] => relationship_from_row(row),
                other => Err(GraphError::UnexpectedResult(format!(
                    "relationship creation returned {} rows",
                    other.len()
                ))),
            }
        }
        .await;

        match attempt {
            Ok(record) => {
                txn.commit().await?;
                Ok(record)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("Rollback after failed relationship creation failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Run an arbitrary query with bound parameters. Each row is returned as
    /// a JSON object keyed by column name.
    pub async fn run_cypher_query(
        &self,
        cypher: &str,
        params: &Properties,
    ) -> Result<Vec<Value>, GraphError> {
        debug!("Executing Cypher query: {}", cypher);

        let mut q = query(cypher);
        for (key, value) in params {
            q = q.param(key, to_bolt(value)?);
        }
        let rows = self.fetch_rows(q).await?;
        rows.iter()
            .map(|row| row.to::<Value>().map_err(GraphError::from))
            .collect()
    }

    /// Detach-delete every node with `label`; returns how many were removed
    pub async fn clear_label(&self, label: &Label) -> Result<i64, GraphError> {
        let cypher = format!(
            "MATCH (n:{}) DETACH DELETE n RETURN count(*) AS removed",
            label.quoted()
        );
        let removed = self.fetch_count(query(&cypher), "removed").await?;
        info!("Cleared {} :{} nodes", removed, label);
        Ok(removed)
    }

    pub async fn count_nodes(&self, label: &Label) -> Result<i64, GraphError> {
        let cypher = format!("MATCH (n:{}) RETURN count(n) AS count", label.quoted());
        self.fetch_count(query(&cypher), "count").await
    }

    pub async fn count_relationships(&self, rel_type: &RelType) -> Result<i64, GraphError> {
        let cypher = format!("MATCH ()-[r:{}]->() RETURN count(r) AS count", rel_type.quoted());
        self.fetch_count(query(&cypher), "count").await
    }

    /// `CREATE INDEX IF NOT EXISTS` on one property of `label`
    pub async fn ensure_index(&self, label: &Label, property: &str) -> Result<(), GraphError> {
        let cypher = format!(
            "CREATE INDEX IF NOT EXISTS FOR (n:{}) ON (n.{})",
            label.quoted(),
            quoted_property_key(property)?
        );
        debug!("Executing index creation query: {}", cypher);
        self.graph.run(query(&cypher)).await?;
        Ok(())
    }
}

async fn fetch_rows_in_txn(txn: &mut Txn, q: Query) -> Result<Vec<Row>, GraphError> {
    let mut stream = txn.execute(q).await?;
    let mut rows = Vec::new();
    while let Some(row) = stream.next(txn.handle()).await? {
        rows.push(row);
    }
    Ok(rows)
}
