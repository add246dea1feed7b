//! Session scope management
//!
//! A [`GraphSession`] owns the driver's connection pool. It is constructed
//! explicitly, handed by reference to every operation and closed when the
//! caller is done. [`with_session`] wraps that lifecycle so the session is
//! released on every exit path.

use log::{debug, info};
use neo4rs::{query, ConfigBuilder, Database, Graph};
use std::future::Future;
use std::pin::Pin;

use crate::config::Neo4jConfig;
use crate::error::GraphError;
use crate::neo4j::operations::GraphOps;

const FETCH_SIZE: usize = 500;
const MAX_CONNECTIONS: usize = 4;

/// Explicitly constructed handle to one Neo4j database
pub struct GraphSession {
    graph: Graph,
    database: String,
}

impl GraphSession {
    /// Connect to the database described by `config`
    pub async fn open(config: &Neo4jConfig) -> Result<Self, GraphError> {
        let graph_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(Database::from(config.database.as_str()))
            .fetch_size(FETCH_SIZE)
            .max_connections(MAX_CONNECTIONS)
            .build()?;

        let graph = Graph::connect(graph_config).await?;
        info!("Opened Neo4j session on {} (database {})", config.uri, config.database);

        Ok(Self {
            graph,
            database: config.database.clone(),
        })
    }

    /// Round-trip a trivial query to confirm the server is reachable
    pub async fn ping(&self) -> Result<(), GraphError> {
        let mut result = self.graph.execute(query("RETURN 1 AS ping")).await?;
        let row = result
            .next()
            .await?
            .ok_or_else(|| GraphError::UnexpectedResult("ping returned no rows".to_string()))?;
        let ping: i64 = row.get("ping")?;
        if ping != 1 {
            return Err(GraphError::UnexpectedResult(format!("ping returned {ping}")));
        }
        Ok(())
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// CRUD helpers bound to this session
    pub fn ops(&self) -> GraphOps<'_> {
        GraphOps::new(&self.graph)
    }

    /// Release the session. Pooled connections are closed when the last
    /// handle to the pool is dropped.
    pub fn close(self) {
        debug!("Closing Neo4j session on database {}", self.database);
        drop(self.graph);
    }
}

/// Boxed future returned by operations run under [`with_session`]
pub type SessionFuture<'s, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 's>>;

/// Open a session, run `operation` against it and close it on every exit
/// path. Connection failures are returned before `operation` runs.
pub async fn with_session<T, E, F>(config: &Neo4jConfig, operation: F) -> Result<T, E>
where
    E: From<GraphError>,
    F: for<'s> FnOnce(&'s GraphSession) -> SessionFuture<'s, T, E>,
{
    let session = GraphSession::open(config).await?;
    let outcome = operation(&session).await;
    session.close();
    outcome
}
