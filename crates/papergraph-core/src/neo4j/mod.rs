//! Neo4j access layer
//!
//! Session handling, validated identifiers, property conversion and the
//! CRUD helpers the demos are built from.

pub mod identifier;
pub mod operations;
pub mod properties;
pub mod session;

pub use identifier::{Label, RelType};
pub use operations::GraphOps;
pub use session::{with_session, GraphSession};
