//! # Repograph Graph
//!
//! Idempotent writes of extracted source facts into a property graph.
//!
//! ## Architecture
//!
//! ```text
//! FileFacts + resolved imports
//!     │
//!     ├──> GraphWriter::plan
//!     │      └─> WriteBatch (ordered, de-duplicated UpsertOps)
//!     │
//!     └──> GraphStore (async port)
//!            ├─ MemoryGraphStore (petgraph, dry runs and exports)
//!            └─ Neo4jHttpStore   (one transaction per batch)
//! ```
//!
//! Schema: `File {path}`, `Function {name, file}`, `Class {name, file}`
//! with `DEFINED_IN`, `IMPORTS`, `CALLS`, `USED_IN` and `EXTENDS`.

mod batch;
mod error;
mod memory;
mod neo4j;
mod store;
mod types;
mod writer;

pub use batch::{DefinitionKind, UpsertOp, WriteBatch, UNRESOLVED_FILE};
pub use error::{GraphError, Result};
pub use memory::{GraphSnapshot, MemoryGraphStore, SnapshotNode, SnapshotRelationship};
pub use neo4j::{cypher, http_base_url, Neo4jConfig, Neo4jHttpStore, Statement};
pub use store::GraphStore;
pub use types::{GraphCounts, NodeKey, NodeLabel, RelationshipType};
pub use writer::GraphWriter;
