//! # Repograph Indexer
//!
//! Walks a repository and ingests every supported source file into a
//! property graph.
//!
//! ## Pipeline
//!
//! ```text
//! Repository root
//!     │
//!     ├──> SourceLocator (.gitignore aware, sorted)
//!     │      └─> source files
//!     │
//!     ├──> SourceParser + extract_facts
//!     │      └─> FileFacts
//!     │
//!     ├──> ImportResolver
//!     │      └─> in-repository import targets
//!     │
//!     └──> GraphWriter -> GraphStore
//!            └─> RunSummary
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use repograph_graph::MemoryGraphStore;
//! use repograph_indexer::{Pipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = MemoryGraphStore::new();
//!     let mut pipeline = Pipeline::new(PipelineConfig::new("/path/to/repo"));
//!     let summary = pipeline.run(&mut store).await?;
//!
//!     println!("Ingested {} files", summary.files_processed);
//!     Ok(())
//! }
//! ```

mod error;
mod pipeline;
mod resolver;
mod scanner;
mod stats;

pub use error::{FileError, FileStage, IndexerError, Result};
pub use pipeline::{Pipeline, PipelineConfig, RunState};
pub use resolver::ImportResolver;
pub use scanner::SourceLocator;
pub use stats::{FileOutcome, FileReport, RunSummary};
