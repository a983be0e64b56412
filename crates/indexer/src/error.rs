use repograph_extractor::ExtractorError;
use repograph_graph::GraphError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

/// Errors that abort a whole run
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Repository root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Graph store unavailable: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Stage of the per-file pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStage {
    Reading,
    Parsing,
    Writing,
}

impl std::fmt::Display for FileStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self {
            Self::Reading => "reading",
            Self::Parsing => "parsing",
            Self::Writing => "writing",
        };
        f.write_str(stage)
    }
}

/// Failure confined to one file; recorded in the summary, never fatal
#[derive(Error, Debug)]
pub enum FileError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ExtractorError),

    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: GraphError,
    },
}

impl FileError {
    pub const fn stage(&self) -> FileStage {
        match self {
            Self::Read { .. } => FileStage::Reading,
            Self::Parse(_) => FileStage::Parsing,
            Self::Write { .. } => FileStage::Writing,
        }
    }
}
