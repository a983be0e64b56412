//! Settings resolution: flags and environment, then `repograph.toml`,
//! then built-in defaults.

use crate::cli::IngestArgs;
use anyhow::{Context, Result};
use repograph_extractor::{ParserConfig, SOURCE_EXTENSIONS};
use repograph_graph::Neo4jConfig;
use repograph_indexer::PipelineConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "repograph.toml";
const DEFAULT_ROOT: &str = "repo";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub source: SourceSection,
    pub store: StoreSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSection {
    pub root: Option<PathBuf>,
    pub extensions: Option<Vec<String>>,
    pub respect_gitignore: Option<bool>,
    pub tolerate_syntax_errors: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub uri: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub max_retries: Option<u32>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration")
    }

    /// Load `explicit`, or `./repograph.toml` when it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE_NAME);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("in {}", path.display()))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Fully resolved ingestion settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub pipeline: PipelineConfig,
    pub store: Neo4jConfig,
}

impl Settings {
    /// `legacy_user` is the value of `NEO4J_USER`, consulted when no
    /// username came from flags or `NEO4J_USERNAME`
    pub fn resolve(args: &IngestArgs, file: FileConfig, legacy_user: Option<String>) -> Self {
        let FileConfig { source, store } = file;

        let root = args
            .root
            .clone()
            .or(source.root)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        let extensions = source
            .extensions
            .unwrap_or_else(|| SOURCE_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect());
        let respect_gitignore = !args.no_gitignore && source.respect_gitignore.unwrap_or(true);
        let tolerate_syntax_errors =
            args.tolerate_syntax_errors || source.tolerate_syntax_errors.unwrap_or(false);

        let mut pipeline = PipelineConfig::new(root);
        pipeline.extensions = extensions;
        pipeline.respect_gitignore = respect_gitignore;
        pipeline.parser = ParserConfig {
            tolerate_syntax_errors,
        };

        let defaults = Neo4jConfig::default();
        let store = Neo4jConfig {
            uri: args.uri.clone().or(store.uri).unwrap_or(defaults.uri),
            username: args
                .username
                .clone()
                .or(legacy_user)
                .or(store.username)
                .unwrap_or(defaults.username),
            password: args.password.clone().or(store.password).unwrap_or(defaults.password),
            database: args.database.clone().or(store.database).unwrap_or(defaults.database),
            max_retries: store.max_retries.unwrap_or(defaults.max_retries),
            timeout: store
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
        };

        Self { pipeline, store }
    }
}
