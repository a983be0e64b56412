use crate::error::{FileError, IndexerError, Result};
use crate::resolver::ImportResolver;
use crate::scanner::SourceLocator;
use crate::stats::{FileReport, RunSummary};
use repograph_extractor::{extract_facts, ParserConfig, SourceParser, SOURCE_EXTENSIONS};
use repograph_graph::{GraphStore, GraphWriter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Inputs of one ingestion run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub respect_gitignore: bool,
    pub parser: ParserConfig,
}

impl PipelineConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: SOURCE_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect(),
            respect_gitignore: true,
            parser: ParserConfig::default(),
        }
    }
}

/// Where a run currently is. The per-file stages repeat for every file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Listing,
    Parsing,
    Extracting,
    Resolving,
    Writing,
    Summarizing,
    Done,
    Aborted,
}

/// Sequential repository ingestion: one file is fully written before the
/// next is read. A failing file is reported and skipped.
pub struct Pipeline {
    config: PipelineConfig,
    state: RunState,
    stop: Option<Arc<AtomicBool>>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            state: RunState::Idle,
            stop: None,
        }
    }

    /// Checked between files; once set the run ends with `stopped = true`
    #[must_use]
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub const fn state(&self) -> RunState {
        self.state
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn abort(&mut self, err: IndexerError) -> IndexerError {
        self.state = RunState::Aborted;
        log::warn!("Run aborted: {err}");
        err
    }

    pub async fn run(&mut self, store: &mut dyn GraphStore) -> Result<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary::new();

        self.state = RunState::Listing;
        let locator = match SourceLocator::new(&self.config.root, &self.config.extensions) {
            Ok(locator) => locator.respect_gitignore(self.config.respect_gitignore),
            Err(e) => return Err(self.abort(e)),
        };

        if let Err(e) = store.verify_connectivity().await {
            return Err(self.abort(IndexerError::Connection(e.to_string())));
        }

        log::info!(
            "Ingesting {} into {}",
            locator.root().display(),
            store.name()
        );

        let resolver = ImportResolver::new(locator.root());
        let mut parser = SourceParser::new(self.config.parser);

        for path in locator.files() {
            if self.stop_requested() {
                log::warn!("Stop requested, ending run after {} files", summary.reports.len());
                summary.stopped = true;
                break;
            }

            let rel_path = locator.relative_path(&path);
            match self
                .process_file(&mut parser, &resolver, store, &path, &rel_path)
                .await
            {
                Ok(report) => summary.record(report),
                Err(e) => {
                    log::warn!("Failed to ingest {rel_path} ({}): {e}", e.stage());
                    summary.record(FileReport::failed(rel_path, &e));
                }
            }
        }

        self.state = RunState::Summarizing;
        summary.graph = match store.counts().await {
            Ok(counts) => Some(counts),
            Err(e) => {
                log::warn!("Could not read graph totals: {e}");
                None
            }
        };
        summary.elapsed = start.elapsed();

        self.state = RunState::Done;
        log::info!("Ingestion completed: {summary}");
        Ok(summary)
    }

    async fn process_file(
        &mut self,
        parser: &mut SourceParser,
        resolver: &ImportResolver,
        store: &mut dyn GraphStore,
        path: &Path,
        rel_path: &str,
    ) -> std::result::Result<FileReport, FileError> {
        self.state = RunState::Parsing;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| FileError::Read {
                path: rel_path.to_string(),
                source,
            })?;
        let source = match String::from_utf8(bytes) {
            Ok(source) => source,
            Err(e) => {
                log::debug!("{rel_path}: not valid UTF-8, replacing undecodable bytes");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        let parsed = parser.parse(&source, rel_path)?;

        self.state = RunState::Extracting;
        let facts = extract_facts(&parsed, rel_path);

        self.state = RunState::Resolving;
        let mut resolved: Vec<String> = Vec::new();
        for import in &facts.imports {
            if let Some(target) = resolver.resolve(rel_path, &import.specifier, facts.language) {
                if !resolved.contains(&target) {
                    resolved.push(target);
                }
            }
        }

        self.state = RunState::Writing;
        GraphWriter::write(store, &facts, &resolved)
            .await
            .map_err(|source| FileError::Write {
                path: rel_path.to_string(),
                source,
            })?;

        let counts = facts.counts();
        log::info!(
            "Ingested {rel_path}: {counts}, resolved_imports={}",
            resolved.len()
        );
        Ok(FileReport::ingested(rel_path, counts, resolved.len()))
    }
}
