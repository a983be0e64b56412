//! Full ingestion runs over fixture repositories

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use repograph_graph::{
    GraphCounts, GraphError, GraphStore, MemoryGraphStore, NodeKey, RelationshipType, WriteBatch,
};
use repograph_indexer::{
    FileOutcome, FileStage, IndexerError, Pipeline, PipelineConfig, RunState,
};
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "a.js", "function foo(){ bar(); } function baz(){ foo(); }");
    write(root, "b.ts", "class B extends A {}");
    write(root, "c.js", "import d from './d';\nimport React from 'react';\nd();\n");
    write(root, "d.js", "export default function d() { return 1; }");
    write(root, "notes.js", "// nothing but a comment\n");
    write(root, "bad.ts", "class {");
    write(root, "README.md", "# not source");
    write(root, "pkg/__init__.py", "");
    write(
        root,
        "pkg/service.py",
        "from .models import User\n\nclass Service(Base):\n    def run(self):\n        return User()\n",
    );
    write(root, "pkg/models.py", "class User:\n    pass\n");
    dir
}

async fn ingest(root: &Path, store: &mut MemoryGraphStore) -> repograph_indexer::RunSummary {
    let mut pipeline = Pipeline::new(PipelineConfig::new(root));
    let summary = pipeline.run(store).await.expect("run");
    assert_eq!(pipeline.state(), RunState::Done);
    summary
}

#[tokio::test]
async fn ingests_fixture_repository() {
    let repo = fixture();
    let mut store = MemoryGraphStore::new();
    let summary = ingest(repo.path(), &mut store).await;

    assert_eq!(summary.files_processed, 8);
    assert_eq!(summary.files_failed, 1);
    assert!(!summary.stopped);

    assert!(store.has_relationship(
        &NodeKey::function("baz", "a.js"),
        RelationshipType::Calls,
        &NodeKey::function("foo", "a.js"),
    ));
    assert!(store.has_relationship(
        &NodeKey::class("B", "b.ts"),
        RelationshipType::Extends,
        &NodeKey::class("A", ""),
    ));
    assert_eq!(
        store.relationships(RelationshipType::Imports),
        vec![
            (NodeKey::file("c.js"), NodeKey::file("d.js")),
            (NodeKey::file("pkg/service.py"), NodeKey::file("pkg/models.py")),
        ]
    );
    assert!(store.contains_node(&NodeKey::file("notes.js")));
    assert!(!store.contains_node(&NodeKey::file("README.md")));

    let c = summary.report("c.js").unwrap();
    match &c.outcome {
        FileOutcome::Ingested {
            counts,
            resolved_imports,
        } => {
            assert_eq!(counts.imports, 2);
            assert_eq!(*resolved_imports, 1);
        }
        FileOutcome::Failed { .. } => panic!("c.js should be ingested"),
    }

    let graph = summary.graph.expect("memory store reports counts");
    assert_eq!(graph.imports, 2);
    assert_eq!(graph.files, 8);
}

#[tokio::test]
async fn syntax_error_fails_only_that_file() {
    let repo = fixture();
    let mut store = MemoryGraphStore::new();
    let summary = ingest(repo.path(), &mut store).await;

    let failures: Vec<_> = summary.failures().map(|r| r.path.as_str()).collect();
    assert_eq!(failures, vec!["bad.ts"]);
    assert!(matches!(
        summary.report("bad.ts").unwrap().outcome,
        FileOutcome::Failed {
            stage: FileStage::Parsing,
            ..
        }
    ));
    assert!(!store.contains_node(&NodeKey::file("bad.ts")));
}

#[tokio::test]
async fn tolerant_parsing_ingests_broken_files() {
    let repo = fixture();
    let mut config = PipelineConfig::new(repo.path());
    config.parser.tolerate_syntax_errors = true;

    let mut store = MemoryGraphStore::new();
    let summary = Pipeline::new(config).run(&mut store).await.unwrap();
    assert_eq!(summary.files_failed, 0);
    assert!(store.contains_node(&NodeKey::file("bad.ts")));
}

#[tokio::test]
async fn second_run_leaves_graph_unchanged() {
    let repo = fixture();
    let mut store = MemoryGraphStore::new();
    ingest(repo.path(), &mut store).await;
    let first = store.snapshot();

    ingest(repo.path(), &mut store).await;
    assert_eq!(store.snapshot(), first);
}

#[tokio::test]
async fn missing_root_aborts() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = Pipeline::new(PipelineConfig::new(dir.path().join("repo")));
    let mut store = MemoryGraphStore::new();

    let err = pipeline.run(&mut store).await.unwrap_err();
    assert!(matches!(err, IndexerError::RootNotFound(_)));
    assert_eq!(pipeline.state(), RunState::Aborted);
    assert_eq!(store.batches_applied(), 0);
}

#[tokio::test]
async fn empty_root_is_an_empty_run() {
    let dir = TempDir::new().unwrap();
    let mut store = MemoryGraphStore::new();
    let summary = ingest(dir.path(), &mut store).await;

    assert_eq!(summary.files_processed, 0);
    assert_eq!(summary.files_failed, 0);
    assert!(summary.reports.is_empty());
    assert_eq!(store.node_count(), 0);
}

#[tokio::test]
async fn python_from_imports_reach_submodules() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "pkg/models.py", "class User:\n    pass\n");
    write(root, "pkg/helpers.py", "def helper():\n    pass\n");
    write(root, "pkg/service.py", "from . import helpers\n\nhelpers.helper()\n");
    write(root, "main.py", "from pkg import models\n\nmodels.User()\n");

    let mut store = MemoryGraphStore::new();
    let summary = ingest(root, &mut store).await;
    assert_eq!(summary.files_failed, 0);
    assert_eq!(
        store.relationships(RelationshipType::Imports),
        vec![
            (NodeKey::file("main.py"), NodeKey::file("pkg/models.py")),
            (NodeKey::file("pkg/service.py"), NodeKey::file("pkg/helpers.py")),
        ]
    );
}

#[tokio::test]
async fn non_utf8_source_is_decoded_lossily() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("legacy.js"),
        b"// caf\xe9\nfunction legacy() { old(); }\n",
    )
    .unwrap();

    let mut store = MemoryGraphStore::new();
    let summary = ingest(dir.path(), &mut store).await;
    assert_eq!(summary.files_processed, 1);
    assert!(store.contains_node(&NodeKey::file("legacy.js")));
    assert!(store.contains_node(&NodeKey::function("legacy", "legacy.js")));
}

#[tokio::test]
async fn stop_flag_ends_run_between_files() {
    let repo = fixture();
    let stop = Arc::new(AtomicBool::new(true));
    let mut pipeline = Pipeline::new(PipelineConfig::new(repo.path())).with_stop_flag(stop);
    let mut store = MemoryGraphStore::new();

    let summary = pipeline.run(&mut store).await.unwrap();
    assert!(summary.stopped);
    assert!(summary.reports.is_empty());
    assert_eq!(store.node_count(), 0);
}

#[tokio::test]
async fn summary_serializes_per_file_status() {
    let repo = fixture();
    let mut store = MemoryGraphStore::new();
    let summary = ingest(repo.path(), &mut store).await;

    let json = serde_json::to_value(&summary).unwrap();
    let reports = json["reports"].as_array().unwrap();
    let bad = reports.iter().find(|r| r["path"] == "bad.ts").unwrap();
    assert_eq!(bad["status"], "failed");
    assert_eq!(bad["stage"], "parsing");
    let a = reports.iter().find(|r| r["path"] == "a.js").unwrap();
    assert_eq!(a["status"], "ingested");
    assert_eq!(a["counts"]["calls"], 2);
}

/// Memory store that refuses batches for one file or refuses to connect
struct FlakyStore {
    inner: MemoryGraphStore,
    reject: Option<&'static str>,
    offline: bool,
}

#[async_trait]
impl GraphStore for FlakyStore {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn verify_connectivity(&mut self) -> Result<(), GraphError> {
        if self.offline {
            return Err(GraphError::Connection("connection refused".to_string()));
        }
        Ok(())
    }

    async fn apply(&mut self, batch: &WriteBatch) -> Result<(), GraphError> {
        if self.reject == Some(batch.file.as_str()) {
            return Err(GraphError::Write("constraint violation".to_string()));
        }
        self.inner.apply(batch).await
    }

    async fn counts(&mut self) -> Result<GraphCounts, GraphError> {
        self.inner.counts().await
    }
}

#[tokio::test]
async fn write_failure_is_isolated() {
    let repo = fixture();
    let mut store = FlakyStore {
        inner: MemoryGraphStore::new(),
        reject: Some("c.js"),
        offline: false,
    };
    let summary = Pipeline::new(PipelineConfig::new(repo.path()))
        .run(&mut store)
        .await
        .unwrap();

    assert!(matches!(
        summary.report("c.js").unwrap().outcome,
        FileOutcome::Failed {
            stage: FileStage::Writing,
            ..
        }
    ));
    assert_eq!(summary.files_failed, 2);
    assert!(store.inner.contains_node(&NodeKey::file("d.js")));
    assert!(store.inner.relationships(RelationshipType::Imports).len() == 1);
}

#[tokio::test]
async fn unreachable_store_aborts_before_writing() {
    let repo = fixture();
    let mut store = FlakyStore {
        inner: MemoryGraphStore::new(),
        reject: None,
        offline: true,
    };
    let mut pipeline = Pipeline::new(PipelineConfig::new(repo.path()));

    let err = pipeline.run(&mut store).await.unwrap_err();
    assert!(matches!(err, IndexerError::Connection(_)));
    assert_eq!(pipeline.state(), RunState::Aborted);
    assert_eq!(store.inner.batches_applied(), 0);
}
