use crate::cli::IngestArgs;
use crate::config::{FileConfig, Settings};
use anyhow::{Context, Result};
use repograph_graph::{GraphStore, MemoryGraphStore, Neo4jHttpStore};
use repograph_indexer::{FileOutcome, Pipeline, RunSummary};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub async fn run_ingest(args: IngestArgs, config_path: Option<&Path>) -> Result<()> {
    let file = FileConfig::load(config_path)?;
    let legacy_user = std::env::var("NEO4J_USER").ok().filter(|u| !u.is_empty());
    let settings = Settings::resolve(&args, file, legacy_user);

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupted, finishing the current file");
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    let mut pipeline = Pipeline::new(settings.pipeline.clone()).with_stop_flag(stop);

    let summary = if args.dry_run {
        let mut store = MemoryGraphStore::new();
        let summary = run(&mut pipeline, &mut store).await?;
        if let Some(path) = &args.export {
            store
                .export_json(path)
                .with_context(|| format!("Failed to export graph to {}", path.display()))?;
        }
        summary
    } else {
        let mut store = Neo4jHttpStore::new(settings.store.clone())
            .context("Invalid Neo4j connection settings")?;
        run(&mut pipeline, &mut store).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

async fn run(pipeline: &mut Pipeline, store: &mut dyn GraphStore) -> Result<RunSummary> {
    let root = pipeline.config().root.display().to_string();
    pipeline
        .run(store)
        .await
        .with_context(|| format!("Ingestion of {root} failed"))
}

fn print_summary(summary: &RunSummary) {
    for failure in summary.failures() {
        if let FileOutcome::Failed { stage, error } = &failure.outcome {
            println!("FAILED {} ({stage}): {error}", failure.path);
        }
    }
    println!("{summary}");
}
