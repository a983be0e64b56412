use crate::error::{FileError, FileStage};
use repograph_extractor::FactCounts;
use repograph_graph::GraphCounts;
use serde::Serialize;
use std::time::Duration;

/// Outcome of one file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Ingested {
        counts: FactCounts,
        resolved_imports: usize,
    },
    Failed {
        stage: FileStage,
        error: String,
    },
}

impl FileReport {
    pub fn ingested(path: impl Into<String>, counts: FactCounts, resolved_imports: usize) -> Self {
        Self {
            path: path.into(),
            outcome: FileOutcome::Ingested {
                counts,
                resolved_imports,
            },
        }
    }

    pub fn failed(path: impl Into<String>, error: &FileError) -> Self {
        Self {
            path: path.into(),
            outcome: FileOutcome::Failed {
                stage: error.stage(),
                error: error.to_string(),
            },
        }
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self.outcome, FileOutcome::Failed { .. })
    }

    pub fn counts(&self) -> Option<FactCounts> {
        match self.outcome {
            FileOutcome::Ingested { counts, .. } => Some(counts),
            FileOutcome::Failed { .. } => None,
        }
    }
}

/// Aggregate result of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub files_processed: usize,
    pub files_failed: usize,
    pub reports: Vec<FileReport>,
    /// Store totals read after the last write
    pub graph: Option<GraphCounts>,
    #[serde(with = "millis")]
    pub elapsed: Duration,
    /// Set when the run was interrupted between files
    pub stopped: bool,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: FileReport) {
        if report.is_failed() {
            self.files_failed += 1;
        } else {
            self.files_processed += 1;
        }
        self.reports.push(report);
    }

    /// Sum of extracted facts over successful files
    pub fn fact_totals(&self) -> FactCounts {
        self.reports
            .iter()
            .filter_map(FileReport::counts)
            .fold(FactCounts::default(), |mut acc, c| {
                acc.functions += c.functions;
                acc.classes += c.classes;
                acc.imports += c.imports;
                acc.calls += c.calls;
                acc
            })
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.reports.iter().filter(|r| r.is_failed())
    }

    pub fn report(&self, path: &str) -> Option<&FileReport> {
        self.reports.iter().find(|r| r.path == path)
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let totals = self.fact_totals();
        write!(
            f,
            "Processed {} files ({} failed) in {:.2}s: {totals}",
            self.files_processed,
            self.files_failed,
            self.elapsed.as_secs_f64()
        )?;
        if self.stopped {
            write!(f, " [stopped early]")?;
        }
        if let Some(graph) = &self.graph {
            write!(f, "\nSummary: {graph}")?;
        }
        Ok(())
    }
}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}
