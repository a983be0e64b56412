//! Translates one file's facts into graph upserts

use crate::batch::{DefinitionKind, UpsertOp, WriteBatch};
use crate::error::Result;
use crate::store::GraphStore;
use repograph_extractor::FileFacts;

/// Plans and applies per-file write batches
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphWriter;

impl GraphWriter {
    /// Build the ordered, de-duplicated batch for one file.
    ///
    /// Order: the File itself, classes (definition then inheritance),
    /// functions, resolved imports, then calls. `resolved_imports` holds
    /// repository-relative target paths.
    pub fn plan(facts: &FileFacts, resolved_imports: &[String]) -> WriteBatch {
        let file = facts.path.as_str();
        let mut batch = WriteBatch::new(file);

        batch.push(UpsertOp::File {
            path: file.to_string(),
            name: facts.name.clone(),
        });

        for class in &facts.classes {
            batch.push(UpsertOp::Definition {
                kind: DefinitionKind::Class,
                name: class.name.clone(),
                file: file.to_string(),
            });
            for base in &class.bases {
                batch.push(UpsertOp::Extends {
                    child: class.name.clone(),
                    file: file.to_string(),
                    parent: base.clone(),
                });
            }
        }

        for function in &facts.functions {
            batch.push(UpsertOp::Definition {
                kind: DefinitionKind::Function,
                name: function.name.clone(),
                file: file.to_string(),
            });
        }

        for target in resolved_imports {
            batch.push(UpsertOp::Import {
                from: file.to_string(),
                to: target.clone(),
            });
        }

        for call in &facts.calls {
            if let Some(caller) = &call.caller {
                batch.push(UpsertOp::Call {
                    caller: caller.clone(),
                    callee: call.callee.clone(),
                    file: file.to_string(),
                });
            }
            batch.push(UpsertOp::UsedIn {
                callee: call.callee.clone(),
                file: file.to_string(),
            });
        }

        batch
    }

    /// Plan and apply in one step; returns the number of upserts sent
    pub async fn write(
        store: &mut dyn GraphStore,
        facts: &FileFacts,
        resolved_imports: &[String],
    ) -> Result<usize> {
        let batch = Self::plan(facts, resolved_imports);
        log::debug!(
            "Writing {} upserts for {} to {}",
            batch.len(),
            batch.file,
            store.name()
        );
        store.apply(&batch).await?;
        Ok(batch.len())
    }
}
