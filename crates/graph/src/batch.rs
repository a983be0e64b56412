use crate::types::{NodeKey, NodeLabel, RelationshipType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which kind of declaration a `Definition` upsert creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefinitionKind {
    Function,
    Class,
}

impl DefinitionKind {
    pub const fn label(self) -> NodeLabel {
        match self {
            Self::Function => NodeLabel::Function,
            Self::Class => NodeLabel::Class,
        }
    }
}

/// One idempotent upsert. Every node is merged by its key, every
/// relationship by its endpoints and type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum UpsertOp {
    /// Merge File by path and always overwrite its name
    File { path: String, name: String },
    /// Merge Function/Class and its File, then `DEFINED_IN`
    Definition {
        kind: DefinitionKind,
        name: String,
        file: String,
    },
    /// Merge Class `(child, file)` and Class `(parent, "")`, then `EXTENDS`
    Extends {
        child: String,
        file: String,
        parent: String,
    },
    /// Merge both Files, then `IMPORTS`
    Import { from: String, to: String },
    /// Merge both Functions scoped to `file`, then `CALLS`
    Call {
        caller: String,
        callee: String,
        file: String,
    },
    /// Merge Function `(callee, file)` and File, then `USED_IN`
    UsedIn { callee: String, file: String },
}

/// Base classes are recorded by name only
pub const UNRESOLVED_FILE: &str = "";

impl UpsertOp {
    /// Nodes merged by this op, in merge order
    pub fn nodes(&self) -> Vec<NodeKey> {
        match self {
            Self::File { path, .. } => vec![NodeKey::file(path)],
            Self::Definition { kind, name, file } => {
                let node = match kind {
                    DefinitionKind::Function => NodeKey::function(name, file),
                    DefinitionKind::Class => NodeKey::class(name, file),
                };
                vec![node, NodeKey::file(file)]
            }
            Self::Extends {
                child,
                file,
                parent,
            } => vec![
                NodeKey::class(child, file),
                NodeKey::class(parent, UNRESOLVED_FILE),
            ],
            Self::Import { from, to } => vec![NodeKey::file(from), NodeKey::file(to)],
            Self::Call {
                caller,
                callee,
                file,
            } => vec![NodeKey::function(caller, file), NodeKey::function(callee, file)],
            Self::UsedIn { callee, file } => {
                vec![NodeKey::function(callee, file), NodeKey::file(file)]
            }
        }
    }

    pub const fn relationship_type(&self) -> Option<RelationshipType> {
        match self {
            Self::File { .. } => None,
            Self::Definition { .. } => Some(RelationshipType::DefinedIn),
            Self::Extends { .. } => Some(RelationshipType::Extends),
            Self::Import { .. } => Some(RelationshipType::Imports),
            Self::Call { .. } => Some(RelationshipType::Calls),
            Self::UsedIn { .. } => Some(RelationshipType::UsedIn),
        }
    }

    /// `(from, type, to)` of the merged relationship, if any
    pub fn relationship(&self) -> Option<(NodeKey, RelationshipType, NodeKey)> {
        let rel = self.relationship_type()?;
        let mut nodes = self.nodes().into_iter();
        let from = nodes.next()?;
        let to = nodes.next()?;
        Some((from, rel, to))
    }
}

/// All upserts for one source file, applied as a unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteBatch {
    pub file: String,
    ops: Vec<UpsertOp>,
    #[serde(skip)]
    seen: HashSet<UpsertOp>,
}

impl WriteBatch {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// Append an op unless an identical one is already queued
    pub fn push(&mut self, op: UpsertOp) -> bool {
        if self.seen.contains(&op) {
            return false;
        }
        self.seen.insert(op.clone());
        self.ops.push(op);
        true
    }

    pub fn ops(&self) -> &[UpsertOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn count(&self, rel: RelationshipType) -> usize {
        self.ops
            .iter()
            .filter(|op| op.relationship_type() == Some(rel))
            .count()
    }
}
