//! In-memory property graph with the same MERGE semantics as the
//! persistent store. Backs dry runs, JSON exports and tests.

use crate::batch::{UpsertOp, WriteBatch};
use crate::error::Result;
use crate::store::GraphStore;
use crate::types::{GraphCounts, NodeKey, NodeLabel, RelationshipType};
use async_trait::async_trait;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone)]
struct NodeData {
    key: NodeKey,
    /// Only File nodes carry a name beyond their key
    name: Option<String>,
}

/// Property graph keyed by the store's uniqueness constraints
#[derive(Debug, Default)]
pub struct MemoryGraphStore {
    graph: DiGraph<NodeData, RelationshipType>,
    index: HashMap<NodeKey, NodeIndex>,
    edges: HashSet<(NodeIndex, RelationshipType, NodeIndex)>,
    batches: usize,
}

/// Sorted, serializable view of a [`MemoryGraphStore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<SnapshotNode>,
    pub relationships: Vec<SnapshotRelationship>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub label: NodeLabel,
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotRelationship {
    pub from: NodeKey,
    #[serde(rename = "type")]
    pub rel: RelationshipType,
    pub to: NodeKey,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn merge_node(&mut self, key: &NodeKey) -> NodeIndex {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        let idx = self.graph.add_node(NodeData {
            key: key.clone(),
            name: None,
        });
        self.index.insert(key.clone(), idx);
        idx
    }

    fn merge_relationship(&mut self, from: &NodeKey, rel: RelationshipType, to: &NodeKey) {
        let a = self.merge_node(from);
        let b = self.merge_node(to);
        if self.edges.insert((a, rel, b)) {
            self.graph.add_edge(a, b, rel);
        }
    }

    /// Apply a single upsert
    pub fn merge(&mut self, op: &UpsertOp) {
        match op {
            UpsertOp::File { path, name } => {
                let idx = self.merge_node(&NodeKey::file(path));
                self.graph[idx].name = Some(name.clone());
            }
            other => {
                if let Some((from, rel, to)) = other.relationship() {
                    self.merge_relationship(&from, rel, &to);
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn relationship_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of batches applied so far
    pub fn batches_applied(&self) -> usize {
        self.batches
    }

    pub fn contains_node(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn has_relationship(&self, from: &NodeKey, rel: RelationshipType, to: &NodeKey) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => self.edges.contains(&(a, rel, b)),
            _ => false,
        }
    }

    /// `name` attribute of a File node
    pub fn file_name(&self, path: &str) -> Option<&str> {
        let idx = self.index.get(&NodeKey::file(path))?;
        self.graph[*idx].name.as_deref()
    }

    /// All `(from, to)` pairs of one relationship type, sorted
    pub fn relationships(&self, rel: RelationshipType) -> Vec<(NodeKey, NodeKey)> {
        let mut pairs: Vec<_> = self
            .graph
            .edge_references()
            .filter(|e| *e.weight() == rel)
            .map(|e| {
                (
                    self.graph[e.source()].key.clone(),
                    self.graph[e.target()].key.clone(),
                )
            })
            .collect();
        pairs.sort();
        pairs
    }

    pub fn label_count(&self, label: NodeLabel) -> usize {
        self.graph
            .node_weights()
            .filter(|n| n.key.label() == label)
            .count()
    }

    pub fn relationship_type_count(&self, rel: RelationshipType) -> usize {
        self.graph.edge_weights().filter(|r| **r == rel).count()
    }

    pub fn graph_counts(&self) -> GraphCounts {
        let mut counts = GraphCounts::default();
        for label in [NodeLabel::File, NodeLabel::Function, NodeLabel::Class] {
            counts.set_nodes(label, self.label_count(label) as u64);
        }
        for rel in RelationshipType::ALL {
            counts.set_relationships(rel, self.relationship_type_count(rel) as u64);
        }
        counts
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<_> = self
            .graph
            .node_weights()
            .map(|node| {
                let mut properties = BTreeMap::new();
                match &node.key {
                    NodeKey::File { path } => {
                        properties.insert("path".to_string(), path.clone());
                        if let Some(name) = &node.name {
                            properties.insert("name".to_string(), name.clone());
                        }
                    }
                    NodeKey::Function { name, file } | NodeKey::Class { name, file } => {
                        properties.insert("name".to_string(), name.clone());
                        properties.insert("file".to_string(), file.clone());
                    }
                }
                SnapshotNode {
                    label: node.key.label(),
                    properties,
                }
            })
            .collect();
        nodes.sort();

        let mut relationships: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| SnapshotRelationship {
                from: self.graph[e.source()].key.clone(),
                rel: *e.weight(),
                to: self.graph[e.target()].key.clone(),
            })
            .collect();
        relationships.sort();

        GraphSnapshot {
            nodes,
            relationships,
        }
    }

    /// Write the snapshot as pretty JSON
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, json)?;
        log::info!(
            "Exported {} nodes and {} relationships to {}",
            self.node_count(),
            self.relationship_count(),
            path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn verify_connectivity(&mut self) -> Result<()> {
        Ok(())
    }

    async fn apply(&mut self, batch: &WriteBatch) -> Result<()> {
        for op in batch.ops() {
            self.merge(op);
        }
        self.batches += 1;
        Ok(())
    }

    async fn counts(&mut self) -> Result<GraphCounts> {
        Ok(self.graph_counts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::DefinitionKind;

    #[test]
    fn file_name_is_overwritten() {
        let mut store = MemoryGraphStore::new();
        store.merge(&UpsertOp::Import {
            from: "a.js".into(),
            to: "b.js".into(),
        });
        assert_eq!(store.file_name("b.js"), None);

        store.merge(&UpsertOp::File {
            path: "b.js".into(),
            name: "b.js".into(),
        });
        assert_eq!(store.file_name("b.js"), Some("b.js"));
        assert_eq!(store.node_count(), 2);
    }

    #[test]
    fn merge_never_duplicates() {
        let mut store = MemoryGraphStore::new();
        let op = UpsertOp::Definition {
            kind: DefinitionKind::Function,
            name: "foo".into(),
            file: "a.js".into(),
        };
        store.merge(&op);
        store.merge(&op);

        assert_eq!(store.node_count(), 2);
        assert_eq!(store.relationship_count(), 1);
        assert!(store.has_relationship(
            &NodeKey::function("foo", "a.js"),
            RelationshipType::DefinedIn,
            &NodeKey::file("a.js"),
        ));
    }

    #[test]
    fn function_and_class_with_same_name_are_distinct() {
        let mut store = MemoryGraphStore::new();
        for kind in [DefinitionKind::Function, DefinitionKind::Class] {
            store.merge(&UpsertOp::Definition {
                kind,
                name: "Widget".into(),
                file: "w.ts".into(),
            });
        }
        let counts = store.graph_counts();
        assert_eq!(counts.functions, 1);
        assert_eq!(counts.classes, 1);
        assert_eq!(counts.files, 1);
        assert_eq!(counts.defined_in, 2);
    }
}
