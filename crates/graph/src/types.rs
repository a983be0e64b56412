use serde::{Deserialize, Serialize};

/// Node labels of the persisted schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeLabel {
    File,
    Function,
    Class,
}

impl NodeLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Function => "Function",
            Self::Class => "Class",
        }
    }
}

/// Relationship types of the persisted schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// Function/Class -> File
    DefinedIn,
    /// File -> File
    Imports,
    /// Function -> Function
    Calls,
    /// Function -> File
    UsedIn,
    /// Class -> Class
    Extends,
}

impl RelationshipType {
    pub const ALL: [Self; 5] = [
        Self::DefinedIn,
        Self::Imports,
        Self::Calls,
        Self::UsedIn,
        Self::Extends,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DefinedIn => "DEFINED_IN",
            Self::Imports => "IMPORTS",
            Self::Calls => "CALLS",
            Self::UsedIn => "USED_IN",
            Self::Extends => "EXTENDS",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a node; matches the uniqueness constraints of the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "label")]
pub enum NodeKey {
    File { path: String },
    Function { name: String, file: String },
    Class { name: String, file: String },
}

impl NodeKey {
    pub fn file(path: impl Into<String>) -> Self {
        Self::File { path: path.into() }
    }

    pub fn function(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self::Function {
            name: name.into(),
            file: file.into(),
        }
    }

    pub fn class(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self::Class {
            name: name.into(),
            file: file.into(),
        }
    }

    pub const fn label(&self) -> NodeLabel {
        match self {
            Self::File { .. } => NodeLabel::File,
            Self::Function { .. } => NodeLabel::Function,
            Self::Class { .. } => NodeLabel::Class,
        }
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { path } => write!(f, "File({path})"),
            Self::Function { name, file } => write!(f, "Function({name}, {file:?})"),
            Self::Class { name, file } => write!(f, "Class({name}, {file:?})"),
        }
    }
}

/// Node and relationship totals of a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphCounts {
    pub files: u64,
    pub functions: u64,
    pub classes: u64,
    pub defined_in: u64,
    pub imports: u64,
    pub calls: u64,
    pub used_in: u64,
    pub extends: u64,
}

impl GraphCounts {
    pub fn set_relationships(&mut self, rel: RelationshipType, count: u64) {
        match rel {
            RelationshipType::DefinedIn => self.defined_in = count,
            RelationshipType::Imports => self.imports = count,
            RelationshipType::Calls => self.calls = count,
            RelationshipType::UsedIn => self.used_in = count,
            RelationshipType::Extends => self.extends = count,
        }
    }

    pub fn set_nodes(&mut self, label: NodeLabel, count: u64) {
        match label {
            NodeLabel::File => self.files = count,
            NodeLabel::Function => self.functions = count,
            NodeLabel::Class => self.classes = count,
        }
    }
}

impl std::fmt::Display for GraphCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "files={}, functions={}, classes={}, IMPORTS={}, CALLS={}, USED_IN={}, EXTENDS={}, DEFINED_IN={}",
            self.files,
            self.functions,
            self.classes,
            self.imports,
            self.calls,
            self.used_in,
            self.extends,
            self.defined_in
        )
    }
}
