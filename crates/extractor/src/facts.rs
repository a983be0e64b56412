use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named function-like declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionFact {
    pub name: String,
    pub file: String,
    pub line: usize,
}

/// A named class declaration and the simple identifiers it inherits from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFact {
    pub name: String,
    pub file: String,
    pub bases: Vec<String>,
    pub line: usize,
}

/// A module specifier exactly as written in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFact {
    pub specifier: String,
    pub line: usize,
}

/// A call site; `caller` is `None` at module scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFact {
    pub caller: Option<String>,
    pub callee: String,
    pub line: usize,
}

/// Everything extracted from one file, in traversal order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFacts {
    pub path: String,
    pub name: String,
    pub language: Language,
    pub functions: Vec<FunctionFact>,
    pub classes: Vec<ClassFact>,
    pub imports: Vec<ImportFact>,
    pub calls: Vec<CallFact>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCounts {
    pub functions: usize,
    pub classes: usize,
    pub imports: usize,
    pub calls: usize,
}

impl FileFacts {
    pub fn new(path: impl Into<String>, language: Language) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self {
            path,
            name,
            language,
            functions: Vec::new(),
            classes: Vec::new(),
            imports: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn counts(&self) -> FactCounts {
        FactCounts {
            functions: self.functions.len(),
            classes: self.classes.len(),
            imports: self.imports.len(),
            calls: self.calls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
            && self.classes.is_empty()
            && self.imports.is_empty()
            && self.calls.is_empty()
    }

    /// Distinct declared function names (identity is name + file)
    pub fn function_names(&self) -> BTreeSet<&str> {
        self.functions.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn class_names(&self) -> BTreeSet<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    /// `(caller, callee)` pairs in traversal order
    pub fn call_pairs(&self) -> Vec<(Option<&str>, &str)> {
        self.calls
            .iter()
            .map(|c| (c.caller.as_deref(), c.callee.as_str()))
            .collect()
    }

    pub fn specifiers(&self) -> Vec<&str> {
        self.imports.iter().map(|i| i.specifier.as_str()).collect()
    }
}

impl std::fmt::Display for FactCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "functions={}, classes={}, imports={}, calls={}",
            self.functions, self.classes, self.imports, self.calls
        )
    }
}
