//! Single-pass fact extraction over a parsed syntax tree.
//!
//! Each language module classifies raw tree-sitter nodes into the closed
//! [`Syntax`] union; the walker here is language independent and owns the
//! scope bookkeeping.

mod javascript;
mod python;
mod scope;

pub use scope::{Frame, ScopeStack};

use crate::facts::{CallFact, ClassFact, FileFacts, FunctionFact, ImportFact};
use crate::language::Language;
use crate::parser::ParsedSource;
use tree_sitter::Node;

/// Shape of the callee of a call expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalleeShape {
    /// `foo()`
    Identifier(String),
    /// `a.b.foo()`, keeps the final property name
    Member(String),
    /// `fns[0]()`, `(a || b)()`, `getFn()()`
    Computed,
}

impl CalleeShape {
    pub fn into_name(self) -> Option<String> {
        match self {
            Self::Identifier(name) | Self::Member(name) => Some(name),
            Self::Computed => None,
        }
    }
}

/// Node kinds that matter for extraction; everything else is `Other`
#[derive(Debug)]
pub(crate) enum Syntax {
    /// Function-like construct with a body; opens a scope frame
    Function { name: Option<String> },
    /// Named declaration without a body (overload signatures)
    Signature { name: String },
    Class { name: Option<String>, bases: Vec<String> },
    Import { specifiers: Vec<String> },
    /// `import` is set for CommonJS `require("...")` calls
    Call { callee: CalleeShape, import: Option<String> },
    Other,
}

/// Extract all facts from one parsed file.
///
/// `rel_path` is the repository-relative path recorded on every fact.
pub fn extract_facts(parsed: &ParsedSource, rel_path: &str) -> FileFacts {
    let mut walker = Walker {
        language: parsed.language(),
        source: parsed.source.as_bytes(),
        facts: FileFacts::new(rel_path, parsed.language()),
    };
    let mut scope = ScopeStack::new();
    walker.visit(parsed.root(), &mut scope);
    debug_assert!(scope.is_module_scope());

    log::debug!("{rel_path}: {}", walker.facts.counts());
    walker.facts
}

struct Walker<'s> {
    language: Language,
    source: &'s [u8],
    facts: FileFacts,
}

impl Walker<'_> {
    fn classify(&self, node: Node) -> Syntax {
        match self.language {
            Language::JavaScript | Language::TypeScript => javascript::classify(node, self.source),
            Language::Python => python::classify(node, self.source),
        }
    }

    fn visit(&mut self, node: Node, scope: &mut ScopeStack) {
        let line = node.start_position().row + 1;

        match self.classify(node) {
            Syntax::Function { name } => {
                if let Some(name) = &name {
                    self.push_function(name, line);
                }
                scope.within(name, |scope| self.visit_children(node, scope));
                return;
            }
            Syntax::Signature { name } => self.push_function(&name, line),
            Syntax::Class { name, bases } => {
                if let Some(name) = name {
                    self.facts.classes.push(ClassFact {
                        name,
                        file: self.facts.path.clone(),
                        bases,
                        line,
                    });
                }
            }
            Syntax::Import { specifiers } => {
                if scope.is_module_scope() {
                    for specifier in specifiers {
                        self.facts.imports.push(ImportFact { specifier, line });
                    }
                }
            }
            Syntax::Call { callee, import } => {
                if let Some(callee) = callee.into_name() {
                    self.facts.calls.push(CallFact {
                        caller: scope.caller().map(str::to_string),
                        callee,
                        line,
                    });
                }
                if let Some(specifier) = import.filter(|_| scope.is_module_scope()) {
                    self.facts.imports.push(ImportFact { specifier, line });
                }
            }
            Syntax::Other => {}
        }

        self.visit_children(node, scope);
    }

    fn visit_children(&mut self, node: Node, scope: &mut ScopeStack) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child, scope);
        }
    }

    fn push_function(&mut self, name: &str, line: usize) {
        self.facts.functions.push(FunctionFact {
            name: name.to_string(),
            file: self.facts.path.clone(),
            line,
        });
    }
}

pub(crate) fn node_text<'s>(node: Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or_default()
}

/// Text of the `field` child when it is a plain identifier-like token
pub(crate) fn identifier_field(node: Node, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .filter(|child| is_identifier_kind(child.kind()))
        .map(|child| node_text(child, source).to_string())
        .filter(|name| !name.is_empty())
}

pub(crate) fn is_identifier_kind(kind: &str) -> bool {
    matches!(
        kind,
        "identifier" | "property_identifier" | "private_property_identifier" | "type_identifier"
    )
}
