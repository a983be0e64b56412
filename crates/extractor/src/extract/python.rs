//! Python node classification.

use super::{identifier_field, node_text, CalleeShape, Syntax};
use tree_sitter::Node;

pub(crate) fn classify(node: Node, src: &[u8]) -> Syntax {
    match node.kind() {
        "function_definition" => Syntax::Function {
            name: identifier_field(node, "name", src),
        },
        "lambda" => Syntax::Function {
            name: assigned_name(node, src),
        },
        "class_definition" => Syntax::Class {
            name: identifier_field(node, "name", src),
            bases: superclasses(node, src),
        },
        "import_statement" => {
            let mut cursor = node.walk();
            let specifiers = node
                .children_by_field_name("name", &mut cursor)
                .filter_map(|name| imported_name(name, src))
                .collect();
            Syntax::Import { specifiers }
        }
        "import_from_statement" => {
            let Some(module) = node
                .child_by_field_name("module_name")
                .map(|module| node_text(module, src).to_string())
                .filter(|module| !module.is_empty())
            else {
                return Syntax::Other;
            };
            let mut cursor = node.walk();
            let mut specifiers: Vec<String> = node
                .children_by_field_name("name", &mut cursor)
                .filter_map(|name| imported_name(name, src))
                .map(|name| submodule(&module, &name))
                .collect();
            // `from m import *`
            if specifiers.is_empty() {
                specifiers.push(module);
            }
            Syntax::Import { specifiers }
        }
        "call" => Syntax::Call {
            callee: callee_shape(node.child_by_field_name("function"), src),
            import: None,
        },
        _ => Syntax::Other,
    }
}

/// Module path of `a.b` or `a.b as c`
fn imported_name(name: Node, src: &[u8]) -> Option<String> {
    match name.kind() {
        "dotted_name" => Some(node_text(name, src).to_string()),
        "aliased_import" => name
            .child_by_field_name("name")
            .map(|inner| node_text(inner, src).to_string()),
        _ => None,
    }
}

/// `from pkg import x` may name a module, so the specifier is `pkg.x`;
/// the resolver falls back to `pkg` when no such module exists.
fn submodule(module: &str, name: &str) -> String {
    if module.ends_with('.') {
        format!("{module}{name}")
    } else {
        format!("{module}.{name}")
    }
}

/// `name = lambda ...`
fn assigned_name(node: Node, src: &[u8]) -> Option<String> {
    let parent = node.parent()?;
    if parent.kind() != "assignment" || parent.child_by_field_name("right")? != node {
        return None;
    }
    let left = parent.child_by_field_name("left")?;
    (left.kind() == "identifier").then(|| node_text(left, src).to_string())
}

fn callee_shape(function: Option<Node>, src: &[u8]) -> CalleeShape {
    let Some(function) = function else {
        return CalleeShape::Computed;
    };
    match function.kind() {
        "identifier" => CalleeShape::Identifier(node_text(function, src).to_string()),
        "attribute" => identifier_field(function, "attribute", src)
            .map_or(CalleeShape::Computed, CalleeShape::Member),
        _ => CalleeShape::Computed,
    }
}

/// Plain identifiers from `class C(A, B, metaclass=M)`; dotted bases are dropped
fn superclasses(class: Node, src: &[u8]) -> Vec<String> {
    let Some(arguments) = class.child_by_field_name("superclasses") else {
        return Vec::new();
    };
    let mut cursor = arguments.walk();
    arguments
        .named_children(&mut cursor)
        .filter(|arg| arg.kind() == "identifier")
        .map(|arg| node_text(arg, src).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::facts::FileFacts;
    use crate::{extract_facts, SourceParser};
    use pretty_assertions::assert_eq;

    fn facts(path: &str, source: &str) -> FileFacts {
        let mut parser = SourceParser::default();
        let parsed = parser.parse(source, path).expect("parse");
        extract_facts(&parsed, path)
    }

    #[test]
    fn functions_methods_and_calls() {
        let src = r"
import os
from pkg.models import User

def load(path):
    data = read(path)
    return os.path.join(data)

class Repo(Base, Mixin, metaclass=Meta):
    def save(self):
        self.flush()
        helper = lambda: persist()
        return helper

main()
";
        let f = facts("app/repo.py", src);
        assert_eq!(
            f.function_names().into_iter().collect::<Vec<_>>(),
            vec!["helper", "load", "save"]
        );
        assert_eq!(f.classes.len(), 1);
        assert_eq!(f.classes[0].name, "Repo");
        assert_eq!(f.classes[0].bases, vec!["Base".to_string(), "Mixin".to_string()]);
        assert_eq!(f.specifiers(), vec!["os", "pkg.models.User"]);
        assert_eq!(
            f.call_pairs(),
            vec![
                (Some("load"), "read"),
                (Some("load"), "join"),
                (Some("save"), "flush"),
                (Some("helper"), "persist"),
                (None, "main"),
            ]
        );
    }

    #[test]
    fn import_forms() {
        let src = r"
import a, b.c as d
from . import sibling
from ..shared.util import tool
from .helpers import (first, second as other)
from star import *

def late():
    import inside
";
        let f = facts("pkg/sub/mod.py", src);
        assert_eq!(
            f.specifiers(),
            vec![
                "a",
                "b.c",
                ".sibling",
                "..shared.util.tool",
                ".helpers.first",
                ".helpers.second",
                "star",
            ]
        );
    }

    #[test]
    fn dotted_bases_and_decorators() {
        let src = r"
class View(generic.View):
    @route('/x')
    def get(self):
        pass
";
        let f = facts("views.py", src);
        assert!(f.classes[0].bases.is_empty());
        assert_eq!(f.function_names().into_iter().collect::<Vec<_>>(), vec!["get"]);
        assert_eq!(f.call_pairs(), vec![(None, "route")]);
    }
}
