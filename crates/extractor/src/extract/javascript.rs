//! JavaScript / TypeScript node classification (shared grammar shape).

use super::{identifier_field, node_text, CalleeShape, Syntax};
use tree_sitter::Node;

pub(crate) fn classify(node: Node, src: &[u8]) -> Syntax {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" | "method_definition" => {
            Syntax::Function {
                name: identifier_field(node, "name", src),
            }
        }
        "function_expression" | "function" | "generator_function" | "arrow_function" => {
            Syntax::Function {
                name: binding_name(node, src).or_else(|| identifier_field(node, "name", src)),
            }
        }
        "function_signature" => identifier_field(node, "name", src)
            .map_or(Syntax::Other, |name| Syntax::Signature { name }),
        "class_declaration" | "abstract_class_declaration" => Syntax::Class {
            name: identifier_field(node, "name", src),
            bases: heritage_bases(node, src),
        },
        "class" => Syntax::Class {
            name: identifier_field(node, "name", src).or_else(|| binding_name(node, src)),
            bases: heritage_bases(node, src),
        },
        "import_statement" | "export_statement" => import_specifier(node, src)
            .map_or(Syntax::Other, |specifier| Syntax::Import {
                specifiers: vec![specifier],
            }),
        "call_expression" => Syntax::Call {
            callee: callee_shape(node.child_by_field_name("function"), src),
            import: require_specifier(node, src),
        },
        _ => Syntax::Other,
    }
}

/// Name of the identifier a literal is bound to: `const f = ...` or `f = ...`
fn binding_name(node: Node, src: &[u8]) -> Option<String> {
    let parent = node.parent()?;
    let (target_field, value_field) = match parent.kind() {
        "variable_declarator" => ("name", "value"),
        "assignment_expression" => ("left", "right"),
        _ => return None,
    };
    if parent.child_by_field_name(value_field)? != node {
        return None;
    }
    let target = parent.child_by_field_name(target_field)?;
    (target.kind() == "identifier").then(|| node_text(target, src).to_string())
}

fn callee_shape(function: Option<Node>, src: &[u8]) -> CalleeShape {
    let Some(function) = function else {
        return CalleeShape::Computed;
    };
    match function.kind() {
        "identifier" => CalleeShape::Identifier(node_text(function, src).to_string()),
        "member_expression" => identifier_field(function, "property", src)
            .map_or(CalleeShape::Computed, CalleeShape::Member),
        _ => CalleeShape::Computed,
    }
}

/// Simple identifiers from `extends` / `implements`; qualified or computed
/// heritage expressions are dropped.
fn heritage_bases(class: Node, src: &[u8]) -> Vec<String> {
    let mut bases = Vec::new();
    let mut cursor = class.walk();
    for heritage in class
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "class_heritage")
    {
        let mut clauses = heritage.walk();
        for clause in heritage.named_children(&mut clauses) {
            match clause.kind() {
                // JavaScript: `extends <expression>`
                "identifier" => bases.push(node_text(clause, src).to_string()),
                // TypeScript: `extends A<T>`
                "extends_clause" => {
                    let mut values = clause.walk();
                    for value in clause.children_by_field_name("value", &mut values) {
                        if value.kind() == "identifier" {
                            bases.push(node_text(value, src).to_string());
                        }
                    }
                }
                "implements_clause" => {
                    let mut types = clause.walk();
                    for ty in clause.named_children(&mut types) {
                        let name = match ty.kind() {
                            "type_identifier" => Some(node_text(ty, src).to_string()),
                            "generic_type" => ty
                                .child_by_field_name("name")
                                .filter(|n| n.kind() == "type_identifier")
                                .map(|n| node_text(n, src).to_string()),
                            _ => None,
                        };
                        bases.extend(name);
                    }
                }
                _ => {}
            }
        }
    }
    bases
}

/// `import ... from "x"`, `import "x"`, `export ... from "x"`, `import x = require("x")`
fn import_specifier(node: Node, src: &[u8]) -> Option<String> {
    if let Some(source) = node.child_by_field_name("source") {
        return string_literal(source, src);
    }
    if node.kind() != "import_statement" {
        return None;
    }
    let mut cursor = node.walk();
    let clause = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == "import_require_clause")?;
    if let Some(source) = clause.child_by_field_name("source") {
        return string_literal(source, src);
    }
    let mut inner = clause.walk();
    let source = clause
        .named_children(&mut inner)
        .find(|child| child.kind() == "string")?;
    string_literal(source, src)
}

/// CommonJS `require("x")` with a literal argument
fn require_specifier(call: Node, src: &[u8]) -> Option<String> {
    let function = call.child_by_field_name("function")?;
    if function.kind() != "identifier" || node_text(function, src) != "require" {
        return None;
    }
    let arguments = call.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    let first = arguments.named_children(&mut cursor).next()?;
    string_literal(first, src)
}

fn string_literal(node: Node, src: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let value = node_text(node, src).trim_matches(|c| c == '"' || c == '\'');
    (!value.is_empty()).then(|| value.to_string())
}
