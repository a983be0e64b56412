use crate::error::{ExtractorError, Result};
use crate::language::{Grammar, Language};
use std::collections::HashMap;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Parser adapter configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserConfig {
    /// Accept trees containing ERROR/MISSING nodes instead of failing the file
    pub tolerate_syntax_errors: bool,
}

/// One parsed source file
pub struct ParsedSource {
    pub path: String,
    pub grammar: Grammar,
    pub source: String,
    pub tree: Tree,
    /// Number of ERROR/MISSING nodes (non-zero only in tolerant mode)
    pub error_count: usize,
}

impl ParsedSource {
    pub const fn language(&self) -> Language {
        self.grammar.language()
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

/// Turns file text into a tree-sitter syntax tree, one cached parser per grammar
pub struct SourceParser {
    config: ParserConfig,
    parsers: HashMap<Grammar, Parser>,
}

impl Default for SourceParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl SourceParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            parsers: HashMap::new(),
        }
    }

    /// Parse a whole file; the grammar is picked from the extension of `path`
    pub fn parse(&mut self, source: impl Into<String>, path: impl AsRef<Path>) -> Result<ParsedSource> {
        let grammar = Grammar::from_path(path.as_ref())?;
        self.parse_as(source, path, grammar)
    }

    pub fn parse_as(
        &mut self,
        source: impl Into<String>,
        path: impl AsRef<Path>,
        grammar: Grammar,
    ) -> Result<ParsedSource> {
        let source = source.into();
        let path = path.as_ref().to_string_lossy().replace('\\', "/");

        let parser = self.parser_for(grammar)?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| ExtractorError::parse(&path, 0, 0, "parser produced no tree"))?;

        let root = tree.root_node();
        let mut error_count = 0;
        if root.has_error() {
            let (count, first) = collect_errors(root);
            if !self.config.tolerate_syntax_errors {
                let (line, column, message) = first.map_or((0, 0, "syntax error".to_string()), |e| {
                    (e.line, e.column, e.message)
                });
                return Err(ExtractorError::parse(&path, line, column, message));
            }
            log::warn!("{path}: {count} syntax error(s), extracting from partial tree");
            error_count = count;
        }

        Ok(ParsedSource {
            path,
            grammar,
            source,
            tree,
            error_count,
        })
    }

    fn parser_for(&mut self, grammar: Grammar) -> Result<&mut Parser> {
        if !self.parsers.contains_key(&grammar) {
            let mut parser = Parser::new();
            parser
                .set_language(&grammar.tree_sitter_language())
                .map_err(|e| ExtractorError::Grammar(format!("Failed to set language: {e}")))?;
            self.parsers.insert(grammar, parser);
        }
        self.parsers
            .get_mut(&grammar)
            .ok_or_else(|| ExtractorError::Grammar(format!("no parser for {grammar:?}")))
    }
}

struct SyntaxProblem {
    line: usize,
    column: usize,
    message: String,
}

fn collect_errors(root: Node) -> (usize, Option<SyntaxProblem>) {
    let mut count = 0;
    let mut first = None;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !node.has_error() {
            continue;
        }
        if node.is_error() || node.is_missing() {
            count += 1;
            if first.is_none() {
                let pos = node.start_position();
                let message = if node.is_missing() {
                    format!("missing `{}`", node.kind())
                } else {
                    "unexpected syntax".to_string()
                };
                first = Some(SyntaxProblem {
                    line: pos.row + 1,
                    column: pos.column + 1,
                    message,
                });
            }
        }
        // Reverse push keeps source order for the first reported problem
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    (count, first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_grammar_variant() {
        let mut parser = SourceParser::default();

        let js = parser.parse("const App = () => <div>hi</div>;", "App.jsx").unwrap();
        assert_eq!(js.grammar, Grammar::JavaScript);

        let ts = parser.parse("let x: number = 1;", "x.ts").unwrap();
        assert_eq!(ts.grammar, Grammar::TypeScript);
        assert_eq!(ts.language(), Language::TypeScript);

        let tsx = parser
            .parse("const C = (p: Props) => <span>{p.a}</span>;", "C.tsx")
            .unwrap();
        assert_eq!(tsx.grammar, Grammar::Tsx);

        let py = parser.parse("def f():\n    return 1\n", "m.py").unwrap();
        assert_eq!(py.grammar, Grammar::Python);
        assert_eq!(py.root().kind(), "module");
    }

    #[test]
    fn syntax_error_reports_path_and_position() {
        let mut parser = SourceParser::default();
        let err = parser
            .parse("function (\n", "src/broken.js")
            .err()
            .expect("broken source must fail");

        match err {
            ExtractorError::Parse { path, line, .. } => {
                assert_eq!(path, "src/broken.js");
                assert!(line >= 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tolerant_mode_keeps_partial_tree() {
        let mut parser = SourceParser::new(ParserConfig {
            tolerate_syntax_errors: true,
        });
        let parsed = parser
            .parse("function ok() {}\nfunction (\n", "partial.js")
            .unwrap();
        assert!(parsed.error_count > 0);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let mut parser = SourceParser::default();
        let err = parser.parse("fn main() {}", "main.rs").err().unwrap();
        assert!(matches!(err, ExtractorError::UnsupportedLanguage { .. }));
        assert!(!err.is_syntax());
    }
}
