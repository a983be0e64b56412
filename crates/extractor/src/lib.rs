//! # Repograph Extractor
//!
//! Turns one source file into the facts the property graph is built from.
//!
//! ## Pipeline
//!
//! ```text
//! source text + extension
//!     │
//!     ├──> SourceParser (tree-sitter, grammar picked by extension)
//!     │      └─> ParsedSource
//!     │
//!     └──> extract_facts (single traversal, explicit scope stack)
//!            ├─ functions  (name, file)
//!            ├─ classes    (name, file, bases)
//!            ├─ imports    (raw module specifiers)
//!            └─ calls      (caller or none, callee)
//! ```
//!
//! ## Example
//!
//! ```
//! use repograph_extractor::{extract_source, SourceParser};
//!
//! let mut parser = SourceParser::default();
//! let facts = extract_source(&mut parser, "function foo() { bar(); }", "a.js").unwrap();
//! assert_eq!(facts.calls[0].caller.as_deref(), Some("foo"));
//! ```

mod error;
mod extract;
mod facts;
mod language;
mod parser;

pub use error::{ExtractorError, Result};
pub use extract::{extract_facts, CalleeShape, Frame, ScopeStack};
pub use facts::{CallFact, ClassFact, FactCounts, FileFacts, FunctionFact, ImportFact};
pub use language::{Grammar, Language, SOURCE_EXTENSIONS};
pub use parser::{ParsedSource, ParserConfig, SourceParser};

/// Parse and extract in one step
pub fn extract_source(parser: &mut SourceParser, source: &str, rel_path: &str) -> Result<FileFacts> {
    let parsed = parser.parse(source, rel_path)?;
    Ok(extract_facts(&parsed, rel_path))
}
