//! Maps raw import specifiers to files inside the repository.

use repograph_extractor::{Language, SOURCE_EXTENSIONS};
use std::path::{Path, PathBuf};

/// Resolves import specifiers against the files present under `root`.
///
/// Probe order for a candidate `c`: `c` itself, `c.<ext>` for every
/// supported extension, then `c/index.<ext>` and `c/__init__.py`. Only
/// regular files match and the first hit wins.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    root: PathBuf,
}

impl ImportResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Root-relative target of `specifier` imported from `importer`, or
    /// `None` when nothing in the repository matches.
    pub fn resolve(&self, importer: &str, specifier: &str, language: Language) -> Option<String> {
        let specifier = clean_specifier(specifier)?;
        let candidate = match language {
            Language::Python => python_candidate(importer, specifier),
            Language::JavaScript | Language::TypeScript => js_candidate(importer, specifier),
        };
        let candidate = normalize(&candidate)?;
        let hit = self.probe(&candidate).or_else(|| match language {
            Language::Python => python_parent(specifier)
                .and_then(|parent| normalize(&python_candidate(importer, parent)))
                .and_then(|parent| self.probe(&parent)),
            Language::JavaScript | Language::TypeScript => None,
        });
        if hit.is_none() {
            log::debug!("{importer}: unresolved import {specifier:?}");
        }
        hit
    }

    fn probe(&self, candidate: &str) -> Option<String> {
        let join = |rel: &str| -> String {
            if candidate.is_empty() {
                rel.to_string()
            } else {
                format!("{candidate}/{rel}")
            }
        };

        let literal = (!candidate.is_empty()).then(|| candidate.to_string());
        let with_ext = SOURCE_EXTENSIONS
            .iter()
            .filter(|_| !candidate.is_empty())
            .map(|ext| format!("{candidate}.{ext}"));
        let index = SOURCE_EXTENSIONS
            .iter()
            .filter(|ext| **ext != "py")
            .map(|ext| join(&format!("index.{ext}")))
            .chain(std::iter::once(join("__init__.py")));

        literal
            .into_iter()
            .chain(with_ext)
            .chain(index)
            .find(|rel| self.root.join(rel).is_file())
    }
}

/// Trim, drop a trailing `;` and any `?query` / `#hash` suffix
fn clean_specifier(raw: &str) -> Option<&str> {
    let spec = raw.trim().trim_end_matches(';').trim();
    let spec = spec.split(['?', '#']).next().unwrap_or(spec).trim();
    (!spec.is_empty()).then_some(spec)
}

fn parent_dir(importer: &str) -> &str {
    importer.rsplit_once('/').map_or("", |(dir, _)| dir)
}

fn js_candidate(importer: &str, spec: &str) -> String {
    let relative =
        spec == "." || spec == ".." || spec.starts_with("./") || spec.starts_with("../");
    if relative {
        let dir = parent_dir(importer);
        if dir.is_empty() {
            spec.to_string()
        } else {
            format!("{dir}/{spec}")
        }
    } else {
        spec.trim_start_matches('/').to_string()
    }
}

/// `a.b` -> `a/b`; `.mod` and `..pkg.mod` are relative to the importer's package
fn python_candidate(importer: &str, spec: &str) -> String {
    let dots = spec.chars().take_while(|c| *c == '.').count();
    let module = spec[dots..].replace('.', "/");
    if dots == 0 {
        return module;
    }

    let mut parts: Vec<&str> = Vec::new();
    let dir = parent_dir(importer);
    if !dir.is_empty() {
        parts.push(dir);
    }
    parts.extend(std::iter::repeat("..").take(dots - 1));
    if !module.is_empty() {
        parts.push(&module);
    }
    parts.join("/")
}

/// `.pkg.mod.name` -> `.pkg.mod`, `..name` -> `..`; `None` for a top-level name
fn python_parent(spec: &str) -> Option<&str> {
    let dots = spec.len() - spec.trim_start_matches('.').len();
    let module = &spec[dots..];
    if module.is_empty() {
        return None;
    }
    let parent = module
        .rsplit_once('.')
        .map_or(&spec[..dots], |(head, _)| &spec[..dots + head.len()]);
    (!parent.is_empty()).then_some(parent)
}

/// Lexically resolve `.` and `..`; `None` when the path leaves the root
fn normalize(path: &str) -> Option<String> {
    let mut out: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                out.pop()?;
            }
            other => out.push(other),
        }
    }
    Some(out.join("/"))
}
