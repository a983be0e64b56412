use crate::error::{ExtractorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source language family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
}

/// Grammar variant used to parse a file.
///
/// The JavaScript grammar already accepts JSX, TypeScript needs a dedicated
/// grammar for component syntax (`.tsx`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    JavaScript,
    TypeScript,
    Tsx,
    Python,
}

/// Every supported extension, in probe order.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts", "py",
];

impl Language {
    pub const ALL: [Self; 3] = [Self::JavaScript, Self::TypeScript, Self::Python];

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        Grammar::from_extension(ext).map(Grammar::language)
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Get language name as string
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
        }
    }

    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Self::TypeScript => &["ts", "tsx", "mts", "cts"],
            Self::Python => &["py"],
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Grammar {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "py" => Some(Self::Python),
            _ => None,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|ext| ext.to_str());
        ext.and_then(Self::from_extension)
            .ok_or_else(|| ExtractorError::unsupported(path.display().to_string(), ext))
    }

    pub const fn language(self) -> Language {
        match self {
            Self::JavaScript => Language::JavaScript,
            Self::TypeScript | Self::Tsx => Language::TypeScript,
            Self::Python => Language::Python,
        }
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Grammar, Language, SOURCE_EXTENSIONS};

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("js"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("JSX"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("ts"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("rs"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("src/app.mjs"), Some(Language::JavaScript));
        assert_eq!(Language::from_path("pkg/mod.py"), Some(Language::Python));
        assert_eq!(Language::from_path("Makefile"), None);
    }

    #[test]
    fn grammar_variant_follows_extension() {
        assert_eq!(Grammar::from_extension("jsx"), Some(Grammar::JavaScript));
        assert_eq!(Grammar::from_extension("cts"), Some(Grammar::TypeScript));
        assert_eq!(Grammar::from_extension("tsx"), Some(Grammar::Tsx));
        assert!(Grammar::from_path("README.md").is_err());
    }

    #[test]
    fn every_extension_maps_back_to_its_language() {
        for language in Language::ALL {
            for ext in language.extensions() {
                assert!(SOURCE_EXTENSIONS.contains(ext));
                assert_eq!(Language::from_extension(ext), Some(language));
            }
        }
        let total: usize = Language::ALL.iter().map(|l| l.extensions().len()).sum();
        assert_eq!(total, SOURCE_EXTENSIONS.len());
    }
}
