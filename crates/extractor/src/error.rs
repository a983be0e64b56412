use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractorError>;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("Parse error in {path} at {line}:{column}: {message}")]
    Parse {
        path: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unsupported language for {path}: {extension:?}")]
    UnsupportedLanguage {
        path: String,
        extension: Option<String>,
    },

    #[error("Grammar error: {0}")]
    Grammar(String),
}

impl ExtractorError {
    pub fn parse(path: impl Into<String>, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            column,
            message: message.into(),
        }
    }

    pub fn unsupported(path: impl Into<String>, extension: Option<&str>) -> Self {
        Self::UnsupportedLanguage {
            path: path.into(),
            extension: extension.map(str::to_string),
        }
    }

    /// Whether this error is a syntax problem in the source rather than a setup failure
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
