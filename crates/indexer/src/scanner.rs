use crate::error::{IndexerError, Result};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Enumerates source files under a repository root.
///
/// Hidden entries are always skipped; `.gitignore`/`.ignore` rules apply
/// unless disabled. Entries are visited in file-name order so repeated runs
/// see the same sequence.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    root: PathBuf,
    extensions: HashSet<String>,
    respect_gitignore: bool,
}

impl SourceLocator {
    pub fn new<S: AsRef<str>>(root: impl AsRef<Path>, extensions: &[S]) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(IndexerError::RootNotFound(root.to_path_buf()));
        }
        Ok(Self {
            root: root.canonicalize()?,
            extensions: extensions
                .iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            respect_gitignore: true,
        })
    }

    #[must_use]
    pub fn respect_gitignore(mut self, enabled: bool) -> Self {
        self.respect_gitignore = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths of matching files. Each call starts a fresh walk.
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        let gitignore = self.respect_gitignore;
        WalkBuilder::new(&self.root)
            .follow_links(false)
            .hidden(true)
            .parents(gitignore)
            .ignore(gitignore)
            .git_ignore(gitignore)
            .git_global(gitignore)
            .git_exclude(gitignore)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(ignore::DirEntry::into_path)
            .filter(move |path| self.matches(path))
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
    }

    /// Root-relative path with `/` separators
    pub fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let mut normalized = relative.to_string_lossy().to_string();
        if normalized.contains('\\') {
            normalized = normalized.replace('\\', "/");
        }
        normalized
    }
}
