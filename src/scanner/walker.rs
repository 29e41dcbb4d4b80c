use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::{CssDocError, Result};
use crate::logging::LogSink;

/// Finds stylesheet sources under a root directory.
pub struct FileWalker {
    extensions: Vec<String>,
    exclude: Vec<glob::Pattern>,
    /// Directories pruned from the walk, such as the report output
    skip_dirs: Vec<PathBuf>,
    respect_gitignore: bool,
}

impl FileWalker {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            exclude: Vec::new(),
            skip_dirs: Vec::new(),
            respect_gitignore: true,
        }
    }

    pub fn with_excludes<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let compiled = glob::Pattern::new(pattern).map_err(|e| {
                CssDocError::Config(format!("invalid exclude pattern `{}`: {}", pattern, e))
            })?;
            self.exclude.push(compiled);
        }
        Ok(self)
    }

    /// Prunes `dir` and everything below it when it lies inside the walk root.
    pub fn skip_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.skip_dirs.push(dir.into());
        self
    }

    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Returns matching files under `root`, sorted by path. Entries that cannot
    /// be read are logged and skipped.
    pub fn walk(&self, root: &Path, log: &dyn LogSink) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(CssDocError::Scan(format!(
                "source root `{}` is not a directory",
                root.display()
            )));
        }

        let mut files = Vec::new();

        // Directories that do not exist yet cannot contain anything to skip.
        let skip: Vec<PathBuf> = self
            .skip_dirs
            .iter()
            .filter_map(|dir| dir.canonicalize().ok())
            .collect();

        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .require_git(false)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .ignore(self.respect_gitignore);
        if !skip.is_empty() {
            builder.filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                if entry.depth() == 0 || !is_dir {
                    return true;
                }
                !entry
                    .path()
                    .canonicalize()
                    .is_ok_and(|path| skip.contains(&path))
            });
        }
        let walker = builder.build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log.warn(&format!("Skipping entry: {}", e));
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !self.is_supported(path) {
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            if self.is_excluded(relative) {
                log.debug(&format!("Excluded {}", relative.display()));
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                self.extensions.iter().any(|known| *known == e)
            })
            .unwrap_or(false)
    }

    /// Matches `relative` (to the walk root) against the exclude globs.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        let normalized = relative.to_string_lossy().replace('\\', "/");
        self.exclude.iter().any(|p| p.matches(&normalized))
    }
}
