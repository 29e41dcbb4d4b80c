//! Directory scanning: supplies `(relative path, text)` pairs to the parser.

pub mod walker;

pub use walker::FileWalker;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::logging::LogSink;

/// One source file read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the scan root, always `/`-separated
    pub relative_path: String,
    pub text: String,
}

pub struct Scanner {
    root: PathBuf,
    walker: FileWalker,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, walker: FileWalker) -> Self {
        Self {
            root: root.into(),
            walker,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let walker = FileWalker::new(&config.extensions)
            .with_excludes(&config.exclude)?
            .skip_dir(config.output_dir.clone())
            .respect_gitignore(config.respect_gitignore);
        Ok(Self::new(config.source_root.clone(), walker))
    }

    /// Reads every matching file under the root. Unreadable or non-UTF-8
    /// files are logged and skipped.
    pub fn scan(&self, log: &dyn LogSink) -> Result<Vec<SourceFile>> {
        log.info(&format!("Parsing directory: {}", self.root.display()));

        let paths = self.walker.walk(&self.root, log)?;
        let mut files = Vec::with_capacity(paths.len());

        for path in paths {
            let relative_path = relative_path(&self.root, &path);
            match fs::read_to_string(&path) {
                Ok(text) => {
                    log.debug(&format!("\t{}  ({} bytes)", relative_path, text.len()));
                    files.push(SourceFile {
                        relative_path,
                        text,
                    });
                }
                Err(e) => log.warn(&format!("Skipping {}: {}", relative_path, e)),
            }
        }

        Ok(files)
    }
}

/// `path` relative to `root`, with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
