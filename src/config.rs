//! `cssdoc.toml` settings.
//!
//! Every key is optional. Relative paths are resolved against the directory
//! holding the settings file, so a build behaves the same from any cwd.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CssDocError, Result};

/// Name of the settings file looked up in the working directory
pub const CONFIG_FILENAME: &str = "cssdoc.toml";

const DEFAULT_CONFIG_TOML: &str = r#"# css-doc settings. Relative paths resolve against this file's directory.

# Directory scanned recursively for annotated sources
source_root = "."

# Report directory; `output.html` is written here
output_dir = "output"

# Custom minijinja template (omit to use the built-in report)
# template = "templates/styleguide.html"

title = "Style Guide"

# Compiled stylesheets copied into the report as style1.css, style2.css, ...
stylesheets = []

# Directories copied into the report directory (fonts, images, ...)
assets = []

extensions = ["scss", "css"]

# Glob patterns, matched against paths relative to source_root
exclude = []

# Honour .gitignore and .ignore files, in or outside a git repository.
# The output directory is never scanned.
respect_gitignore = true

# Remove output_dir before building
clean_output = true
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source_root: PathBuf,
    pub output_dir: PathBuf,
    pub template: Option<PathBuf>,
    pub title: String,
    pub stylesheets: Vec<PathBuf>,
    pub assets: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub respect_gitignore: bool,
    pub clean_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("."),
            output_dir: PathBuf::from("output"),
            template: None,
            title: "Style Guide".to_string(),
            stylesheets: Vec::new(),
            assets: Vec::new(),
            extensions: vec!["scss".to_string(), "css".to_string()],
            exclude: Vec::new(),
            respect_gitignore: true,
            clean_output: true,
        }
    }
}

impl Config {
    /// Reads a settings file and resolves its relative paths.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)
            .map_err(|e| CssDocError::Config(format!("{}: {}", path.display(), e)))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_relative_to(base);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CssDocError::Config(e.to_string()))
    }

    /// Returns `dir/cssdoc.toml` when it exists.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(CONFIG_FILENAME);
        candidate.is_file().then_some(candidate)
    }

    /// Commented settings file written by `css-doc init`.
    pub fn default_toml() -> &'static str {
        DEFAULT_CONFIG_TOML
    }

    pub fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        resolve(&mut self.source_root);
        resolve(&mut self.output_dir);
        if let Some(template) = self.template.as_mut() {
            resolve(template);
        }
        self.stylesheets.iter_mut().for_each(resolve);
        self.assets.iter_mut().for_each(resolve);
    }

    pub fn validate(&self) -> Result<()> {
        if self.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(CssDocError::Config(
                "at least one source extension is required".to_string(),
            ));
        }

        for pattern in &self.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                CssDocError::Config(format!("invalid exclude pattern `{}`: {}", pattern, e))
            })?;
        }

        Ok(())
    }
}
