//! Report build pipeline: copy stylesheets, scan and parse sources, render,
//! write `output.html` and copy asset directories.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{ChompError, CssDocError, Result};
use crate::logging::LogSink;
use crate::model::DocumentedFile;
use crate::parser::{parse_source, ParsedFile};
use crate::render::{Renderer, Report};
use crate::scanner::{Scanner, SourceFile};

/// File name of the rendered report inside the output directory
pub const REPORT_FILENAME: &str = "output.html";

/// A structural parse error, tagged with the file it came from
#[derive(Debug, Clone, Serialize)]
pub struct FileError {
    pub path: String,
    pub error: ChompError,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildSummary {
    pub files_scanned: usize,
    pub files_documented: usize,
    pub atoms_documented: usize,
    pub errors: Vec<FileError>,
    /// Stylesheet names copied into the output directory
    pub stylesheets: Vec<String>,
    /// `None` when nothing was documented and no report was written
    pub output_file: Option<PathBuf>,
}

/// Parses every file independently on the rayon pool. Output order matches
/// input order.
pub fn parse_files(files: &[SourceFile]) -> Vec<ParsedFile> {
    files
        .par_iter()
        .map(|file| parse_source(&file.relative_path, &file.text))
        .collect()
}

pub struct Generator<'a> {
    config: &'a Config,
    log: &'a dyn LogSink,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Config, log: &'a dyn LogSink) -> Self {
        Self { config, log }
    }

    pub fn run(&self) -> Result<BuildSummary> {
        self.config.validate()?;

        let renderer = match &self.config.template {
            Some(path) => {
                self.log.info(&format!("Using template {}", path.display()));
                Renderer::from_file(path)?
            }
            None => Renderer::new()?,
        };

        self.prepare_output_dir()?;

        let mut summary = BuildSummary {
            stylesheets: self.copy_stylesheets()?,
            ..Default::default()
        };

        let sources = Scanner::from_config(self.config)?.scan(self.log)?;
        summary.files_scanned = sources.len();

        let mut documented: Vec<DocumentedFile> = Vec::new();
        for parsed in parse_files(&sources) {
            for error in &parsed.errors {
                self.log.warn(&format!("{}: {}", parsed.path, error));
                summary.errors.push(FileError {
                    path: parsed.path.clone(),
                    error: error.clone(),
                });
            }
            for malformed in &parsed.malformed {
                self.log.debug(&format!("{}: {}", parsed.path, malformed));
            }
            if let Some(file) = parsed.into_documented() {
                summary.atoms_documented += file.atoms.len();
                documented.push(file);
            }
        }
        summary.files_documented = documented.len();

        let html = renderer.render(&Report {
            title: &self.config.title,
            stylesheets: &summary.stylesheets,
            files: &documented,
        })?;

        if summary.atoms_documented > 0 {
            let output_file = self.config.output_dir.join(REPORT_FILENAME);
            fs::write(&output_file, html)?;
            self.log.info(&format!(
                "Wrote {} documented rules from {} files to {}",
                summary.atoms_documented,
                summary.files_documented,
                output_file.display()
            ));
            summary.output_file = Some(output_file);
        } else {
            self.log.warn("No documented rules found; report not written");
        }

        self.copy_assets()?;

        Ok(summary)
    }

    fn prepare_output_dir(&self) -> Result<()> {
        let output_dir = &self.config.output_dir;
        self.log.info(&format!("Output to {}", output_dir.display()));

        if self.config.clean_output && output_dir.exists() {
            if contains_path(output_dir, &self.config.source_root) {
                return Err(CssDocError::Config(format!(
                    "refusing to clean output directory `{}`: it contains the source root",
                    output_dir.display()
                )));
            }
            fs::remove_dir_all(output_dir)?;
        }

        fs::create_dir_all(output_dir)?;
        Ok(())
    }

    /// Copies configured stylesheets as `style1.css`, `style2.css`, ... The
    /// number follows the position in the settings, missing files are skipped.
    fn copy_stylesheets(&self) -> Result<Vec<String>> {
        let mut copied = Vec::new();

        for (idx, source) in self.config.stylesheets.iter().enumerate() {
            if !source.is_file() {
                self.log.warn(&format!("Stylesheet {} not found, skipping", source.display()));
                continue;
            }

            let name = format!("style{}.css", idx + 1);
            fs::copy(source, self.config.output_dir.join(&name))?;
            self.log.info(&format!("{} --> {}", source.display(), name));
            copied.push(name);
        }

        Ok(copied)
    }

    fn copy_assets(&self) -> Result<()> {
        if self.config.assets.is_empty() {
            return Ok(());
        }

        self.log.info("Copying assets");
        for asset_dir in &self.config.assets {
            let Some(name) = asset_dir.file_name() else {
                self.log.warn(&format!(
                    "Asset path {} has no name, skipping",
                    asset_dir.display()
                ));
                continue;
            };
            if !asset_dir.is_dir() {
                self.log.warn(&format!(
                    "Asset directory {} not found, skipping",
                    asset_dir.display()
                ));
                continue;
            }

            let target = self.config.output_dir.join(name);
            self.log.info(&format!("{} --> {}", asset_dir.display(), target.display()));
            copy_dir(asset_dir, &target)?;
        }

        Ok(())
    }
}

fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| CssDocError::Scan(e.to_string()))?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Whether `inner` is `outer` or lives below it. Falls back to a lexical
/// check when either path cannot be canonicalized.
fn contains_path(outer: &Path, inner: &Path) -> bool {
    match (outer.canonicalize(), inner.canonicalize()) {
        (Ok(outer), Ok(inner)) => inner.starts_with(outer),
        _ => inner.starts_with(outer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use tempfile::TempDir;

    fn quiet(_: LogLevel, _: &str) {}

    #[test]
    fn test_parse_files_preserves_order() {
        let sources: Vec<SourceFile> = (0..32)
            .map(|i| SourceFile {
                relative_path: format!("f{:02}.scss", i),
                text: format!("// @description rule {}\n.r{} {{ }}", i, i),
            })
            .collect();

        let parsed = parse_files(&sources);

        assert_eq!(parsed.len(), 32);
        for (i, file) in parsed.iter().enumerate() {
            assert_eq!(file.path, format!("f{:02}.scss", i));
            assert_eq!(
                file.atoms[0].description(),
                Some(format!("rule {}", i).as_str())
            );
        }
    }

    #[test]
    fn test_clean_refuses_when_output_contains_sources() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            source_root: temp_dir.path().join("site/scss"),
            output_dir: temp_dir.path().join("site"),
            ..Default::default()
        };
        fs::create_dir_all(&config.source_root).unwrap();

        let err = Generator::new(&config, &quiet).run().unwrap_err();

        assert!(matches!(err, CssDocError::Config(_)));
        assert!(config.source_root.exists());
    }

    #[test]
    fn test_copy_dir_is_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("img");
        fs::create_dir_all(from.join("icons")).unwrap();
        fs::write(from.join("logo.svg"), "<svg/>").unwrap();
        fs::write(from.join("icons/close.svg"), "<svg/>").unwrap();

        let to = temp_dir.path().join("out/img");
        copy_dir(&from, &to).unwrap();

        assert!(to.join("logo.svg").is_file());
        assert!(to.join("icons/close.svg").is_file());
    }
}
