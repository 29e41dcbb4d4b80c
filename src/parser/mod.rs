//! Atom parsing: brace chomping plus comment tag extraction.

pub mod chomper;
pub mod tags;

pub use chomper::{chomp, Chomper};
pub use tags::{extract_tags, ExtractedTags};

use serde::Serialize;

use crate::error::{ChompError, MalformedTag};
use crate::model::{DocumentedFile, SourceAtom};

/// Outcome of parsing one source file
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedFile {
    pub path: String,
    /// Documented atoms only, in document order
    pub atoms: Vec<SourceAtom>,
    /// Number of atoms dropped because they carried no tags
    pub undocumented: usize,
    pub errors: Vec<ChompError>,
    /// Malformed tags from every atom, documented or not
    pub malformed: Vec<MalformedTag>,
}

impl ParsedFile {
    pub fn documented_count(&self) -> usize {
        self.atoms.len()
    }

    /// Drops the diagnostics; `None` when the file has nothing to document.
    pub fn into_documented(self) -> Option<DocumentedFile> {
        if self.atoms.is_empty() {
            return None;
        }
        Some(DocumentedFile {
            path: self.path,
            atoms: self.atoms,
        })
    }
}

/// Chomps one file, tags every atom with `path` and keeps the documented ones.
///
/// Errors never stop the file: an unmatched `}` drops the text before it and
/// an unterminated block drops the trailing partial atom.
pub fn parse_source(path: &str, text: &str) -> ParsedFile {
    let mut parsed = ParsedFile {
        path: path.to_string(),
        ..Default::default()
    };

    for result in chomp(text) {
        match result {
            Ok(atom) => {
                parsed.malformed.extend(atom.malformed.iter().cloned());
                if atom.is_documented() {
                    parsed.atoms.push(atom.with_source_file(path));
                } else {
                    parsed.undocumented += 1;
                }
            }
            Err(err) => parsed.errors.push(err),
        }
    }

    parsed
}
