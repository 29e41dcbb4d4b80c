//! Brace-depth chomping of CSS/SCSS source into atoms.
//!
//! Every character is consumed in order. Text before the first `{` of an atom
//! is its selector buffer, text from that `{` up to the `}` that brings the
//! depth back to zero is its declaration. Nested blocks stay inside the
//! declaration of the outer atom.

use std::iter::FusedIterator;
use std::str::CharIndices;

use crate::error::{ChompError, MalformedTag};
use crate::model::SourceAtom;

use super::tags::extract_tags;

/// Chomps `source` lazily, yielding atoms in the order their blocks close.
pub fn chomp(source: &str) -> Chomper<'_> {
    Chomper::new(source)
}

/// Iterator over the atoms of one source text.
///
/// Buffers are byte ranges into the source, so nothing is copied until an
/// atom is finalized. After an [`ChompError::UnterminatedBlock`] the iterator
/// is exhausted; an [`ChompError::UnmatchedClose`] drops the text consumed so
/// far and chomping continues.
pub struct Chomper<'a> {
    source: &'a str,
    chars: CharIndices<'a>,
    /// Start of the raw buffer of the current atom
    atom_start: usize,
    /// Offset of the first `{`; only meaningful while `depth > 0`
    declaration_start: usize,
    depth: usize,
    line: usize,
    atom_line: usize,
    declaration_line: usize,
    finished: bool,
}

impl<'a> Chomper<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices(),
            atom_start: 0,
            declaration_start: 0,
            depth: 0,
            line: 1,
            atom_line: 1,
            declaration_line: 1,
            finished: false,
        }
    }

    /// Source text not claimed by any atom or error so far. Once the iterator
    /// is exhausted this is the trailing text after the last closed block.
    pub fn remainder(&self) -> &'a str {
        &self.source[self.atom_start..]
    }

    fn finalize(&self, end: usize) -> SourceAtom {
        let selector_text = &self.source[self.atom_start..self.declaration_start];
        let extracted = extract_tags(selector_text);

        let malformed = extracted
            .malformed
            .into_iter()
            .map(|m| MalformedTag {
                line: m.line + self.atom_line - 1,
                text: m.text,
            })
            .collect();

        SourceAtom {
            selector: extracted.selector,
            tags: extracted.tags,
            declaration: self.source[self.declaration_start..end].to_string(),
            raw_text: self.source[self.atom_start..end].to_string(),
            source_file: String::new(),
            line: self.declaration_line,
            malformed,
        }
    }

    fn reset(&mut self, next_start: usize) {
        self.atom_start = next_start;
        self.depth = 0;
        self.atom_line = self.line;
    }
}

impl Iterator for Chomper<'_> {
    type Item = Result<SourceAtom, ChompError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some((offset, ch)) = self.chars.next() {
            let line = self.line;
            match ch {
                '\n' => self.line += 1,
                '{' => {
                    if self.depth == 0 {
                        self.declaration_start = offset;
                        self.declaration_line = line;
                    }
                    self.depth += 1;
                }
                '}' => {
                    let end = offset + 1;
                    if self.depth == 0 {
                        let partial = self.source[self.atom_start..end].to_string();
                        self.reset(end);
                        return Some(Err(ChompError::UnmatchedClose { line, partial }));
                    }

                    self.depth -= 1;
                    if self.depth == 0 {
                        let atom = self.finalize(end);
                        self.reset(end);
                        return Some(Ok(atom));
                    }
                }
                _ => {}
            }
        }

        self.finished = true;
        if self.depth > 0 {
            let error = ChompError::UnterminatedBlock {
                depth: self.depth,
                line: self.declaration_line,
                partial: self.source[self.atom_start..].to_string(),
            };
            self.atom_start = self.source.len();
            self.depth = 0;
            return Some(Err(error));
        }

        None
    }
}

impl FusedIterator for Chomper<'_> {}
