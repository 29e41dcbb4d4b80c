use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CssDocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Scan error: {0}")]
    Scan(String),
}

pub type Result<T> = std::result::Result<T, CssDocError>;

/// Structural errors raised while chomping a source file into atoms.
///
/// Both variants are local to one file: the offending text is dropped and
/// carried here for diagnostics, everything else in the file still parses.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChompError {
    #[error("unterminated block: input ended at brace depth {depth} (block opened on line {line})")]
    UnterminatedBlock {
        depth: usize,
        line: usize,
        partial: String,
    },

    #[error("unmatched closing brace on line {line}")]
    UnmatchedClose { line: usize, partial: String },
}

impl ChompError {
    /// Raw text that was dropped because of this error.
    pub fn partial(&self) -> &str {
        match self {
            ChompError::UnterminatedBlock { partial, .. } => partial,
            ChompError::UnmatchedClose { partial, .. } => partial,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ChompError::UnterminatedBlock { line, .. } => *line,
            ChompError::UnmatchedClose { line, .. } => *line,
        }
    }
}

/// An `@` inside a comment with no key token after it. Never fatal: the
/// comment line simply produces no tag.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("malformed tag on line {line}: `{text}`")]
pub struct MalformedTag {
    /// 1-based line. Relative to the extracted text, or to the source file
    /// once the atom has been chomped.
    pub line: usize,
    pub text: String,
}
