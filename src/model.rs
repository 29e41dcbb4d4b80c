//! Documentation records produced by the parser and consumed by the renderer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::MalformedTag;

/// Key that collects comment text found before the first explicit `@key`.
pub const MAIN_DESCRIPTION: &str = "main_description";

pub const TAG_DESCRIPTION: &str = "description";
pub const TAG_EXAMPLE: &str = "example";
pub const TAG_VERSION: &str = "version";
pub const TAG_CLASS: &str = "class";

/// Extracted `@key -> value` pairs, in first-appearance order.
pub type Tags = IndexMap<String, String>;

/// One selector + declaration block with the tags found in its comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAtom {
    /// Selector text with comment lines stripped
    pub selector: String,
    pub tags: Tags,
    /// Brace-delimited block, both braces included
    pub declaration: String,
    /// Everything consumed for this atom: comments, selector and declaration
    pub raw_text: String,
    /// Relative path of the originating file, empty until the caller sets it
    #[serde(default)]
    pub source_file: String,
    /// 1-based line of the opening brace
    pub line: usize,
    #[serde(skip)]
    pub malformed: Vec<MalformedTag>,
}

impl SourceAtom {
    /// Atoms without tags carry no documentation and are dropped before rendering.
    pub fn is_documented(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn main_description(&self) -> Option<&str> {
        self.tag(MAIN_DESCRIPTION)
    }

    pub fn description(&self) -> Option<&str> {
        self.tag(TAG_DESCRIPTION)
    }

    pub fn example(&self) -> Option<&str> {
        self.tag(TAG_EXAMPLE)
    }

    /// Selector with surrounding whitespace removed, for display.
    pub fn display_selector(&self) -> &str {
        self.selector.trim()
    }

    pub fn with_source_file(mut self, path: impl Into<String>) -> Self {
        self.source_file = path.into();
        self
    }
}

/// The documented atoms of one source file, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentedFile {
    pub path: String,
    pub atoms: Vec<SourceAtom>,
}
