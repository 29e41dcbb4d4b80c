//! Tag extraction from the comment lines that precede a declaration block.
//!
//! Comment text is read from `//` line comments and `/* */` block comments
//! (which may span several lines). Inside comment text:
//!
//! - `@key value` stores `value` under `key`, overwriting any earlier value
//! - text without `@` is a continuation of the most recent key, joined with `\n`
//! - continuation text seen before any key lands in [`MAIN_DESCRIPTION`]
//! - blank comment lines inside a value are kept, trailing ones are trimmed
//!
//! Lines without any comment are kept as selector text.

use crate::error::MalformedTag;
use crate::model::{Tags, MAIN_DESCRIPTION};

/// Result of running [`extract_tags`] over a selector buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTags {
    /// Non-comment lines joined with `\n`
    pub selector: String,
    pub tags: Tags,
    /// `@` markers without a key; lines are 1-based within the input
    pub malformed: Vec<MalformedTag>,
}

/// Splits `text` into selector lines and comment tags.
pub fn extract_tags(text: &str) -> ExtractedTags {
    let mut extractor = TagExtractor::new();
    for (idx, line) in text.split('\n').enumerate() {
        extractor.feed_line(line, idx + 1);
    }
    extractor.finish()
}

enum Marker {
    Line(usize),
    Block(usize),
}

struct TagExtractor {
    in_block_comment: bool,
    last_key: String,
    tags: Tags,
    selector_lines: Vec<String>,
    malformed: Vec<MalformedTag>,
}

impl TagExtractor {
    fn new() -> Self {
        Self {
            in_block_comment: false,
            last_key: MAIN_DESCRIPTION.to_string(),
            tags: Tags::new(),
            selector_lines: Vec::new(),
            malformed: Vec::new(),
        }
    }

    fn feed_line(&mut self, line: &str, line_no: usize) {
        let mut rest = line;
        let mut had_comment = false;
        let mut kept = String::new();

        if self.in_block_comment {
            had_comment = true;
            match rest.find("*/") {
                Some(end) => {
                    self.fold(block_text(&rest[..end]), line_no);
                    rest = &rest[end + 2..];
                    self.in_block_comment = false;
                }
                None => {
                    self.fold(block_text(rest), line_no);
                    return;
                }
            }
        }

        loop {
            match find_marker(rest) {
                None => {
                    kept.push_str(rest);
                    break;
                }
                Some(Marker::Line(at)) => {
                    had_comment = true;
                    kept.push_str(&rest[..at]);
                    self.fold(line_text(&rest[at + 2..]), line_no);
                    break;
                }
                Some(Marker::Block(at)) => {
                    had_comment = true;
                    kept.push_str(&rest[..at]);
                    let body = &rest[at + 2..];
                    match body.find("*/") {
                        Some(end) => {
                            self.fold(block_text(&body[..end]), line_no);
                            rest = &body[end + 2..];
                        }
                        None => {
                            self.in_block_comment = true;
                            self.fold(block_text(body), line_no);
                            break;
                        }
                    }
                }
            }
        }

        if !had_comment {
            self.selector_lines.push(line.to_string());
            return;
        }

        // Selector text sharing a line with a comment is kept.
        let kept = kept.trim_end();
        if !kept.trim_start().is_empty() {
            self.selector_lines.push(kept.to_string());
        }
    }

    fn fold(&mut self, text: &str, line_no: usize) {
        // Blank lines only separate paragraphs inside a value that has text.
        if text.trim().is_empty() {
            if let Some(value) = self.tags.get_mut(&self.last_key) {
                if !value.is_empty() {
                    value.push('\n');
                }
            }
            return;
        }

        let Some(at) = text.find('@') else {
            let value = self.tags.entry(self.last_key.clone()).or_default();
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(text);
            return;
        };

        let after = &text[at + 1..];
        let key_len = after.find(char::is_whitespace).unwrap_or(after.len());
        let key = &after[..key_len];
        if key.is_empty() {
            self.malformed.push(MalformedTag {
                line: line_no,
                text: text.trim().to_string(),
            });
            return;
        }

        let value = after[key_len..].trim();
        self.tags.insert(key.to_string(), value.to_string());
        self.last_key = key.to_string();
    }

    fn finish(mut self) -> ExtractedTags {
        for value in self.tags.values_mut() {
            let len = value.trim_end_matches('\n').len();
            value.truncate(len);
        }

        ExtractedTags {
            selector: self.selector_lines.join("\n"),
            tags: self.tags,
            malformed: self.malformed,
        }
    }
}

/// Earliest `//` or `/*` outside a quoted string.
fn find_marker(line: &str) -> Option<Marker> {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => {
                i += 2;
                continue;
            }
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'/' if i + 1 < bytes.len() => match bytes[i + 1] {
                    b'/' => return Some(Marker::Line(i)),
                    b'*' => return Some(Marker::Block(i)),
                    _ => {}
                },
                _ => {}
            },
        }
        i += 1;
    }

    None
}

/// Text after a `//` marker: extra slashes (`///`) and one separating space removed.
fn line_text(raw: &str) -> &str {
    let text = raw.trim_start_matches('/');
    text.strip_prefix(' ').unwrap_or(text).trim_end()
}

/// Text of one block comment line: the leading `*` continuation marker and one
/// separating space removed.
fn block_text(raw: &str) -> &str {
    let text = raw.trim_start().trim_start_matches('*');
    text.strip_prefix(' ').unwrap_or(text).trim_end()
}
