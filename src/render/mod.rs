//! HTML report rendering with minijinja.
//!
//! Templates receive `title`, `stylesheets`, `atom_count` and `files`. Each
//! file has `path` and `atoms`; each atom exposes `selector`, `line`,
//! `source_file`, `declaration`, `raw_text`, the `tags` map, `tag_list` (every
//! tag as `{key, value}` in source order) and `extra_tags` (the tags the
//! built-in template has no dedicated section for).

use std::fs;
use std::path::Path;

use minijinja::{context, Environment};
use serde::Serialize;

use crate::error::Result;
use crate::model::{
    DocumentedFile, SourceAtom, Tags, MAIN_DESCRIPTION, TAG_CLASS, TAG_DESCRIPTION, TAG_EXAMPLE,
    TAG_VERSION,
};

/// Built-in report template
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/report.html");

// The `.html` suffix turns on HTML auto-escaping for custom templates too.
const TEMPLATE_NAME: &str = "report.html";

const DEDICATED_TAGS: &[&str] = &[
    MAIN_DESCRIPTION,
    TAG_DESCRIPTION,
    TAG_EXAMPLE,
    TAG_VERSION,
    TAG_CLASS,
];

/// Everything a template renders
pub struct Report<'a> {
    pub title: &'a str,
    /// Stylesheet hrefs, relative to the report file
    pub stylesheets: &'a [String],
    pub files: &'a [DocumentedFile],
}

#[derive(Serialize)]
struct FileView<'a> {
    path: &'a str,
    atoms: Vec<AtomView<'a>>,
}

#[derive(Serialize)]
struct AtomView<'a> {
    selector: &'a str,
    source_file: &'a str,
    line: usize,
    declaration: &'a str,
    raw_text: &'a str,
    tags: &'a Tags,
    tag_list: Vec<TagView<'a>>,
    extra_tags: Vec<TagView<'a>>,
}

#[derive(Serialize)]
struct TagView<'a> {
    key: &'a str,
    value: &'a str,
}

impl<'a> AtomView<'a> {
    fn new(atom: &'a SourceAtom) -> Self {
        let tag_list: Vec<TagView<'a>> = atom
            .tags
            .iter()
            .map(|(key, value)| TagView { key, value })
            .collect();
        let extra_tags = atom
            .tags
            .iter()
            .filter(|(key, _)| !DEDICATED_TAGS.contains(&key.as_str()))
            .map(|(key, value)| TagView { key, value })
            .collect();

        Self {
            selector: atom.display_selector(),
            source_file: &atom.source_file,
            line: atom.line,
            declaration: &atom.declaration,
            raw_text: &atom.raw_text,
            tags: &atom.tags,
            tag_list,
            extra_tags,
        }
    }
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Renderer using the built-in template.
    pub fn new() -> Result<Self> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_source(source)
    }

    /// Compiles `source`; syntax errors surface here rather than at render time.
    pub fn from_source(source: impl Into<String>) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source.into())?;
        Ok(Self { env })
    }

    pub fn render(&self, report: &Report<'_>) -> Result<String> {
        let files: Vec<FileView<'_>> = report
            .files
            .iter()
            .map(|file| FileView {
                path: &file.path,
                atoms: file.atoms.iter().map(AtomView::new).collect(),
            })
            .collect();
        let atom_count: usize = report.files.iter().map(|f| f.atoms.len()).sum();

        let template = self.env.get_template(TEMPLATE_NAME)?;
        let html = template.render(context! {
            title => report.title,
            stylesheets => report.stylesheets,
            atom_count => atom_count,
            files => files,
        })?;
        Ok(html)
    }
}
