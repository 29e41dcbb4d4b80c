pub mod config;
pub mod error;
pub mod generate;
pub mod logging;
pub mod model;
pub mod parser;
pub mod render;
pub mod scanner;

pub use config::{Config, CONFIG_FILENAME};
pub use error::{ChompError, CssDocError, MalformedTag, Result};
pub use generate::{parse_files, BuildSummary, FileError, Generator, REPORT_FILENAME};
pub use logging::{LogLevel, LogSink, TracingLog};
pub use model::{DocumentedFile, SourceAtom, Tags, MAIN_DESCRIPTION};
pub use parser::{chomp, extract_tags, parse_source, Chomper, ExtractedTags, ParsedFile};
pub use render::{Renderer, Report, DEFAULT_TEMPLATE};
pub use scanner::{FileWalker, Scanner, SourceFile};
