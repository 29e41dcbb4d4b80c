use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use css_doc::{
    chomp, parse_files, parse_source, Config, Generator, Scanner, SourceAtom, TracingLog,
    CONFIG_FILENAME,
};

#[derive(Parser)]
#[command(name = "css-doc")]
#[command(about = "Build an HTML style guide from comments in CSS and SCSS sources")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Write a starter cssdoc.toml in the current directory
    css-doc init

    # Build the style guide using ./cssdoc.toml (or defaults)
    css-doc build

    # Build from another source tree into ./public
    css-doc build --root ./scss --output ./public

    # Show what one file documents
    css-doc parse components/_buttons.scss

    # Dump every rule as JSON, documented or not
    css-doc parse components/_buttons.scss --format json --all

    # Fail on unbalanced braces anywhere under ./scss
    css-doc check ./scss
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the HTML report
    Build(BuildArgs),

    /// Parse a single file and print its rules
    Parse {
        /// Stylesheet to parse
        file: PathBuf,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Include rules without documentation comments
        #[arg(long)]
        all: bool,
    },

    /// Report unbalanced braces without writing anything
    Check {
        /// Directory to check (defaults to the configured source root)
        path: Option<PathBuf>,

        /// Path to the settings file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a starter settings file
    Init {
        /// Directory to write cssdoc.toml into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct BuildArgs {
    /// Path to the settings file (defaults to ./cssdoc.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory scanned for stylesheets
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Directory the report is written to
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Custom minijinja template
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Report title
    #[arg(long)]
    pub title: Option<String>,
}

/// Explicit `--config`, else `cssdoc.toml` in the working directory, else defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()));
    }

    match Config::discover(Path::new(".")) {
        Some(path) => {
            tracing::info!("Using settings from {}", path.display());
            Ok(Config::load(&path)?)
        }
        None => {
            tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
            Ok(Config::default())
        }
    }
}

pub fn build(args: &BuildArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(root) = &args.root {
        config.source_root = root.clone();
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(template) = &args.template {
        config.template = Some(template.clone());
    }
    if let Some(title) = &args.title {
        config.title = title.clone();
    }

    let log = TracingLog;
    let summary = Generator::new(&config, &log).run()?;

    println!("Build Summary:");
    println!("  Files scanned: {}", summary.files_scanned);
    println!("  Files documented: {}", summary.files_documented);
    println!("  Rules documented: {}", summary.atoms_documented);
    if !summary.stylesheets.is_empty() {
        println!("  Stylesheets: {}", summary.stylesheets.join(", "));
    }
    if !summary.errors.is_empty() {
        println!("  Structural errors: {}", summary.errors.len());
    }
    match &summary.output_file {
        Some(path) => println!("  Report: {}", path.display()),
        None => println!("  Report: not written (nothing documented)"),
    }

    Ok(())
}

pub fn parse_file(file: &Path, format: &str, all: bool) -> anyhow::Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let path = file.to_string_lossy().replace('\\', "/");

    let parsed = parse_source(&path, &text);
    let atoms: Vec<SourceAtom> = if all {
        chomp(&text)
            .filter_map(|item| item.ok())
            .map(|atom| atom.with_source_file(path.as_str()))
            .collect()
    } else {
        parsed.atoms.clone()
    };

    match format {
        "json" => {
            let output = serde_json::json!({
                "path": path,
                "atoms": atoms,
                "undocumented": parsed.undocumented,
                "errors": parsed.errors,
                "malformed": parsed.malformed,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            if atoms.is_empty() {
                println!("No rules found in {}", path);
            }
            for atom in &atoms {
                println!("{}:{}  {}", path, atom.line, atom.display_selector());
                for (key, value) in &atom.tags {
                    let mut lines = value.lines();
                    println!("    @{}: {}", key, lines.next().unwrap_or(""));
                    for line in lines {
                        println!("        {}", line);
                    }
                }
            }
            for error in &parsed.errors {
                println!("{}:{}: error: {}", path, error.line(), error);
            }
            for malformed in &parsed.malformed {
                println!("{}:{}: warning: {}", path, malformed.line, malformed);
            }
        }
    }

    Ok(())
}

/// Prints one diagnostic per structural error and returns how many were found.
pub fn check(path: Option<PathBuf>, config: Option<&Path>) -> anyhow::Result<usize> {
    let mut config = load_config(config)?;
    if let Some(path) = path {
        config.source_root = path;
    }
    config.validate()?;

    let log = TracingLog;
    let sources = Scanner::from_config(&config)?.scan(&log)?;

    let mut problems = 0;
    for parsed in parse_files(&sources) {
        for error in &parsed.errors {
            println!("{}:{}: {}", parsed.path, error.line(), error);
            problems += 1;
        }
        for malformed in &parsed.malformed {
            println!("{}:{}: warning: {}", parsed.path, malformed.line, malformed);
        }
    }

    if problems == 0 {
        println!("{} files checked, no structural problems", sources.len());
    }

    Ok(problems)
}

pub fn init(dir: &Path, force: bool) -> anyhow::Result<()> {
    let target = dir.join(CONFIG_FILENAME);
    if target.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            target.display()
        );
    }

    fs::create_dir_all(dir)?;
    fs::write(&target, Config::default_toml())?;
    println!("Wrote {}", target.display());
    Ok(())
}
