//! End-to-end report builds against temporary source trees.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tempfile::TempDir;

use css_doc::{Config, CssDocError, Generator, LogLevel, LogSink, REPORT_FILENAME};

/// Collects log lines so tests can assert on warnings.
#[derive(Default)]
struct RecordingLog {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl LogSink for RecordingLog {
    fn log(&self, level: LogLevel, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

impl RecordingLog {
    fn warnings(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == LogLevel::Warn)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn create_site() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    write(
        root,
        "scss/components/_buttons.scss",
        "// @description Primary button\n// @example <button class=\"btn\">OK</button>\n.btn { color: blue; }\n.btn-reset { all: unset; }\n",
    );
    write(
        root,
        "scss/base/_type.css",
        "/* @description Body copy\n   @version 3 */\nbody { font: 16px/1.5 serif; }\n",
    );
    write(root, "scss/broken.scss", "// @description Half\n.a {\n");
    write(root, "scss/notes.md", "// @description not a stylesheet\n.x { }\n");
    write(root, "dist/main.css", "body{}");
    write(root, "img/logo.svg", "<svg/>");
    write(root, "img/icons/close.svg", "<svg/>");

    temp_dir
}

fn site_config(root: &Path) -> Config {
    Config {
        source_root: root.join("scss"),
        output_dir: root.join("out"),
        title: "Acme UI".to_string(),
        stylesheets: vec![root.join("dist/main.css"), root.join("dist/missing.css")],
        assets: vec![root.join("img")],
        ..Default::default()
    }
}

#[test]
fn test_build_writes_report_stylesheets_and_assets() {
    let temp_dir = create_site();
    let config = site_config(temp_dir.path());
    let log = RecordingLog::default();

    let summary = Generator::new(&config, &log).run().unwrap();

    assert_eq!(summary.files_scanned, 3);
    assert_eq!(summary.files_documented, 2);
    assert_eq!(summary.atoms_documented, 2);
    assert_eq!(summary.stylesheets, vec!["style1.css".to_string()]);

    let out = temp_dir.path().join("out");
    assert_eq!(summary.output_file, Some(out.join(REPORT_FILENAME)));
    assert!(out.join("style1.css").is_file());
    assert!(!out.join("style2.css").exists());
    assert!(out.join("img/logo.svg").is_file());
    assert!(out.join("img/icons/close.svg").is_file());

    let html = fs::read_to_string(out.join(REPORT_FILENAME)).unwrap();
    assert!(html.contains("<title>Acme UI</title>"));
    assert!(html.contains("Primary button"));
    assert!(html.contains("Body copy"));
    assert!(!html.contains("btn-reset"));
    assert!(!html.contains("not a stylesheet"));

    assert!(log.warnings().iter().any(|w| w.contains("missing.css")));
}

#[test]
fn test_structural_errors_are_collected_not_fatal() {
    let temp_dir = create_site();
    let config = site_config(temp_dir.path());
    let log = RecordingLog::default();

    let summary = Generator::new(&config, &log).run().unwrap();

    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].path, "broken.scss");
    assert_eq!(summary.errors[0].error.line(), 2);
    assert!(log.warnings().iter().any(|w| w.starts_with("broken.scss:")));
}

#[test]
fn test_nothing_documented_skips_report() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "scss/plain.css", ".a { }\n.b { }\n");
    let config = Config {
        source_root: temp_dir.path().join("scss"),
        output_dir: temp_dir.path().join("out"),
        ..Default::default()
    };
    let log = RecordingLog::default();

    let summary = Generator::new(&config, &log).run().unwrap();

    assert_eq!(summary.atoms_documented, 0);
    assert!(summary.output_file.is_none());
    assert!(!temp_dir.path().join("out").join(REPORT_FILENAME).exists());
    assert!(log.warnings().iter().any(|w| w.contains("No documented rules")));
}

#[test]
fn test_clean_output_removes_stale_files() {
    let temp_dir = create_site();
    write(temp_dir.path(), "out/stale.html", "old");
    let config = site_config(temp_dir.path());

    Generator::new(&config, &RecordingLog::default()).run().unwrap();
    assert!(!temp_dir.path().join("out/stale.html").exists());

    write(temp_dir.path(), "out/keep.html", "old");
    let config = Config {
        clean_output: false,
        ..site_config(temp_dir.path())
    };
    Generator::new(&config, &RecordingLog::default()).run().unwrap();
    assert!(temp_dir.path().join("out/keep.html").exists());
}

#[test]
fn test_excludes_and_custom_template_from_settings_file() {
    let temp_dir = create_site();
    let root = temp_dir.path();
    write(
        root,
        "templates/list.html",
        "{% for file in files %}{{ file.path|safe }};{% endfor %}",
    );
    write(
        root,
        "cssdoc.toml",
        r#"
source_root = "scss"
output_dir = "out"
template = "templates/list.html"
exclude = ["base/**"]
"#,
    );

    let config = Config::load(&root.join("cssdoc.toml")).unwrap();
    let summary = Generator::new(&config, &RecordingLog::default()).run().unwrap();

    assert_eq!(summary.files_documented, 1);
    let html = fs::read_to_string(root.join("out").join(REPORT_FILENAME)).unwrap();
    assert_eq!(html, "components/_buttons.scss;");
}

#[test]
fn test_default_layout_does_not_scan_its_own_output() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a.scss", "// @description Alert\n.alert { }\n");
    write(root, "dist/site.css", "/* @description Compiled */\n.c { }\n");
    write(
        root,
        "cssdoc.toml",
        "stylesheets = [\"dist/site.css\"]\nclean_output = false\n",
    );

    let config = Config::load(&root.join("cssdoc.toml")).unwrap();
    assert_eq!(config.output_dir, root.join("output"));

    for _ in 0..2 {
        let summary = Generator::new(&config, &RecordingLog::default()).run().unwrap();

        assert_eq!(summary.files_scanned, 2);
        assert_eq!(summary.files_documented, 2);
        assert_eq!(summary.atoms_documented, 2);
    }

    let html = fs::read_to_string(root.join("output").join(REPORT_FILENAME)).unwrap();
    assert!(root.join("output/style1.css").is_file());
    assert!(!html.contains("output/style1.css"));
    assert!(!html.contains("output&#x2f;style1.css"));
}

#[test]
fn test_missing_source_root_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        source_root: temp_dir.path().join("nope"),
        output_dir: temp_dir.path().join("out"),
        ..Default::default()
    };

    let err = Generator::new(&config, &RecordingLog::default())
        .run()
        .unwrap_err();

    assert!(matches!(err, CssDocError::Scan(_) | CssDocError::Io(_)));
}
