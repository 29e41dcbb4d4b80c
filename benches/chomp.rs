//! Benchmarks for chomping and tag extraction.
//!
//! Run with: `cargo bench --bench chomp`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use css_doc::{chomp, extract_tags, parse_files, parse_source, SourceFile};

/// One documented component with nested SCSS rules.
const COMPONENT: &str = r#"/**
 * Card container
 * @description Surface for grouped content.
 *   Cards stack vertically on small screens.
 * @example <div class="card"><div class="card__body">Hi</div></div>
 * @version 4.0
 */
.card {
  border: 1px solid #ddd;

  &__body { padding: 1rem; }

  @media (min-width: 40em) {
    &__body { padding: 2rem; }
  }
}

.card--flat { box-shadow: none; }

// @description Card heading
// @class typography
.card__title { font-weight: 600; }
"#;

fn stylesheet(components: usize) -> String {
    COMPONENT.repeat(components)
}

fn bench_chomp(c: &mut Criterion) {
    let mut group = c.benchmark_group("chomp");

    for components in [10, 100, 1000] {
        let source = stylesheet(components);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(components),
            &source,
            |b, source| b.iter(|| chomp(black_box(source)).count()),
        );
    }

    group.finish();
}

fn bench_extract_tags(c: &mut Criterion) {
    let selector = "/**\n * Card container\n * @description Surface for grouped content.\n *   Cards stack vertically.\n * @example <div class=\"card\"></div>\n */\n.card,\n.panel ";

    c.bench_function("extract_tags", |b| {
        b.iter(|| extract_tags(black_box(selector)))
    });
}

fn bench_parse_files(c: &mut Criterion) {
    let files: Vec<SourceFile> = (0..64)
        .map(|i| SourceFile {
            relative_path: format!("components/_c{}.scss", i),
            text: stylesheet(50),
        })
        .collect();

    let mut group = c.benchmark_group("parse_files");
    group.bench_function("sequential", |b| {
        b.iter(|| {
            files
                .iter()
                .map(|f| parse_source(&f.relative_path, &f.text))
                .count()
        })
    });
    group.bench_function("parallel", |b| b.iter(|| parse_files(black_box(&files)).len()));
    group.finish();
}

criterion_group!(benches, bench_chomp, bench_extract_tags, bench_parse_files);
criterion_main!(benches);
