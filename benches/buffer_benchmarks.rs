//! Benchmarks for text buffer operations.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quill_buffer::TextBuffer;

/// Generates a buffer text of `lines` lines, mixing ASCII and CJK.
fn generate_text(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("Line {}: sample text \u{793a}\u{4f8b} for benchmarking purposes.\n", i))
        .collect()
}

/// Benchmarks buffer creation.
fn bench_buffer_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_creation");

    for size in [10, 100, 1000].iter() {
        let text = generate_text(*size);

        group.bench_with_input(BenchmarkId::new("from_string", size), &text, |b, text| {
            b.iter(|| {
                let buffer = TextBuffer::from(black_box(text.as_str()));
                black_box(buffer)
            })
        });
    }

    group.finish();
}

/// Benchmarks positional insertion.
fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");

    let base_text = generate_text(900);

    group.bench_function("insert_line_at_start", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                buffer.insert_line(0, black_box("inserted line")).unwrap();
                black_box(buffer)
            },
        )
    });

    group.bench_function("insert_substring_mid_line", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                buffer
                    .insert_substring(450, 20, black_box("inserted text"))
                    .unwrap();
                black_box(buffer)
            },
        )
    });

    group.bench_function("insert_at_global_end", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                let end = buffer.global_len();
                buffer.insert_at_global(end, black_box("tail")).unwrap();
                black_box(buffer)
            },
        )
    });

    group.finish();
}

/// Benchmarks pattern-wide edits.
fn bench_replace(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace");

    let base_text = generate_text(1000);

    group.bench_function("replace_all", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                let count = buffer.replace_all(black_box("sample"), "example").unwrap();
                black_box(count)
            },
        )
    });

    group.bench_function("delete_substring", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                let count = buffer.delete_substring(black_box("\u{793a}")).unwrap();
                black_box(count)
            },
        )
    });

    group.finish();
}

/// Benchmarks search and statistics.
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    let buffer = TextBuffer::from(generate_text(1000).as_str());

    group.bench_function("find_count", |b| {
        b.iter(|| {
            let count = buffer.find_count(black_box("Line")).unwrap();
            black_box(count)
        })
    });

    group.bench_function("find_all", |b| {
        b.iter(|| {
            let matches = buffer.find_all(black_box("\u{4f8b} for")).unwrap();
            black_box(matches)
        })
    });

    group.bench_function("statistics", |b| {
        b.iter(|| black_box(buffer.statistics()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_buffer_creation,
    bench_insertion,
    bench_replace,
    bench_search,
);

criterion_main!(benches);
