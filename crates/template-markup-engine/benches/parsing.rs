use criterion::{Criterion, criterion_group, criterion_main};
use template_markup_engine::{parse_markup, serialize, to_html};
mod common;

fn bench_parse_and_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let content = common::generate_template_content(100);
    group.bench_function("parse_markup", |b| {
        b.iter(|| {
            let doc = parse_markup(std::hint::black_box(&content));
            std::hint::black_box(doc);
        });
    });

    let doc = parse_markup(&content);
    group.bench_function("serialize", |b| {
        b.iter(|| std::hint::black_box(serialize(std::hint::black_box(&doc))));
    });
    group.bench_function("to_html", |b| {
        b.iter(|| std::hint::black_box(to_html(std::hint::black_box(&doc))));
    });

    group.finish();
}

criterion_group!(benches, bench_parse_and_serialize);
criterion_main!(benches);
