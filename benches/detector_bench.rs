use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use typographer::detector::{detect, Detector};
use typographer::rewriter::rewrite;
use typographer::{Mode, ReplacementTable};

/// Roughly 1MB of markup with a problem character every few words
fn generate_document() -> String {
    let paragraph = "<p>\u{201C}Quoted\u{201D} text \u{2014} with an ellipsis\u{2026} and \u{00BD} a fraction.</p>\n";
    let plain = "<p>Plain ASCII paragraph with nothing interesting in it at all.</p>\n";
    let mut doc = String::new();
    while doc.len() < 1_000_000 {
        doc.push_str(paragraph);
        doc.push_str(plain);
        doc.push_str(plain);
    }
    doc
}

fn bench_detection(c: &mut Criterion) {
    let table = ReplacementTable::default();
    let doc = generate_document();

    let mut group = c.benchmark_group("detection");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    group.sample_size(20);

    // WHY: compile per call, as the plugin does for every event
    group.bench_function("detect", |b| {
        b.iter(|| black_box(detect(black_box(&doc), &table).unwrap().len()))
    });

    let detector = Detector::new(&table).unwrap();
    group.bench_function("detect_precompiled", |b| {
        b.iter(|| black_box(detector.find_all(black_box(&doc)).len()))
    });

    group.finish();
}

fn bench_rewrite(c: &mut Criterion) {
    let table = ReplacementTable::default();
    let doc = generate_document();
    let spans = detect(&doc, &table).unwrap();

    let mut group = c.benchmark_group("rewrite");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    group.sample_size(10);

    for mode in [Mode::Replace, Mode::Escape] {
        group.bench_function(mode.as_str(), |b| {
            b.iter(|| black_box(rewrite(black_box(&doc), &spans, mode, &table).count))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detection, bench_rewrite);
criterion_main!(benches);
