//! Benchmarks for the keyword responder and intent classifier
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use healthdash::{IntentClassifier, KeywordEntry, KeywordResponder, KeywordTable};

fn bench_responder(c: &mut Criterion) {
    let mut group = c.benchmark_group("responder");
    let responder = KeywordResponder::builtin();

    group.bench_function("respond_hit", |b| {
        b.iter(|| responder.respond(black_box("my headache keeps me from sleep")))
    });

    group.bench_function("respond_miss", |b| {
        b.iter(|| responder.respond(black_box("tell me about quantum physics")))
    });

    group.bench_function("explain", |b| {
        b.iter(|| responder.explain(black_box("headache, no sleep, too much stress")))
    });

    let mut table = KeywordTable::builtin();
    for i in 0..500 {
        table
            .push(KeywordEntry::new(format!("topic{}", i), "Generated answer."))
            .unwrap();
    }
    let large = KeywordResponder::new(table);

    group.bench_function("respond_large_table", |b| {
        b.iter(|| large.respond(black_box("what should I know about topic250 and diet")))
    });

    group.finish();
}

fn bench_classifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier");
    let classifier = IntentClassifier::builtin();

    group.bench_function("classify_first_group", |b| {
        b.iter(|| classifier.classify(black_box("please schedule an appointment")))
    });

    group.bench_function("classify_unknown", |b| {
        b.iter(|| classifier.classify(black_box("xyzzy plugh")))
    });

    group.bench_function("interpret", |b| {
        b.iter(|| classifier.interpret(black_box("Open my profile settings")))
    });

    group.finish();
}

criterion_group!(benches, bench_responder, bench_classifier);
criterion_main!(benches);
