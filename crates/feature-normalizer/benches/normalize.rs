//! Normalization benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_normalizer::{normalize, RawInput};

fn full_form() -> RawInput {
    let mut raw = RawInput::new();
    raw.set("subject", "mathematics")
        .set("gender", "female")
        .set("school", 0.0)
        .set("age", "17")
        .set("address", 1.0)
        .set("famsize", 0.0)
        .set("Pstatus", 1.0)
        .set("Medu", "4")
        .set("Fedu", "3")
        .set("traveltime", "2")
        .set("studytime", "3")
        .set("failures", "0")
        .set("schoolsup", "no")
        .set("famsup", "yes")
        .set("paid", "yes")
        .set("activities", "no")
        .set("nursery", "yes")
        .set("higher", "yes")
        .set("internet", "yes")
        .set("romantic", "no")
        .set("famrel", "4")
        .set("freetime", "3")
        .set("goout", "2")
        .set("Dalc", "1")
        .set("Walc", "1")
        .set("health", "5")
        .set("absences", "2")
        .set("Mjob", "health")
        .set("Fjob", "services")
        .set("reason", "course")
        .set("guardian", "mother");
    raw
}

fn bench_normalize(c: &mut Criterion) {
    let raw = full_form();
    c.bench_function("normalize_full_form", |b| {
        b.iter(|| normalize(black_box(&raw)).unwrap())
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
