use std::str::FromStr;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ringclip::{Timestamp, sanitize};

fn bench_timestamp_parse(c: &mut Criterion) {
    c.bench_function("timestamp_parse", |b| {
        b.iter(|| Timestamp::from_str(black_box("12:34:567")))
    });
}

fn bench_sanitize_title(c: &mut Criterion) {
    let title = "My Song (Live) ☺ 2024 remaster / rough cut #3 ".repeat(8);
    c.bench_function("sanitize_title", |b| {
        b.iter(|| sanitize(black_box(&title)))
    });
}

criterion_group!(benches, bench_timestamp_parse, bench_sanitize_title);
criterion_main!(benches);
