// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_analytics::Analytics;
use understory_analytics::adapters::html::HtmlPage;
use understory_benches::nested_components;

fn bench_generated_metadata(c: &mut Criterion) {
    let analytics = Analytics::new(true);
    let mut group = c.benchmark_group("generated_metadata");
    for depth in [4_usize, 16, 64] {
        let page = HtmlPage::parse(&nested_components(depth));
        let Some(target) = page.select("#target") else {
            continue;
        };
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("depth_{depth}"), |b| {
            b.iter(|| black_box(analytics.generated_metadata(Some(black_box(&target)))));
        });
    }
    group.finish();
}

fn bench_raw_metadata(c: &mut Criterion) {
    let analytics = Analytics::new(true);
    let page = HtmlPage::parse(&nested_components(16));
    let Some(target) = page.select("#target") else {
        return;
    };
    c.bench_function("raw_metadata/depth_16", |b| {
        b.iter(|| black_box(analytics.raw_metadata(Some(black_box(&target)))));
    });
}

criterion_group!(benches, bench_generated_metadata, bench_raw_metadata);
criterion_main!(benches);
