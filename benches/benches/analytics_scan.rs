// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_analytics::Analytics;
use understory_analytics::adapters::html::HtmlPage;
use understory_benches::{nested_components, portal_page};

fn bench_components_tree(c: &mut Criterion) {
    let analytics = Analytics::new(true);
    let mut group = c.benchmark_group("components_tree");
    for count in [16_usize, 64, 256] {
        let page = HtmlPage::parse(&portal_page(count));
        let Some(root) = page.select("#root") else {
            continue;
        };
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("portals_{count}"), |b| {
            b.iter(|| black_box(analytics.components_tree(Some(black_box(&root)))));
        });
    }
    group.finish();
}

fn bench_document_tree(c: &mut Criterion) {
    let analytics = Analytics::new(true);
    let page = HtmlPage::parse(&nested_components(32));
    let Some(target) = page.select("#target") else {
        return;
    };
    c.bench_function("document_components_tree/nested_32", |b| {
        b.iter(|| black_box(analytics.document_components_tree(Some(black_box(&target)))));
    });
}

criterion_group!(benches, bench_components_tree, bench_document_tree);
criterion_main!(benches);
