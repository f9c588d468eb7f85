// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page component tree.
//!
//! Builds a page with a portal and two same-origin frames (one nested), marks
//! a third frame cross-origin, and prints the logical component tree.
//!
//! Run:
//! - `cargo run -p understory_demos --example analytics_components_tree`

use understory_analytics::adapters::html::HtmlPage;
use understory_analytics::{Analytics, ComponentDescriptor};

const PAGE: &str = r#"
    <div id="app" data-awsui-analytics='{"component":{"name":"AppLayout"}}'>
        <div data-awsui-analytics='{"component":{"name":"Table","label":"h2","properties":{"variant":"full-page"}}}'>
            <h2>Instances</h2>
            <span id="filter-anchor"></span>
        </div>
        <iframe id="help"></iframe>
        <iframe id="ads"></iframe>
    </div>
    <div data-awsui-referrer-id="filter-anchor">
        <div data-awsui-analytics='{"component":{"name":"Autosuggest","label":"input"}}'>
            <input aria-label="Filter instances">
        </div>
    </div>
"#;

const HELP: &str = r#"
    <div data-awsui-analytics='{"component":{"name":"HelpPanel","label":"h2"}}'>
        <h2>Help</h2>
        <iframe></iframe>
    </div>
"#;

const VIDEO: &str = r#"<div data-awsui-analytics='{"component":{"name":"Video","label":"figcaption"}}'><figcaption>Getting started</figcaption></div>"#;

fn print_tree(nodes: &[ComponentDescriptor], depth: usize) {
    for node in nodes {
        let label = node.detail.label.as_deref().unwrap_or("-");
        println!("{:indent$}{} ({label})", "", node.detail.name, indent = depth * 2);
        print_tree(&node.children, depth + 1);
    }
}

fn main() {
    let mut page = HtmlPage::parse(PAGE);
    let main_doc = page.main_document();
    if let Some(help) = page.attach_frame(main_doc, "#help", HELP) {
        page.attach_frame(help, "iframe", VIDEO);
    }
    page.attach_cross_origin_frame(main_doc, "#ads");
    println!("documents: {}", page.document_count());

    let analytics = Analytics::new(true);
    let Some(any) = page.select("#app") else {
        return;
    };
    println!("== Document tree ==");
    print_tree(&analytics.document_components_tree(Some(&any)), 0);

    println!("\n== Inside #app (exclusive) ==");
    print_tree(&analytics.components_tree(Some(&any)), 0);

    analytics.set_active(false);
    println!(
        "\ninactive scan is empty: {}",
        analytics.document_components_tree(Some(&any)).is_empty()
    );
}
