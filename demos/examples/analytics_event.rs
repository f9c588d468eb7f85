// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Analytics event metadata.
//!
//! Annotates a small page the way a component library would, then resolves
//! the structured event for a click on a button rendered inside a portal.
//!
//! Run:
//! - `cargo run -p understory_demos --example analytics_event`

use understory_analytics::adapters::html::HtmlPage;
use understory_analytics::{
    ComponentFragment, LabelIdentifier, LabelRoot, MetadataFragment, activate_analytics_metadata,
    get_analytics_metadata_attribute, get_generated_analytics_metadata,
    get_raw_analytics_metadata,
};

fn attribute_html(fragment: &MetadataFragment) -> String {
    get_analytics_metadata_attribute(fragment)
        .into_iter()
        .map(|(name, value)| format!("{name}='{value}'"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() {
    activate_analytics_metadata(true);

    let dropdown = MetadataFragment {
        component: Some(ComponentFragment {
            name: Some("awsui.ButtonDropdown".into()),
            label: Some(LabelIdentifier::selector(".trigger")),
            ..ComponentFragment::default()
        }),
        ..MetadataFragment::default()
    };
    let item = MetadataFragment {
        action: Some("click".into()),
        detail: serde_json::json!({
            "id": "delete",
            "label": "",
            "sectionLabel": { "selector": "h3", "rootSelector": ".section" },
        })
        .as_object()
        .cloned(),
        component: Some(ComponentFragment {
            label: Some(LabelIdentifier {
                root: Some(LabelRoot::Body),
                selector: Some("h1".into()),
                root_selector: None,
            }),
            ..ComponentFragment::default()
        }),
    };

    let html = format!(
        r#"
        <h1>Files</h1>
        <div {dropdown}>
            <button class="trigger">Actions</button>
            <span id="menu-anchor"></span>
        </div>
        <div data-awsui-referrer-id="menu-anchor">
            <div class="section">
                <h3>Danger zone</h3>
                <button id="delete" {item}>Delete</button>
            </div>
        </div>
        "#,
        dropdown = attribute_html(&dropdown),
        item = attribute_html(&item),
    );
    let page = HtmlPage::parse(&html);
    let Some(target) = page.select("#delete") else {
        return;
    };

    let metadata = get_generated_analytics_metadata(Some(&target));
    println!("== Generated metadata ==");
    match serde_json::to_string_pretty(&metadata) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("could not serialize: {err}"),
    }

    let raw = get_raw_analytics_metadata(Some(&target));
    println!("\n== Raw fragments ({}) ==", raw.metadata.len());
    for fragment in &raw.metadata {
        println!("  {}", serde_json::Value::Object(fragment.clone()));
    }
    println!("label selectors: {:?}", raw.label_selectors);
}
