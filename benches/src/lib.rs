// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generated documents shared by the analytics benches.

use serde_json::json;

fn metadata(value: serde_json::Value) -> String {
    // Single-quoted attribute values: escape the quote character only.
    value.to_string().replace('\'', "&#39;")
}

/// A chain of `depth` nested components, each with a labelled header, ending
/// in an element with id `target`.
pub fn nested_components(depth: usize) -> String {
    let mut html = String::new();
    for level in 0..depth {
        let fragment = json!({
            "component": {
                "name": format!("Level{level}"),
                "label": ".header",
                "properties": { "level": level.to_string() },
            },
        });
        html.push_str(&format!(
            "<section data-awsui-analytics='{}'><h2 class='header'>Header {level}</h2>",
            metadata(fragment)
        ));
    }
    let event = json!({
        "action": "click",
        "detail": { "label": { "selector": ".header", "root": "component" }, "position": "1" },
    });
    html.push_str(&format!(
        "<button id='target' data-awsui-analytics='{}'>Go</button>",
        metadata(event)
    ));
    for _ in 0..depth {
        html.push_str("</section>");
    }
    html
}

/// `count` sibling components, every other one rendering its content through
/// a portal placed at the end of the body.
pub fn portal_page(count: usize) -> String {
    let mut body = String::new();
    let mut portals = String::new();
    for i in 0..count {
        let component = metadata(json!({ "component": { "name": "Item", "label": "span" } }));
        body.push_str(&format!(
            "<div data-awsui-analytics='{component}'><span>Item {i}</span><i id='anchor-{i}'></i></div>"
        ));
        if i % 2 == 0 {
            let popover = metadata(json!({ "component": { "name": "Popover", "label": "b" } }));
            portals.push_str(&format!(
                "<div data-awsui-referrer-id='anchor-{i}'><div data-awsui-analytics='{popover}'><b>Popover {i}</b></div></div>"
            ));
        }
    }
    format!("<main id='root'>{body}</main>{portals}")
}
