// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label resolution.
//!
//! ## Overview
//!
//! A [`LabelIdentifier`] is resolved against the node that carries it:
//!
//! 1. Pick the scoping root: the logical ancestor matching `rootSelector`,
//!    else the nearest component for `root: component`, else the document
//!    body for `root: body`, else the node itself.
//! 2. Select the label element(s) under that root. An empty selector selects
//!    the root itself. With a list of selectors the first one yielding a
//!    non-empty result wins.
//! 3. If a label element carries a [`LABEL_ATTRIBUTE`](crate::attributes::LABEL_ATTRIBUTE) redirect, resolve that
//!    selector relative to the element instead. Otherwise take the element's
//!    [`accessible_name`].
//!
//! Single mode resolves the first matching element to a string; multi mode
//! resolves every match and drops empty results.

use std::collections::HashSet;

use serde_json::Value;

use crate::attributes::decode_label_redirect;
use crate::dom::DomNode;
use crate::navigator::{find_component_ancestor, find_selector_ancestor};
use crate::types::{LabelIdentifier, LabelMode, LabelRoot, LabelSelector, ResolvedLabel};

/// Resolve `identifier` relative to `node`.
///
/// An identifier naming no selector, root or root selector resolves to empty.
pub fn resolve_label<N: DomNode>(
    node: &N,
    identifier: &LabelIdentifier,
    mode: LabelMode,
) -> ResolvedLabel {
    match mode {
        LabelMode::Single => ResolvedLabel::Single(resolve_single(node, identifier)),
        LabelMode::Multi => ResolvedLabel::Multi(resolve_multi(node, identifier)),
    }
}

/// Resolve a fragment value found in label position.
///
/// Strings and descriptor objects are label identifiers; `null` and every
/// other value resolve to empty.
pub fn resolve_label_value<N: DomNode>(node: &N, value: &Value, mode: LabelMode) -> ResolvedLabel {
    match LabelIdentifier::from_value(value) {
        Some(identifier) => resolve_label(node, &identifier, mode),
        None => ResolvedLabel::empty(mode),
    }
}

fn resolve_single<N: DomNode>(node: &N, identifier: &LabelIdentifier) -> String {
    if identifier.is_empty() {
        return String::new();
    }
    match &identifier.selector {
        Some(LabelSelector::Many(selectors)) => selectors
            .iter()
            .map(|selector| single_with_selector(node, selector, identifier))
            .find(|label| !label.is_empty())
            .unwrap_or_default(),
        Some(LabelSelector::One(selector)) => single_with_selector(node, selector, identifier),
        None => single_with_selector(node, "", identifier),
    }
}

fn resolve_multi<N: DomNode>(node: &N, identifier: &LabelIdentifier) -> Vec<String> {
    if identifier.is_empty() {
        return Vec::new();
    }
    match &identifier.selector {
        Some(LabelSelector::Many(selectors)) => selectors
            .iter()
            .map(|selector| multi_with_selector(node, selector, identifier))
            .find(|labels| !labels.is_empty())
            .unwrap_or_default(),
        Some(LabelSelector::One(selector)) => multi_with_selector(node, selector, identifier),
        None => multi_with_selector(node, "", identifier),
    }
}

fn scoping_root<N: DomNode>(node: &N, identifier: &LabelIdentifier) -> Option<N> {
    if let Some(root_selector) = identifier.root_selector.as_deref().filter(|s| !s.is_empty()) {
        return find_selector_ancestor(node, root_selector, None);
    }
    match identifier.root.unwrap_or_default() {
        LabelRoot::Component => find_component_ancestor(node, None),
        LabelRoot::Body => node.body(),
        LabelRoot::Itself => Some(node.clone()),
    }
}

fn single_with_selector<N: DomNode>(node: &N, selector: &str, identifier: &LabelIdentifier) -> String {
    let Some(root) = scoping_root(node, identifier) else {
        return String::new();
    };
    let element = if selector.is_empty() {
        Some(root)
    } else {
        root.query_selector(selector)
    };
    match element {
        Some(element) => match decode_label_redirect(&element) {
            Some(redirect) => resolve_single(&element, &LabelIdentifier::selector(redirect)),
            None => accessible_name(&element),
        },
        None => String::new(),
    }
}

fn multi_with_selector<N: DomNode>(
    node: &N,
    selector: &str,
    identifier: &LabelIdentifier,
) -> Vec<String> {
    let Some(root) = scoping_root(node, identifier) else {
        return Vec::new();
    };
    let elements = if selector.is_empty() {
        vec![root]
    } else {
        root.query_selector_all(selector)
    };
    let mut labels = Vec::new();
    for element in &elements {
        match decode_label_redirect(element) {
            Some(redirect) => {
                labels.extend(resolve_multi(element, &LabelIdentifier::selector(redirect)));
            }
            None => {
                let label = accessible_name(element);
                if !label.is_empty() {
                    labels.push(label);
                }
            }
        }
    }
    labels
}

/// Accessible name of `element`.
///
/// A non-empty `aria-label` wins (trimmed). Otherwise the first id listed in
/// `aria-labelledby` is followed to its element and resolved the same way;
/// a missing target yields `""`. Elements already visited on this chain, the
/// element itself included, fall back to their trimmed text content.
pub fn accessible_name<N: DomNode>(element: &N) -> String {
    let mut visited = HashSet::new();
    let mut current = element.clone();
    loop {
        if let Some(label) = current.attribute("aria-label").filter(|l| !l.is_empty()) {
            return label.trim().into();
        }
        visited.insert(current.clone());
        let referenced = current
            .attribute("aria-labelledby")
            .and_then(|ids| ids.split_whitespace().next())
            .map(|id| current.element_by_id(id));
        match referenced {
            Some(None) => return String::new(),
            Some(Some(next)) if !visited.contains(&next) => current = next,
            _ => return current.text_content().trim().into(),
        }
    }
}

#[cfg(all(test, feature = "html_adapter"))]
mod tests {
    use super::*;
    use crate::adapters::html::HtmlPage;
    use serde_json::json;

    fn single(page: &HtmlPage, node: &str, identifier: Value) -> String {
        let node = page.select(node).unwrap();
        match resolve_label_value(&node, &identifier, LabelMode::Single) {
            ResolvedLabel::Single(label) => label,
            other => panic!("unexpected {other:?}"),
        }
    }

    fn multi(page: &HtmlPage, node: &str, identifier: Value) -> Vec<String> {
        let node = page.select(node).unwrap();
        match resolve_label_value(&node, &identifier, LabelMode::Multi) {
            ResolvedLabel::Multi(labels) => labels,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn accessible_name_chain() {
        let page = HtmlPage::parse(
            r#"
            <div id="text"><span>text 1</span><span>text 2</span></div>
            <div id="aria" aria-label=" returned label " aria-labelledby="id:r55:">content</div>
            <div id="by-label" aria-labelledby="id:r55:">content</div>
            <div id="id:r55:" aria-label="labelled by label">content</div>
            <div id="by-text" aria-labelledby="id:r56: id:r55:">content</div>
            <div id="id:r56:">second content</div>
            <div id="by-missing" aria-labelledby="id:missing">content</div>
            <div id="by-self" aria-labelledby="by-self"> own text </div>
            <div id="loop-a" aria-labelledby="loop-b">text a</div>
            <div id="loop-b" aria-labelledby="loop-a">text b</div>
            "#,
        );
        let name = |selector: &str| {
            let element = page.select_all_in(page.main_document(), "[id]")
                .into_iter()
                .find(|e| e.attribute("id") == Some(selector))
                .unwrap();
            accessible_name(&element)
        };
        assert_eq!(name("text"), "text 1text 2");
        assert_eq!(name("aria"), "returned label");
        assert_eq!(name("by-label"), "labelled by label");
        assert_eq!(name("by-text"), "second content");
        assert_eq!(name("by-missing"), "");
        assert_eq!(name("by-self"), "own text");
        assert_eq!(name("loop-a"), "text b");
    }

    #[test]
    fn plain_string_selects_under_node() {
        let page = HtmlPage::parse(
            r#"
            <div id="node"><h2 class="title">  Heading  </h2></div>
            <h2 class="title">Outside</h2>
            "#,
        );
        assert_eq!(single(&page, "#node", json!(".title")), "Heading");
        assert_eq!(single(&page, "#node", json!(".missing")), "");
        assert_eq!(single(&page, "#node", json!({ "selector": ".title" })), "Heading");
    }

    #[test]
    fn selector_array_falls_back() {
        let page = HtmlPage::parse(
            r#"
            <div id="node">
                <h3 class="empty"></h3>
                <h3 class="present">heading3</h3>
            </div>
            "#,
        );
        assert_eq!(
            single(&page, "#node", json!({ "selector": [".missing", ".present"] })),
            "heading3"
        );
        assert_eq!(
            single(&page, "#node", json!({ "selector": [".empty", ".present"] })),
            "heading3"
        );
        assert_eq!(
            single(&page, "#node", json!({ "selector": [".missing", ".other"] })),
            ""
        );
        assert_eq!(
            multi(&page, "#node", json!({ "selector": [".missing", "h3"] })),
            ["heading3"]
        );
    }

    #[test]
    fn multi_mode_filters_empty_labels() {
        let page = HtmlPage::parse(
            r#"
            <ul id="list">
                <li class="item">Item 1</li>
                <li class="item"></li>
                <li class="item">Item 3</li>
            </ul>
            "#,
        );
        assert_eq!(multi(&page, "#list", json!(".item")), ["Item 1", "Item 3"]);
        assert_eq!(single(&page, "#list", json!(".item")), "Item 1");
        assert!(multi(&page, "#list", json!(".missing")).is_empty());
    }

    #[test]
    fn component_root_ignores_labels_outside() {
        let page = HtmlPage::parse(
            r#"
            <div class="label-class">outside label</div>
            <div data-awsui-analytics='{"component":{"name":"Outer"}}'>
                <div class="label-class">outer label</div>
                <div data-awsui-analytics='{"component":{"name":"Inner"}}'>
                    <div class="label-class">inner label</div>
                    <button id="node">Click</button>
                </div>
            </div>
            "#,
        );
        assert_eq!(
            single(&page, "#node", json!({ "selector": ".label-class", "root": "component" })),
            "inner label"
        );
        assert_eq!(
            single(&page, "#node", json!({ "selector": ".label-class", "root": "body" })),
            "outside label"
        );
        // A node without a component ancestor has no scoping root.
        assert_eq!(
            single(
                &page,
                ".label-class",
                json!({ "selector": "span", "root": "component" })
            ),
            ""
        );
    }

    #[test]
    fn root_selector_wins_over_root() {
        let page = HtmlPage::parse(
            r#"
            <section class="card">
                <h2>card title</h2>
                <div data-awsui-analytics='{"component":{"name":"Inner"}}'>
                    <h2>component title</h2>
                    <button id="node">Click</button>
                </div>
            </section>
            "#,
        );
        assert_eq!(
            single(
                &page,
                "#node",
                json!({ "selector": "h2", "root": "component", "rootSelector": ".card" })
            ),
            "card title"
        );
        assert_eq!(
            single(&page, "#node", json!({ "selector": "h2", "rootSelector": ".nowhere" })),
            ""
        );
    }

    #[test]
    fn empty_selector_uses_scoping_root() {
        let page = HtmlPage::parse(
            r#"
            <div data-awsui-analytics='{"component":{"name":"C"}}' aria-label="component name">
                <button id="node" aria-label="button name">x</button>
            </div>
            "#,
        );
        assert_eq!(single(&page, "#node", json!("")), "button name");
        assert_eq!(single(&page, "#node", json!({ "root": "component" })), "component name");
        assert_eq!(single(&page, "#node", json!({ "rootClassName": "x" })), "");
        assert_eq!(single(&page, "#node", json!(null)), "");
        assert!(multi(&page, "#node", json!(null)).is_empty());
    }

    #[test]
    fn redirects_are_followed() {
        let page = HtmlPage::parse(
            r#"
            <div id="node">
                <div class="component-label" data-awsui-analytics-label=".sub-label">
                    <div class="sub-label">sub label</div>
                    <div>another text content to ignore</div>
                </div>
                <div class="chain" data-awsui-analytics-label=".hop">
                    <div class="hop" data-awsui-analytics-label=".end"><b class="end">deep</b></div>
                </div>
                <div class="ignored-redirect" data-awsui-analytics-label="">plain</div>
                <ul>
                    <li class="option" data-awsui-analytics-label="span"><span>A</span><span>B</span></li>
                    <li class="option">C</li>
                </ul>
            </div>
            "#,
        );
        assert_eq!(single(&page, "#node", json!(".component-label")), "sub label");
        assert_eq!(single(&page, "#node", json!(".chain")), "deep");
        assert_eq!(single(&page, "#node", json!(".ignored-redirect")), "plain");
        assert_eq!(multi(&page, "#node", json!(".option")), ["A", "B", "C"]);
    }
}
