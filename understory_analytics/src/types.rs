// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data model: metadata fragments, label identifiers, and generated outputs.
//!
//! ## Overview
//!
//! Fragments are the wire format attached to nodes. They are dynamic JSON
//! trees ([`Fragment`]) so that any key ending in `label`/`labels` can carry
//! a [`LabelIdentifier`] anywhere in the tree. [`MetadataFragment`] and
//! [`ComponentFragment`] are typed builders for the common shape.
//!
//! Outputs ([`GeneratedAnalyticsMetadata`], [`ComponentDescriptor`],
//! [`RawAnalyticsMetadata`]) are plain serializable data. Empty fields are
//! skipped, so an empty result serializes to `{}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A partial metadata tree attached to one node.
pub type Fragment = Map<String, Value>;

/// Whether a label key resolves to one string or to a list of strings.
///
/// Selected by the key's suffix: `…label` is [`Single`](Self::Single),
/// `…labels` is [`Multi`](Self::Multi) (case-insensitive).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LabelMode {
    /// Resolve the first match to a single string.
    Single,
    /// Resolve every match and keep the non-empty results.
    Multi,
}

impl LabelMode {
    /// Label mode implied by a fragment key, or `None` for ordinary keys.
    pub fn for_key(key: &str) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        if key.ends_with("labels") {
            Some(Self::Multi)
        } else if key.ends_with("label") {
            Some(Self::Single)
        } else {
            None
        }
    }
}

/// Scoping root for label resolution.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelRoot {
    /// The node carrying the fragment.
    #[default]
    #[serde(rename = "self")]
    Itself,
    /// The nearest enclosing component root.
    Component,
    /// The document body.
    Body,
}

/// One selector or an ordered list of fallback selectors.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelSelector {
    /// A single CSS selector.
    One(String),
    /// Selectors tried in order; the first non-empty result wins.
    Many(Vec<String>),
}

impl LabelSelector {
    /// The selectors in the order they are tried.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(selector) => core::slice::from_ref(selector),
            Self::Many(selectors) => selectors,
        }
    }
}

impl From<&str> for LabelSelector {
    fn from(selector: &str) -> Self {
        Self::One(selector.into())
    }
}

/// Describes how to compute a human-readable label from the DOM.
///
/// A plain string in a label position is shorthand for `{ selector: that string }`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelIdentifier {
    /// Selector(s) evaluated against the scoping root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<LabelSelector>,
    /// Scoping root used when `root_selector` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<LabelRoot>,
    /// Selector of a logical ancestor to scope resolution to. Wins over `root`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_selector: Option<String>,
}

impl LabelIdentifier {
    /// Identifier selecting `selector` under the default scoping.
    pub fn selector(selector: impl Into<String>) -> Self {
        Self {
            selector: Some(LabelSelector::One(selector.into())),
            ..Self::default()
        }
    }

    /// Interpret a fragment value in label position.
    ///
    /// Strings become selectors; objects are read leniently (unknown keys and
    /// unrecognized `root` values are ignored). Anything else is not a label
    /// identifier.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(selector) => Some(Self::selector(selector.as_str())),
            Value::Object(map) => {
                let selector = match map.get("selector") {
                    Some(Value::String(s)) => Some(LabelSelector::One(s.clone())),
                    Some(Value::Array(items)) => Some(LabelSelector::Many(
                        items
                            .iter()
                            .filter_map(|item| item.as_str().map(String::from))
                            .collect(),
                    )),
                    _ => None,
                };
                let root = match map.get("root").and_then(Value::as_str) {
                    Some("self") => Some(LabelRoot::Itself),
                    Some("component") => Some(LabelRoot::Component),
                    Some("body") => Some(LabelRoot::Body),
                    _ => None,
                };
                let root_selector = map
                    .get("rootSelector")
                    .and_then(Value::as_str)
                    .map(String::from);
                Some(Self {
                    selector,
                    root,
                    root_selector,
                })
            }
            _ => None,
        }
    }

    /// Whether the identifier names nothing at all.
    pub fn is_empty(&self) -> bool {
        self.selector.is_none() && self.root.is_none() && self.root_selector.is_none()
    }
}

/// Result of resolving a label identifier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolvedLabel {
    /// Result of [`LabelMode::Single`] resolution (possibly empty).
    Single(String),
    /// Result of [`LabelMode::Multi`] resolution (never contains empty strings).
    Multi(Vec<String>),
}

impl ResolvedLabel {
    /// The empty result for `mode`.
    pub fn empty(mode: LabelMode) -> Self {
        match mode {
            LabelMode::Single => Self::Single(String::new()),
            LabelMode::Multi => Self::Multi(Vec::new()),
        }
    }
}

impl From<ResolvedLabel> for Value {
    fn from(label: ResolvedLabel) -> Self {
        match label {
            ResolvedLabel::Single(label) => Self::String(label),
            ResolvedLabel::Multi(labels) => Self::Array(labels.into_iter().map(Self::String).collect()),
        }
    }
}

/// Typed builder for the `component` block of a fragment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentFragment {
    /// Component name. Only named components become contexts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Label identifier resolved to the component's label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelIdentifier>,
    /// Caller-supplied identifier of this component instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    /// Relevant component properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    /// Details about the area of the component that was interacted with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_context: Option<Map<String, Value>>,
}

/// Typed builder for a metadata fragment.
///
/// Serialize it with [`Analytics::metadata_attributes`](crate::Analytics::metadata_attributes).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataFragment {
    /// The user action, for example `"select"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Action details. Values under `…label(s)` keys are label identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Map<String, Value>>,
    /// The enclosing component, if this node is (or describes) one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentFragment>,
}

/// Kind tag of a context entry.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    /// A component context.
    #[default]
    Component,
}

/// Resolved description of one component.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDetail {
    /// Component name.
    pub name: String,
    /// Resolved label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Caller-supplied identifier of this component instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    /// Component properties, with labels resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    /// Details of the interacted area, with labels resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_context: Option<Map<String, Value>>,
    /// Any other keys of the component block, passed through as given.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One component's contribution to an event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentContext {
    /// Always [`ContextKind::Component`].
    #[serde(rename = "type")]
    pub kind: ContextKind,
    /// The resolved component.
    pub detail: ComponentDetail,
}

/// The fully resolved event descriptor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedAnalyticsMetadata {
    /// The user action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Action details with labels resolved.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub detail: Map<String, Value>,
    /// Component contexts, innermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<ComponentContext>,
}

impl GeneratedAnalyticsMetadata {
    /// Whether nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.action.is_none() && self.detail.is_empty() && self.contexts.is_empty()
    }
}

/// A node of the logical component tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    /// The component itself, as its innermost context.
    #[serde(flatten)]
    pub detail: ComponentDetail,
    /// Logical child components in discovery order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentDescriptor>,
}

/// Unresolved fragments along a node's logical ancestry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalyticsMetadata {
    /// Parsed fragments, innermost first.
    pub metadata: Vec<Fragment>,
    /// Every selector referenced from a label position, in encounter order.
    pub label_selectors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn label_mode_follows_key_suffix() {
        assert_eq!(LabelMode::for_key("label"), Some(LabelMode::Single));
        assert_eq!(LabelMode::for_key("columnLabel"), Some(LabelMode::Single));
        assert_eq!(LabelMode::for_key("COLUMNLABEL"), Some(LabelMode::Single));
        assert_eq!(LabelMode::for_key("labels"), Some(LabelMode::Multi));
        assert_eq!(LabelMode::for_key("selectedItemsLabels"), Some(LabelMode::Multi));
        assert_eq!(LabelMode::for_key("labelled"), None);
        assert_eq!(LabelMode::for_key("notLabelEnding"), None);
    }

    #[test]
    fn label_identifier_from_string_and_object() {
        assert_eq!(
            LabelIdentifier::from_value(&json!(".title")),
            Some(LabelIdentifier::selector(".title"))
        );
        let parsed = LabelIdentifier::from_value(&json!({
            "selector": [".a", 3, ".b"],
            "root": "component",
            "rootSelector": ".scope",
            "unknown": true,
        }))
        .unwrap();
        assert_eq!(
            parsed.selector,
            Some(LabelSelector::Many(vec![".a".into(), ".b".into()]))
        );
        assert_eq!(parsed.root, Some(LabelRoot::Component));
        assert_eq!(parsed.root_selector.as_deref(), Some(".scope"));
        assert!(LabelIdentifier::from_value(&json!(null)).is_none());
        assert!(LabelIdentifier::from_value(&json!({ "rootClassName": "x" })).unwrap().is_empty());
    }

    #[test]
    fn typed_fragment_serializes_to_wire_shape() {
        let fragment = MetadataFragment {
            action: Some("select".into()),
            detail: None,
            component: Some(ComponentFragment {
                name: Some("awsui.Select".into()),
                label: Some(LabelIdentifier {
                    selector: Some(".label".into()),
                    root: Some(LabelRoot::Itself),
                    root_selector: None,
                }),
                instance_identifier: Some("main".into()),
                ..ComponentFragment::default()
            }),
        };
        assert_eq!(
            serde_json::to_value(&fragment).unwrap(),
            json!({
                "action": "select",
                "component": {
                    "name": "awsui.Select",
                    "label": { "selector": ".label", "root": "self" },
                    "instanceIdentifier": "main",
                },
            })
        );
    }

    #[test]
    fn empty_outputs_serialize_to_empty_object() {
        assert_eq!(
            serde_json::to_value(GeneratedAnalyticsMetadata::default()).unwrap(),
            json!({})
        );
        let descriptor = ComponentDescriptor {
            detail: ComponentDetail {
                name: "Leaf".into(),
                ..ComponentDetail::default()
            },
            children: Vec::new(),
        };
        assert_eq!(serde_json::to_value(descriptor).unwrap(), json!({ "name": "Leaf" }));
    }

    #[test]
    fn component_detail_keeps_unknown_keys() {
        let value = json!({ "name": "C", "position": "3", "variant": { "kind": "full" } });
        let detail: ComponentDetail = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(detail.name, "C");
        assert_eq!(detail.extra["position"], "3");
        assert!(!detail.extra.contains_key("name"));
        assert_eq!(serde_json::to_value(&detail).unwrap(), value);

        let descriptor: ComponentDescriptor = serde_json::from_value(json!({
            "name": "Outer",
            "position": "1",
            "children": [{ "name": "Inner" }],
        }))
        .unwrap();
        assert_eq!(descriptor.detail.extra.len(), 1);
        assert_eq!(descriptor.children[0].detail.name, "Inner");
    }
}
