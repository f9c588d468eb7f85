// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fragment post-processing and merging.
//!
//! ## Overview
//!
//! Aggregation folds fragments from the innermost node outwards. Each local
//! fragment is first post-processed ([`process_fragment`]): every value under
//! a `…label`/`…labels` key is replaced by its resolved label. The result is
//! then merged into the accumulator ([`merge_fragments`]). Finally a named
//! `component` block is moved into the `contexts` list
//! ([`fold_component_context`]), so the nearest component lands first.
//!
//! Post-processing is a [`FragmentVisitor`] walk. The same walk is used to
//! collect label selectors for raw metadata.

use serde_json::{Map, Value, json};

use crate::dom::DomNode;
use crate::labels::resolve_label_value;
use crate::navigator::names_component;
use crate::types::{Fragment, LabelMode};

/// Component name that receives table-derived properties.
pub const TABLE_COMPONENT_NAME: &str = "awsui.Table";

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Deep-merge `source` over `target`.
///
/// Per key:
/// - a truthy target value survives a falsy or absent source value;
/// - a falsy or absent target value is replaced by any non-null source value;
/// - two objects merge recursively;
/// - a null or absent source keeps the target value;
/// - otherwise the source value wins.
///
/// Absent fragments act as empty ones.
pub fn merge_fragments(target: Option<&Fragment>, source: Option<&Fragment>) -> Fragment {
    let empty = Fragment::new();
    let target = target.unwrap_or(&empty);
    let source = source.unwrap_or(&empty);
    let mut merged = Fragment::new();
    let keys = target
        .keys()
        .chain(source.keys().filter(|key| !target.contains_key(*key)));
    for key in keys {
        let value = match (target.get(key), source.get(key)) {
            (Some(t), s) if is_truthy(t) && !s.is_some_and(is_truthy) => t.clone(),
            (t, Some(s)) if !t.is_some_and(is_truthy) && !s.is_null() => s.clone(),
            (Some(Value::Object(t)), Some(Value::Object(s))) => {
                Value::Object(merge_fragments(Some(t), Some(s)))
            }
            (Some(t), None | Some(Value::Null)) => t.clone(),
            (_, Some(s)) => s.clone(),
            (None, None) => continue,
        };
        merged.insert(key.clone(), value);
    }
    merged
}

/// Callbacks for [`visit_fragment`].
pub trait FragmentVisitor {
    /// Replacement for `value`, found under the label key `key`.
    fn visit_label(&mut self, key: &str, mode: LabelMode, value: &Value) -> Value;

    /// Called on each rebuilt object after its members were visited.
    fn leave_object(&mut self, object: &mut Fragment) {
        let _ = object;
    }
}

/// Rebuild `fragment`, routing label values through `visitor`.
///
/// Objects under other keys are visited recursively; arrays and scalars are
/// copied unchanged.
pub fn visit_fragment<V: FragmentVisitor + ?Sized>(fragment: &Fragment, visitor: &mut V) -> Fragment {
    let mut visited = Fragment::new();
    for (key, value) in fragment {
        let value = match (LabelMode::for_key(key), value) {
            (Some(mode), _) => visitor.visit_label(key, mode, value),
            (None, Value::Object(object)) => Value::Object(visit_fragment(object, visitor)),
            (None, other) => other.clone(),
        };
        visited.insert(key.clone(), value);
    }
    visitor.leave_object(&mut visited);
    visited
}

struct LabelResolver<'a, N> {
    node: &'a N,
}

impl<N: DomNode> FragmentVisitor for LabelResolver<'_, N> {
    fn visit_label(&mut self, _key: &str, mode: LabelMode, value: &Value) -> Value {
        resolve_label_value(self.node, value, mode).into()
    }

    fn leave_object(&mut self, object: &mut Fragment) {
        enrich_table_properties(self.node, object);
    }
}

/// Resolve every label in `fragment` relative to `node`.
pub fn process_fragment<N: DomNode>(node: &N, fragment: &Fragment) -> Fragment {
    visit_fragment(fragment, &mut LabelResolver { node })
}

/// Move a named `component` block into the trailing `contexts` entry.
///
/// Fragments whose component has no name are returned unchanged.
pub fn fold_component_context(mut fragment: Fragment) -> Fragment {
    if !names_component(&fragment) {
        return fragment;
    }
    let Some(component) = fragment.remove("component") else {
        return fragment;
    };
    let context = json!({ "type": "component", "detail": component });
    match fragment.get_mut("contexts") {
        Some(Value::Array(contexts)) => contexts.push(context),
        _ => {
            fragment.insert("contexts".into(), Value::Array(vec![context]));
        }
    }
    fragment
}

/// Post-process `local` at `node` and fold it into `accumulated`.
pub fn resolve_and_merge<N: DomNode>(node: &N, accumulated: &Fragment, local: &Fragment) -> Fragment {
    let processed = process_fragment(node, local);
    fold_component_context(merge_fragments(Some(accumulated), Some(&processed)))
}

const SELECTION_CONTROL: &str = "input[type=checkbox], input[type=radio]";
const CHECKED_CONTROL: &str = "input[type=checkbox][checked], input[type=radio][checked]";

/// Add `columnLabels` and `selectedItemsLabels` to the `properties` of a table
/// component block, read from the table rendered under `node`.
fn enrich_table_properties<N: DomNode>(node: &N, object: &mut Fragment) {
    if object.get("name").and_then(Value::as_str) != Some(TABLE_COMPONENT_NAME) {
        return;
    }
    let Some(Value::Object(properties)) = object.get_mut("properties") else {
        return;
    };
    let table = if node.matches("table") {
        Some(node.clone())
    } else {
        node.query_selector("table")
    };
    let Some(table) = table else {
        return;
    };
    let labels = TableLabels::collect(&table);
    properties.insert("columnLabels".into(), strings(labels.columns));
    properties.insert("selectedItemsLabels".into(), strings(labels.selected_items));
}

fn strings(values: Vec<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}

#[derive(Debug, Default)]
struct TableLabels {
    columns: Vec<String>,
    selected_items: Vec<String>,
}

impl TableLabels {
    fn collect<N: DomNode>(table: &N) -> Self {
        let headers = table.query_selector_all("thead th");
        let first_row = table
            .query_selector("tbody tr")
            .map(|row| row.query_selector_all("td, th"))
            .unwrap_or_default();
        let has_control = |cell: Option<&N>| {
            cell.is_some_and(|cell| cell.query_selector(SELECTION_CONTROL).is_some())
        };
        let column_count = headers.len().max(first_row.len());
        let selection_columns: Vec<bool> = (0..column_count)
            .map(|i| has_control(headers.get(i)) || has_control(first_row.get(i)))
            .collect();
        let is_data_column = |i: usize| !selection_columns.get(i).copied().unwrap_or(false);

        let columns = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| is_data_column(*i))
            .map(|(_, header)| header.text_content().trim().to_owned())
            .filter(|label| !label.is_empty())
            .collect();

        let selected_items = table
            .query_selector_all("tbody tr")
            .into_iter()
            .filter(|row| {
                row.attribute("aria-selected") == Some("true")
                    || row.query_selector(CHECKED_CONTROL).is_some()
            })
            .map(|row| {
                row.query_selector_all("td, th")
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| is_data_column(*i))
                    .map(|(_, cell)| cell.text_content().trim().to_owned())
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|label| !label.is_empty())
            .collect();

        Self {
            columns,
            selected_items,
        }
    }
}

/// Merge an arbitrary list of fragments innermost first, without label processing.
///
/// Useful for combining fragments that were already processed elsewhere.
pub fn merge_all<'a>(fragments: impl IntoIterator<Item = &'a Map<String, Value>>) -> Fragment {
    fragments.into_iter().fold(Fragment::new(), |accumulated, fragment| {
        fold_component_context(merge_fragments(Some(&accumulated), Some(fragment)))
    })
}
