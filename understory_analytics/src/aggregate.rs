// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event metadata aggregation along the logical-parent chain.

use serde_json::{Map, Value};

use crate::Analytics;
use crate::attributes::decode_metadata;
use crate::dom::DomNode;
use crate::merge::{FragmentVisitor, resolve_and_merge, visit_fragment};
use crate::navigator::logical_ancestors;
use crate::types::{
    ComponentContext, Fragment, GeneratedAnalyticsMetadata, LabelIdentifier, LabelMode,
    RawAnalyticsMetadata,
};

impl Analytics {
    /// Resolve the full event descriptor for an interaction at `target`.
    ///
    /// Walks from `target` through its logical ancestors, resolving and
    /// merging every fragment found. Malformed fragments are skipped. Empty
    /// when inactive or when `target` is `None`.
    ///
    /// Nothing is cached: each call re-reads the DOM.
    pub fn generated_metadata<N: DomNode>(&self, target: Option<&N>) -> GeneratedAnalyticsMetadata {
        match target {
            Some(target) if self.is_active() => {
                into_generated(accumulate_fragments(target))
            }
            _ => GeneratedAnalyticsMetadata::default(),
        }
    }

    /// The unresolved fragments along `target`'s logical chain, innermost
    /// first, with every selector they reference from a label position.
    ///
    /// Empty when inactive or when `target` is `None`.
    pub fn raw_metadata<N: DomNode>(&self, target: Option<&N>) -> RawAnalyticsMetadata {
        let mut raw = RawAnalyticsMetadata::default();
        let Some(target) = target.filter(|_| self.is_active()) else {
            return raw;
        };
        for node in logical_ancestors(target) {
            let Some(fragment) = decode_metadata(&node) else {
                continue;
            };
            let mut collector = SelectorCollector::default();
            visit_fragment(&fragment, &mut collector);
            raw.label_selectors.extend(collector.selectors);
            raw.metadata.push(fragment);
        }
        raw
    }
}

/// Merge every fragment on the logical chain from `target` outwards.
pub(crate) fn accumulate_fragments<N: DomNode>(target: &N) -> Fragment {
    logical_ancestors(target).fold(Fragment::new(), |accumulated, node| {
        match decode_metadata(&node) {
            Some(local) => resolve_and_merge(&node, &accumulated, &local),
            None => accumulated,
        }
    })
}

/// Convert a merged fragment into the typed output.
///
/// Each field and each context converts on its own, so a value of the wrong
/// type costs only that value.
pub(crate) fn into_generated(mut fragment: Fragment) -> GeneratedAnalyticsMetadata {
    let action = match fragment.remove("action") {
        Some(Value::String(action)) => Some(action),
        other => {
            discard("action", other);
            None
        }
    };
    let detail = match fragment.remove("detail") {
        Some(Value::Object(detail)) => detail,
        other => {
            discard("detail", other);
            Map::new()
        }
    };
    let contexts = match fragment.remove("contexts") {
        Some(Value::Array(contexts)) => contexts.into_iter().filter_map(into_context).collect(),
        other => {
            discard("contexts", other);
            Vec::new()
        }
    };
    GeneratedAnalyticsMetadata {
        action,
        detail,
        contexts,
    }
}

fn into_context(value: Value) -> Option<ComponentContext> {
    serde_json::from_value(value)
        .inspect_err(|_err| {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "dropping analytics context that does not fit the output shape");
        })
        .ok()
}

fn discard(_field: &'static str, _value: Option<Value>) {
    #[cfg(feature = "tracing")]
    if _value.is_some_and(|value| !value.is_null()) {
        tracing::warn!(field = _field, "dropping analytics field of the wrong type");
    }
}

#[derive(Default)]
struct SelectorCollector {
    selectors: Vec<String>,
}

impl FragmentVisitor for SelectorCollector {
    fn visit_label(&mut self, _key: &str, _mode: LabelMode, value: &Value) -> Value {
        if let Value::String(selector) = value {
            self.selectors.push(selector.clone());
        } else if let Some(identifier) = LabelIdentifier::from_value(value) {
            if let Some(selector) = &identifier.selector {
                self.selectors.extend(selector.as_slice().iter().cloned());
            }
            self.selectors.extend(identifier.root_selector);
        }
        value.clone()
    }
}
