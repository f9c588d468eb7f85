// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logical-tree navigation: portal-aware parents, ancestor searches, portals and frames.
//!
//! ## Overview
//!
//! The logical parent of a node is its physical parent, unless the node
//! carries a [`REFERRER_ATTRIBUTE`]. In that case it is the element of the
//! same document whose `id` equals the attribute value. This lets content
//! rendered elsewhere (a portal) report to its logical owner. Portals may
//! chain: the anchor of one portal may itself sit inside another portal.
//!
//! Walks over the logical relation use [`LogicalAncestors`], which stops
//! rather than looping when a chain of back-references revisits a node.

use std::collections::HashSet;

use serde_json::Value;

use crate::attributes::{METADATA_ATTRIBUTE, REFERRER_ATTRIBUTE, decode_metadata};
use crate::dom::DomNode;
use crate::types::Fragment;

/// The logical parent of `node`.
///
/// Follows a non-empty portal back-reference within the node's own document,
/// otherwise the physical parent. `None` when the reference does not resolve
/// or the node has no parent.
pub fn logical_parent<N: DomNode>(node: &N) -> Option<N> {
    match node.attribute(REFERRER_ATTRIBUTE) {
        Some(referrer) if !referrer.is_empty() => node.element_by_id(referrer),
        _ => node.parent_element(),
    }
}

/// Iterator over a node and its logical ancestors, innermost first.
///
/// Created by [`logical_ancestors`]. Ends at the top of the chain or at the
/// first node already yielded.
pub struct LogicalAncestors<N: DomNode> {
    next: Option<N>,
    visited: HashSet<N>,
}

impl<N: DomNode> core::fmt::Debug for LogicalAncestors<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LogicalAncestors")
            .field("visited", &self.visited.len())
            .finish_non_exhaustive()
    }
}

impl<N: DomNode> Iterator for LogicalAncestors<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let node = self.next.take()?;
        if !self.visited.insert(node.clone()) {
            #[cfg(feature = "tracing")]
            tracing::trace!("logical parent chain revisits a node; stopping");
            return None;
        }
        self.next = logical_parent(&node);
        Some(node)
    }
}

/// `node` followed by its logical ancestors.
pub fn logical_ancestors<N: DomNode>(node: &N) -> LogicalAncestors<N> {
    LogicalAncestors {
        next: Some(node.clone()),
        visited: HashSet::new(),
    }
}

/// Whether a parsed fragment names a component (non-empty `component.name`).
pub(crate) fn names_component(fragment: &Fragment) -> bool {
    fragment
        .get("component")
        .and_then(|component| component.get("name"))
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty())
}

/// Whether `node` carries metadata describing a named component.
pub fn is_component_node<N: DomNode>(node: &N) -> bool {
    decode_metadata(node).is_some_and(|fragment| names_component(&fragment))
}

/// First node on the logical chain from `node` (inclusive) accepted by `test`.
///
/// The walk stops without a result on reaching `boundary`, which is compared by
/// identity and never returned itself.
pub fn find_logical_ancestor<N: DomNode>(
    node: &N,
    boundary: Option<&N>,
    mut test: impl FnMut(&N) -> bool,
) -> Option<N> {
    for ancestor in logical_ancestors(node) {
        if boundary == Some(&ancestor) {
            return None;
        }
        if test(&ancestor) {
            return Some(ancestor);
        }
    }
    None
}

/// Nearest component node on the logical chain from `node` (inclusive).
pub fn find_component_ancestor<N: DomNode>(node: &N, boundary: Option<&N>) -> Option<N> {
    find_logical_ancestor(node, boundary, is_component_node)
}

/// Nearest node on the logical chain from `node` (inclusive) matching `selector`.
pub fn find_selector_ancestor<N: DomNode>(
    node: &N,
    selector: &str,
    boundary: Option<&N>,
) -> Option<N> {
    find_logical_ancestor(node, boundary, |candidate| candidate.matches(selector))
}

/// Portal containers whose logical anchor is inside `subtree_root` but which
/// are rendered outside it.
///
/// Searches the whole document of `subtree_root`, in document order.
pub fn find_portal_targets<N: DomNode>(subtree_root: &N) -> Vec<N> {
    let document = subtree_root.document_element();
    let selector = format!("[{REFERRER_ATTRIBUTE}]");
    let mut candidates = document.query_selector_all(&selector);
    if document.matches(&selector) {
        candidates.insert(0, document);
    }
    candidates
        .into_iter()
        .filter(|portal| !subtree_root.contains(portal))
        .filter(|portal| {
            logical_parent(portal).is_some_and(|anchor| subtree_root.contains(&anchor))
        })
        .collect()
}

/// An inline frame together with the root element of its document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessibleFrame<N> {
    /// The `<iframe>` element.
    pub frame: N,
    /// Root element of the frame's document.
    pub document: N,
}

/// Descendant inline frames of `root` whose documents can be read.
///
/// Cross-origin and detached frames, and frames without a document, are skipped.
pub fn find_accessible_frames<N: DomNode>(root: &N) -> Vec<AccessibleFrame<N>> {
    root.query_selector_all("iframe")
        .into_iter()
        .filter_map(|frame| match frame.content_document() {
            Ok(Some(document)) => Some(AccessibleFrame { frame, document }),
            Ok(None) => None,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(error = %_err, "skipping inaccessible frame");
                None
            }
        })
        .collect()
}

/// Every descendant of `root` (exclusive) that carries a metadata attribute.
pub(crate) fn annotated_descendants<N: DomNode>(root: &N) -> Vec<N> {
    root.query_selector_all(&format!("[{METADATA_ATTRIBUTE}]"))
}
