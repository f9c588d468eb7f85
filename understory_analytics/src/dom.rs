// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The DOM facade consumed by the analytics engine, plus small traversal helpers.
//!
//! ## Overview
//!
//! The engine never talks to a browser directly. Hosts implement [`DomNode`] for
//! their element handle type and the rest of the crate is generic over it.
//! The [`html`](crate::adapters::html) adapter provides an implementation over
//! parsed HTML documents for tests and tooling.

use core::hash::Hash;

/// Errors raised while reaching into an inline frame's document.
///
/// Returned by [`DomNode::content_document`]. The engine treats every variant as
/// "frame not accessible" and excludes the frame from scans.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum FrameAccessError {
    /// The frame's document belongs to another origin.
    #[error("frame document is cross-origin")]
    CrossOrigin,
    /// The frame element is no longer attached to a live document.
    #[error("frame element is detached")]
    Detached,
}

/// An element handle in a DOM-like tree.
///
/// Identity is the handle's `Eq`/`Hash`: two handles are the same node only if
/// they refer to the same element of the same document. Handles from different
/// frame documents must never compare equal, even if structurally identical.
///
/// Selector-taking methods accept CSS selector syntax. Implementations must
/// treat selectors they cannot parse as matching nothing.
pub trait DomNode: Clone + Eq + Hash {
    /// Physical parent element, or `None` at the document root or when detached.
    fn parent_element(&self) -> Option<Self>;

    /// Value of the attribute `name`, if present.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Lower-case local name of the element (for example `"iframe"`).
    fn tag_name(&self) -> &str;

    /// Concatenated text of all descendant text nodes.
    fn text_content(&self) -> String;

    /// Whether this element matches `selector`.
    fn matches(&self, selector: &str) -> bool;

    /// First descendant (excluding `self`) matching `selector`, in document order.
    fn query_selector(&self, selector: &str) -> Option<Self>;

    /// All descendants (excluding `self`) matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self>;

    /// Element carrying `id` within this node's own document.
    fn element_by_id(&self, id: &str) -> Option<Self>;

    /// Root element of this node's document.
    fn document_element(&self) -> Self;

    /// The `<body>` element of this node's document, if any.
    fn body(&self) -> Option<Self>;

    /// Root element of an inline frame's document.
    ///
    /// Returns `Ok(None)` when `self` is not a frame or has no document yet.
    fn content_document(&self) -> Result<Option<Self>, FrameAccessError>;

    /// Whether `other` is `self` or one of its physical descendants.
    fn contains(&self, other: &Self) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node == *self {
                return true;
            }
            current = node.parent_element();
        }
        false
    }
}

/// Walk physical ancestors of `from` (inclusive) until `test` accepts one.
///
/// Returns the first accepted element or `None` once the root is passed.
pub fn find_up_until<N: DomNode>(from: &N, mut test: impl FnMut(&N) -> bool) -> Option<N> {
    let mut current = Some(from.clone());
    while let Some(node) = current {
        if test(&node) {
            return Some(node);
        }
        current = node.parent_element();
    }
    None
}

/// Whether `descendant` lies within `parent` (inclusive).
///
/// Absent inputs never contain or get contained.
pub fn node_contains<N: DomNode>(parent: Option<&N>, descendant: Option<&N>) -> bool {
    match (parent, descendant) {
        (Some(parent), Some(descendant)) => parent.contains(descendant),
        _ => false,
    }
}
