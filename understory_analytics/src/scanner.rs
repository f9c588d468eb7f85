// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page scanning: the logical component tree.
//!
//! ## Overview
//!
//! A scan runs in three phases:
//!
//! 1. Collect component nodes under the root, in document order, then the
//!    ones inside portals anchored under the root (recursively), then the
//!    ones inside accessible frames (recursively).
//! 2. Map every component to its nearest logical component ancestor below
//!    the root. A walk that leaves a frame document continues from the
//!    `<iframe>` element hosting it.
//! 3. Materialize descriptors depth-first, keeping discovery order.

use std::collections::{HashMap, HashSet};

use crate::Analytics;
use crate::aggregate::{accumulate_fragments, into_generated};
use crate::dom::DomNode;
use crate::navigator::{
    annotated_descendants, find_accessible_frames, find_portal_targets, is_component_node,
    logical_ancestors, logical_parent,
};
use crate::types::ComponentDescriptor;

impl Analytics {
    /// Component tree of everything logically inside `root`, `root` excluded.
    ///
    /// Includes portals anchored under `root` and components inside accessible
    /// frames. Empty when inactive or when `root` is `None`.
    pub fn components_tree<N: DomNode>(&self, root: Option<&N>) -> Vec<ComponentDescriptor> {
        match root {
            Some(root) if self.is_active() => ComponentScan::run(root, false),
            _ => Vec::new(),
        }
    }

    /// Component tree of the whole document containing `node`.
    ///
    /// Empty when inactive or when `node` is `None`.
    pub fn document_components_tree<N: DomNode>(&self, node: Option<&N>) -> Vec<ComponentDescriptor> {
        match node {
            Some(node) if self.is_active() => ComponentScan::run(&node.document_element(), true),
            _ => Vec::new(),
        }
    }
}

struct ComponentScan<N: DomNode> {
    boundary: Option<N>,
    components: Vec<N>,
    seen: HashSet<N>,
    scanned_subtrees: HashSet<N>,
    /// Root element of each frame document, mapped to its `<iframe>`.
    frame_hosts: HashMap<N, N>,
}

impl<N: DomNode> ComponentScan<N> {
    fn run(root: &N, inclusive: bool) -> Vec<ComponentDescriptor> {
        let mut scan = Self {
            boundary: (!inclusive).then(|| root.clone()),
            components: Vec::new(),
            seen: HashSet::new(),
            scanned_subtrees: HashSet::new(),
            frame_hosts: HashMap::new(),
        };
        scan.collect(root, inclusive);

        let mut roots = Vec::new();
        let mut children: HashMap<N, Vec<N>> = HashMap::new();
        for node in &scan.components {
            match scan.parent_component(node) {
                Some(parent) => children.entry(parent).or_default().push(node.clone()),
                None => roots.push(node.clone()),
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            components = scan.components.len(),
            roots = roots.len(),
            frames = scan.frame_hosts.len(),
            "scanned component tree"
        );

        let mut materialized = HashSet::new();
        let mut trees = Vec::new();
        for node in &roots {
            materialize(node, &children, &mut materialized, &mut trees);
        }
        trees
    }

    fn collect(&mut self, subtree: &N, inclusive: bool) {
        if !self.scanned_subtrees.insert(subtree.clone()) {
            return;
        }
        if inclusive {
            self.push_if_component(subtree);
        }
        for node in annotated_descendants(subtree) {
            self.push_if_component(&node);
        }
        for portal in find_portal_targets(subtree) {
            self.collect(&portal, true);
        }
        for frame in find_accessible_frames(subtree) {
            self.frame_hosts
                .insert(frame.document.clone(), frame.frame.clone());
            self.collect(&frame.document, true);
        }
    }

    fn push_if_component(&mut self, node: &N) {
        if is_component_node(node) && self.seen.insert(node.clone()) {
            self.components.push(node.clone());
        }
    }

    /// Nearest collected component above `node`, or `None` for a tree root.
    fn parent_component(&self, node: &N) -> Option<N> {
        let mut from = logical_parent(node);
        while let Some(start) = from.take() {
            let mut last = None;
            for ancestor in logical_ancestors(&start) {
                if self.boundary.as_ref() == Some(&ancestor) {
                    return None;
                }
                if self.seen.contains(&ancestor) {
                    return Some(ancestor);
                }
                last = Some(ancestor);
            }
            // Leaving a frame document: continue from the hosting <iframe>.
            from = last.and_then(|top| self.frame_hosts.get(&top).cloned());
        }
        None
    }
}

/// Append the descriptor for `node` to `out`.
///
/// A node that yields no context is left out, and its children take its place.
fn materialize<N: DomNode>(
    node: &N,
    children: &HashMap<N, Vec<N>>,
    materialized: &mut HashSet<N>,
    out: &mut Vec<ComponentDescriptor>,
) {
    if !materialized.insert(node.clone()) {
        return;
    }
    let mut nested = Vec::new();
    for child in children.get(node).into_iter().flatten() {
        materialize(child, children, materialized, &mut nested);
    }
    let metadata = into_generated(accumulate_fragments(node));
    match metadata.contexts.into_iter().next() {
        Some(context) => out.push(ComponentDescriptor {
            detail: context.detail,
            children: nested,
        }),
        None => {
            #[cfg(feature = "tracing")]
            tracing::warn!("component node produced no context; promoting its children");
            out.extend(nested);
        }
    }
}
