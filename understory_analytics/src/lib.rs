// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_analytics --heading-base-level=0

//! Understory Analytics: structured interaction metadata derived from an annotated DOM.
//!
//! ## Overview
//!
//! Components annotate the nodes they render with small JSON metadata
//! fragments (see [`attributes`]). When the user interacts with a node, this
//! crate walks from that node up its *logical* ancestry, decodes every
//! fragment on the way, resolves deferred label references against the live
//! DOM, and merges everything into one [`GeneratedAnalyticsMetadata`]:
//!
//! - `action`: what happened, for example `"select"`.
//! - `detail`: action details, with every label resolved to text.
//! - `contexts`: the enclosing components, nearest first.
//!
//! It can also scan a page (or a subtree) and rebuild the logical
//! [`ComponentDescriptor`] tree, including content rendered through portals
//! and inside accessible same-origin frames.
//!
//! ## Logical parents
//!
//! Content rendered away from its owner (a portal) carries a
//! [`REFERRER_ATTRIBUTE`](attributes::REFERRER_ATTRIBUTE) naming the id of an
//! anchor placed at its logical position. Every walk in this crate follows
//! that back-reference instead of the physical parent. See [`navigator`].
//!
//! ## Labels
//!
//! Any fragment key ending in `label` resolves to one string, and any key
//! ending in `labels` to a list, by evaluating a [`LabelIdentifier`] against
//! the annotated node. See [`labels`].
//!
//! ## Activation
//!
//! Everything is gated by an [`Analytics`] context. When inactive, encoders
//! write nothing and queries return empty results without reading the DOM.
//! The free functions in this crate use the process-wide
//! [`Analytics::global`] instance, which starts inactive.
//!
//! ## DOM access
//!
//! The engine is generic over the [`DomNode`](dom::DomNode) trait. With the
//! `html_adapter` feature, [`adapters::html`] implements it
//! over parsed HTML documents:
//!
//! ```
//! use understory_analytics::adapters::html::HtmlPage;
//! use understory_analytics::Analytics;
//!
//! let page = HtmlPage::parse(r#"
//!     <div data-awsui-analytics='{"component":{"name":"Dialog","label":"h2"}}'>
//!         <h2>Delete file</h2>
//!         <button id="ok" data-awsui-analytics='{"action":"click","detail":{"label":""}}'>OK</button>
//!     </div>
//! "#);
//! let button = page.select("#ok").unwrap();
//!
//! let analytics = Analytics::new(true);
//! let metadata = analytics.generated_metadata(Some(&button));
//! assert_eq!(metadata.action.as_deref(), Some("click"));
//! assert_eq!(metadata.detail["label"], "OK");
//! assert_eq!(metadata.contexts[0].detail.name, "Dialog");
//! assert_eq!(metadata.contexts[0].detail.label.as_deref(), Some("Delete file"));
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): diagnostics for skipped metadata, selectors and frames.
//! - `html_adapter`: the `scraper`-backed DOM adapter.
//!
//! ## Errors
//!
//! Query operations never fail. Malformed fragments, unresolvable references
//! and inaccessible frames degrade to missing data. The fallible building
//! blocks ([`try_decode_metadata`], [`DomNode::content_document`](dom::DomNode::content_document))
//! report the reason as [`MetadataError`] or [`FrameAccessError`](dom::FrameAccessError).

pub mod adapters;
mod aggregate;
pub mod attributes;
pub mod dom;
pub mod labels;
pub mod merge;
pub mod navigator;
mod scanner;
pub mod types;

pub use attributes::{
    Analytics, Attributes, MetadataError, decode_metadata, try_decode_metadata,
};
pub use dom::{DomNode, FrameAccessError};
pub use types::{
    ComponentContext, ComponentDescriptor, ComponentDetail, ComponentFragment, ContextKind,
    Fragment, GeneratedAnalyticsMetadata, LabelIdentifier, LabelMode, LabelRoot, LabelSelector,
    MetadataFragment, RawAnalyticsMetadata, ResolvedLabel,
};

/// Switch metadata generation on or off for the process-wide context.
pub fn activate_analytics_metadata(active: bool) {
    Analytics::global().set_active(active);
}

/// [`Analytics::generated_metadata`] on the process-wide context.
pub fn get_generated_analytics_metadata<N: DomNode>(
    target: Option<&N>,
) -> GeneratedAnalyticsMetadata {
    Analytics::global().generated_metadata(target)
}

/// [`Analytics::raw_metadata`] on the process-wide context.
pub fn get_raw_analytics_metadata<N: DomNode>(target: Option<&N>) -> RawAnalyticsMetadata {
    Analytics::global().raw_metadata(target)
}

/// [`Analytics::components_tree`] on the process-wide context.
pub fn get_components_tree<N: DomNode>(root: Option<&N>) -> Vec<ComponentDescriptor> {
    Analytics::global().components_tree(root)
}

/// [`Analytics::document_components_tree`] on the process-wide context.
pub fn get_document_components_tree<N: DomNode>(node: Option<&N>) -> Vec<ComponentDescriptor> {
    Analytics::global().document_components_tree(node)
}

/// [`Analytics::metadata_attributes`] on the process-wide context.
pub fn get_analytics_metadata_attribute<T: serde::Serialize + ?Sized>(fragment: &T) -> Attributes {
    Analytics::global().metadata_attributes(fragment)
}

/// [`Analytics::label_attributes`] on the process-wide context.
pub fn get_analytics_label_attribute(selector: &str) -> Attributes {
    Analytics::global().label_attributes(selector)
}

/// [`Analytics::copy_metadata_attributes`] on the process-wide context.
pub fn copy_analytics_metadata_attribute(attributes: &Attributes) -> Attributes {
    Analytics::global().copy_metadata_attributes(attributes)
}
