// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute codec and the activation switch.
//!
//! ## Overview
//!
//! Metadata travels from the rendering layer to the engine as string
//! attributes on DOM nodes:
//!
//! - [`METADATA_ATTRIBUTE`] holds a JSON-serialized [`Fragment`].
//! - [`LABEL_ATTRIBUTE`] holds a selector that redirects label resolution.
//! - [`REFERRER_ATTRIBUTE`] holds the id of a portal's logical anchor.
//!
//! Encoding goes through an [`Analytics`] context so that it can be switched
//! off as a whole. Decoding is always available and never fails loudly:
//! [`decode_metadata`] maps every problem to `None`, while
//! [`try_decode_metadata`] reports the reason.

use core::sync::atomic::{AtomicBool, Ordering};
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::dom::DomNode;
use crate::types::Fragment;

/// Attribute carrying a serialized metadata fragment.
pub const METADATA_ATTRIBUTE: &str = "data-awsui-analytics";

/// Attribute carrying a label-redirect selector.
pub const LABEL_ATTRIBUTE: &str = "data-awsui-analytics-label";

/// Attribute carrying a portal back-reference (the id of the logical anchor).
pub const REFERRER_ATTRIBUTE: &str = "data-awsui-referrer-id";

/// An attribute set to apply to (or read from) a node, keyed by attribute name.
pub type Attributes = BTreeMap<String, String>;

/// Errors from decoding a metadata attribute.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The attribute is not valid JSON.
    #[error("malformed analytics metadata: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The attribute is valid JSON but not an object.
    #[error("analytics metadata is not a JSON object")]
    NotAnObject,
    /// A known field holds a value of the wrong JSON type.
    #[error("analytics metadata field `{0}` has the wrong type")]
    Shape(&'static str),
}

/// Activation context for metadata generation.
///
/// When inactive, encoders return empty attribute sets and every query
/// returns an empty result without touching the DOM.
///
/// Most hosts use the process-wide [`Analytics::global`] instance through the
/// crate's free functions. Independent instances are useful where several
/// configurations must coexist, such as tests.
pub struct Analytics {
    active: AtomicBool,
}

impl core::fmt::Debug for Analytics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Analytics")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new(false)
    }
}

static GLOBAL: Analytics = Analytics::new(false);

impl Analytics {
    /// Create a context with the given activation state.
    pub const fn new(active: bool) -> Self {
        Self {
            active: AtomicBool::new(active),
        }
    }

    /// The process-wide context. Starts inactive.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Switch metadata generation on or off. Last write wins.
    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    /// Whether metadata generation is on.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Attributes that attach `fragment` to a node.
    ///
    /// Accepts a typed [`MetadataFragment`](crate::MetadataFragment) or a raw
    /// [`Fragment`]. Empty when inactive or when the value cannot be serialized.
    pub fn metadata_attributes<T: Serialize + ?Sized>(&self, fragment: &T) -> Attributes {
        let mut attributes = Attributes::new();
        if !self.is_active() {
            return attributes;
        }
        match serde_json::to_string(fragment) {
            Ok(encoded) => {
                attributes.insert(METADATA_ATTRIBUTE.into(), encoded);
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "analytics metadata could not be serialized");
            }
        }
        attributes
    }

    /// Attributes that redirect label resolution on a node to `selector`.
    ///
    /// Empty when inactive.
    pub fn label_attributes(&self, selector: &str) -> Attributes {
        let mut attributes = Attributes::new();
        if self.is_active() {
            attributes.insert(LABEL_ATTRIBUTE.into(), selector.into());
        }
        attributes
    }

    /// Pick the metadata attribute out of `attributes`, for forwarding to
    /// another element.
    ///
    /// Empty when inactive or when no metadata attribute is present.
    pub fn copy_metadata_attributes(&self, attributes: &Attributes) -> Attributes {
        let mut copied = Attributes::new();
        if !self.is_active() {
            return copied;
        }
        if let Some(value) = attributes.get(METADATA_ATTRIBUTE) {
            copied.insert(METADATA_ATTRIBUTE.into(), value.clone());
        }
        copied
    }
}

/// Parse a metadata attribute value.
///
/// Empty values are treated as absent. A fragment whose known fields hold the
/// wrong JSON type is rejected as a whole, like malformed JSON.
pub fn parse_metadata(encoded: &str) -> Result<Option<Fragment>, MetadataError> {
    if encoded.is_empty() {
        return Ok(None);
    }
    match serde_json::from_str(encoded)? {
        Value::Object(fragment) => {
            check_shape(&fragment)?;
            Ok(Some(fragment))
        }
        _ => Err(MetadataError::NotAnObject),
    }
}

type ShapeRule = (&'static str, &'static str, fn(&Value) -> bool);

const FRAGMENT_SHAPE: [ShapeRule; 3] = [
    ("action", "action", Value::is_string),
    ("detail", "detail", Value::is_object),
    ("component", "component", Value::is_object),
];

const COMPONENT_SHAPE: [ShapeRule; 4] = [
    ("name", "component.name", Value::is_string),
    ("instanceIdentifier", "component.instanceIdentifier", Value::is_string),
    ("properties", "component.properties", Value::is_object),
    ("innerContext", "component.innerContext", Value::is_object),
];

/// Null counts as absent. Label values are free-form and not checked here.
fn check_shape(fragment: &Fragment) -> Result<(), MetadataError> {
    check_fields(fragment, &FRAGMENT_SHAPE)?;
    if let Some(Value::Object(component)) = fragment.get("component") {
        check_fields(component, &COMPONENT_SHAPE)?;
    }
    Ok(())
}

fn check_fields(object: &Fragment, rules: &[ShapeRule]) -> Result<(), MetadataError> {
    for &(key, field, accepts) in rules {
        match object.get(key) {
            Some(value) if !value.is_null() && !accepts(value) => {
                return Err(MetadataError::Shape(field));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Read and parse the metadata fragment attached to `node`.
///
/// `Ok(None)` when the node carries no (or an empty) metadata attribute.
pub fn try_decode_metadata<N: DomNode>(node: &N) -> Result<Option<Fragment>, MetadataError> {
    match node.attribute(METADATA_ATTRIBUTE) {
        Some(encoded) => parse_metadata(encoded),
        None => Ok(None),
    }
}

/// Read the metadata fragment attached to `node`, skipping malformed content.
pub fn decode_metadata<N: DomNode>(node: &N) -> Option<Fragment> {
    match try_decode_metadata(node) {
        Ok(fragment) => fragment,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::trace!(error = %_err, "skipping malformed analytics metadata");
            None
        }
    }
}

/// The label-redirect selector on `node`, if present and non-empty.
pub fn decode_label_redirect<N: DomNode>(node: &N) -> Option<&str> {
    node.attribute(LABEL_ATTRIBUTE)
        .filter(|selector| !selector.is_empty())
}
