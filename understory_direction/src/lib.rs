// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_direction --heading-base-level=0

//! Understory Direction: direction-agnostic inline geometry.
//!
//! ## Overview
//!
//! Browsers report horizontal positions from the physical left edge no matter
//! the writing direction. Code that positions popovers, resizes columns or
//! tracks drags is simpler when it works in *logical* terms: distance from
//! the inline-start edge, which is the left edge in LTR and the right edge in
//! RTL. The helpers here convert physical values to logical ones given a
//! [`Direction`].
//!
//! ```
//! use kurbo::Rect;
//! use understory_direction::{Direction, LogicalRect};
//!
//! // A 100px wide box whose right edge sits 50px from the right of a 1000px document.
//! let rect = Rect::new(850.0, 10.0, 950.0, 30.0);
//! let logical = LogicalRect::from_physical(rect, 1000.0, Direction::Rtl);
//! assert_eq!(logical.inset_inline_start, 50.0);
//! assert_eq!(logical.inset_inline_end, 150.0);
//! assert_eq!(logical.block_size, 20.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::Rect;

/// Inline base direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

impl Direction {
    /// Parse a computed CSS `direction` value. Anything but `rtl` is LTR.
    pub fn from_css(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("rtl") {
            Self::Rtl
        } else {
            Self::Ltr
        }
    }

    /// Whether this is [`Direction::Rtl`].
    pub fn is_rtl(self) -> bool {
        self == Self::Rtl
    }
}

/// Offset of an element from the inline-start edge of its offset parent.
///
/// `offset_left` is measured from the parent's left edge. In RTL the result is
/// measured from the right edge instead; a missing parent counts as zero width.
pub fn offset_inline_start(
    direction: Direction,
    offset_left: f64,
    offset_width: f64,
    offset_parent_width: Option<f64>,
) -> f64 {
    if direction.is_rtl() {
        offset_parent_width.unwrap_or(0.0) - offset_width - offset_left
    } else {
        offset_left
    }
}

/// Scroll distance from the inline-start edge.
///
/// RTL scroll positions are non-positive; the result is positive in both
/// directions. Fractional values from display scaling are rounded toward the
/// start edge.
pub fn scroll_inline_start(direction: Direction, scroll_left: f64) -> f64 {
    if direction.is_rtl() {
        -floor(scroll_left)
    } else {
        ceil(scroll_left)
    }
}

/// Horizontal pointer position measured from the inline-start edge of the viewport.
pub fn logical_client_x(client_x: f64, document_width: f64, direction: Direction) -> f64 {
    if direction.is_rtl() {
        document_width - client_x
    } else {
        client_x
    }
}

/// Horizontal page position measured from the inline-start edge of the document.
pub fn logical_page_x(page_x: f64, document_width: f64, direction: Direction) -> f64 {
    logical_client_x(page_x, document_width, direction)
}

/// A bounding box expressed in logical (block/inline) terms.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LogicalRect {
    /// Height.
    pub block_size: f64,
    /// Width.
    pub inline_size: f64,
    /// Top edge.
    pub inset_block_start: f64,
    /// Bottom edge.
    pub inset_block_end: f64,
    /// Distance of the inline-start edge from the document's inline-start edge.
    pub inset_inline_start: f64,
    /// `inset_inline_start + inline_size`.
    pub inset_inline_end: f64,
}

impl LogicalRect {
    /// Convert a physical bounding box within a document of `document_width`.
    pub fn from_physical(rect: Rect, document_width: f64, direction: Direction) -> Self {
        let rect = rect.abs();
        let inline_size = rect.width();
        let inset_inline_start = if direction.is_rtl() {
            document_width - rect.x1
        } else {
            rect.x0
        };
        Self {
            block_size: rect.height(),
            inline_size,
            inset_block_start: rect.y0,
            inset_block_end: rect.y1,
            inset_inline_start,
            inset_inline_end: inset_inline_start + inline_size,
        }
    }
}

#[inline]
fn floor(v: f64) -> f64 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Scroll offsets are far inside the i64 range."
    )]
    let i = v as i64;
    #[allow(clippy::cast_precision_loss, reason = "Round trip of an in-range integer.")]
    let f = i as f64;
    if f > v { f - 1.0 } else { f }
}

#[inline]
fn ceil(v: f64) -> f64 {
    -floor(-v)
}
