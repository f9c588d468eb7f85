// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direction basics.
//!
//! Converts the same physical measurements into logical inline-start values
//! for LTR and RTL documents.
//!
//! Run:
//! - `cargo run -p understory_demos --example direction_basics`

use kurbo::Rect;
use understory_direction::{
    Direction, LogicalRect, logical_client_x, offset_inline_start, scroll_inline_start,
};

fn main() {
    let document_width = 1280.0;
    let column = Rect::new(200.0, 64.0, 440.0, 96.0);

    for css in ["ltr", "rtl"] {
        let direction = Direction::from_css(css);
        println!("== {css} ==");
        println!(
            "offset inline start: {}",
            offset_inline_start(direction, 200.0, 240.0, Some(document_width))
        );
        let scroll_left = if direction.is_rtl() { -120.4 } else { 120.4 };
        println!("scroll inline start: {}", scroll_inline_start(direction, scroll_left));
        println!(
            "pointer at x=300 is {} from inline start",
            logical_client_x(300.0, document_width, direction)
        );
        println!(
            "column: {:?}",
            LogicalRect::from_physical(column, document_width, direction)
        );
    }
}
