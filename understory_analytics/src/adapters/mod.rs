// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Implementations of [`DomNode`](crate::dom::DomNode) for concrete trees.
//!
//! Enabled via feature flags to keep the core free of parser dependencies.

#[cfg(feature = "html_adapter")]
pub mod html;
