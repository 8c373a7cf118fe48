// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_resize_style --heading-base-level=0

//! Understory Resize Style: which style rules can change an element's size.
//!
//! ## Overview
//!
//! Size changes that no discrete event announces come from CSS: animations whose
//! keyframes touch sizing properties, transitions over them, and rules gated on
//! `:hover`, `:focus`, `:active`, or `:checked`. This crate classifies a host's parsed
//! rules so a resize watcher knows which elements to keep an eye on.
//!
//! - [`rules`]: the parsed rule model (style rules, `@keyframes`, group rules).
//! - [`selector`]: structured selectors, a small parser, and state stripping.
//! - [`properties`]: the size-affecting property allow-list.
//! - [`index`]: [`RuleIndex::scan`], the classification pass.
//!
//! It does not match selectors against elements; hosts resolve the classified
//! selectors against their own tree.
//!
//! ## Example
//!
//! ```
//! use understory_resize_style::{CssRule, Declaration, PropertySet, RuleIndex, StyleRule};
//! use understory_resize_style::selector::parse_selector_list;
//!
//! let rules = vec![CssRule::Style(StyleRule::new(
//!     parse_selector_list("#checkbox input:checked ~ div").unwrap(),
//!     vec![Declaration::new("width", "100px")],
//! ))];
//!
//! let index = RuleIndex::scan(&rules, &PropertySet::new());
//! let bases: Vec<String> = index.activation_selectors().iter().map(|s| s.to_string()).collect();
//! assert_eq!(bases, ["#checkbox input"]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod index;
pub mod properties;
pub mod rules;
pub mod selector;

pub use index::RuleIndex;
pub use properties::PropertySet;
pub use rules::{CssRule, Declaration, GroupKind, GroupRule, Keyframe, KeyframesRule, StyleRule};
pub use selector::{Selector, SelectorParseError};
