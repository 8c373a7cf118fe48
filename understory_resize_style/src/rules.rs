// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parsed style rules as hosts expose them: style rules, keyframes, and group rules.
//!
//! Declarations hold their value as a list of comma-separated items, which is how
//! list-valued properties such as `animation-name` and `transition-property` are read.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::selector::Selector;

/// One `name: value` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Lower-case property name.
    pub name: String,
    /// Comma-separated value items, trimmed.
    pub items: Vec<String>,
}

impl Declaration {
    /// Build a declaration, splitting `value` into its comma-separated items.
    ///
    /// Commas inside parentheses, as in `cubic-bezier(..)`, do not split.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.trim().to_ascii_lowercase(),
            items: split_items(value),
        }
    }

    /// True if the value has no items (for example `animation-name: ;`).
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whitespace-separated tokens across all items.
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().flat_map(|item| item.split_whitespace())
    }
}

/// A qualified style rule: selector list plus declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    /// The rule's selectors.
    pub selectors: Vec<Selector>,
    /// The rule's declarations, in source order.
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    /// Create a style rule.
    pub fn new(selectors: Vec<Selector>, declarations: Vec<Declaration>) -> Self {
        Self {
            selectors,
            declarations,
        }
    }

    /// Last declaration of `name`, matching cascade order within one rule.
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().rev().find(|d| d.name == name)
    }

    /// Last declaration of either `longhand` or `shorthand`, whichever comes later.
    fn last_of(&self, longhand: &str, shorthand: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .rev()
            .find(|d| d.name == longhand || d.name == shorthand)
    }

    /// Animation names the rule applies.
    ///
    /// Reads whichever of `animation-name` and the `animation` shorthand is declared
    /// last. Shorthand tokens include durations and keywords; callers compare them
    /// against known keyframe names.
    pub fn animation_names(&self) -> Vec<&str> {
        match self.last_of("animation-name", "animation") {
            Some(d) if d.name == "animation" => d.tokens().collect(),
            Some(d) => d
                .items
                .iter()
                .map(String::as_str)
                .filter(|n| *n != "none")
                .collect(),
            None => Vec::new(),
        }
    }

    /// Properties the rule transitions.
    ///
    /// Reads whichever of `transition-property` and the `transition` shorthand is
    /// declared last. Each shorthand item contributes its first token that names a
    /// property, skipping durations, delays, and timing functions; an item naming no
    /// property transitions `all`.
    pub fn transition_properties(&self) -> Vec<&str> {
        let Some(decl) = self.last_of("transition-property", "transition") else {
            return Vec::new();
        };
        let names: Vec<&str> = if decl.name == "transition" {
            decl.items
                .iter()
                .map(|item| {
                    item.split_whitespace()
                        .find(|t| is_property_token(t))
                        .unwrap_or("all")
                })
                .collect()
        } else {
            decl.items.iter().map(String::as_str).collect()
        };
        names.into_iter().filter(|n| *n != "none").collect()
    }
}

/// Split at top-level commas, trimming and dropping empty items.
fn split_items(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 0_u32;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&value[start..]);
    items
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// True if a `transition` shorthand token can be the property name.
fn is_property_token(token: &str) -> bool {
    let named = token.starts_with("--") || token.starts_with(|c: char| c.is_ascii_alphabetic());
    named
        && !token.contains(['(', ')'])
        && !matches!(
            token,
            "ease"
                | "ease-in"
                | "ease-out"
                | "ease-in-out"
                | "linear"
                | "step-start"
                | "step-end"
                | "normal"
                | "allow-discrete"
        )
}

/// One block of a `@keyframes` rule, e.g. `50% { width: 10px }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keyframe {
    /// Key text such as `from`, `to`, or `50%`.
    pub key: String,
    /// The block's declarations.
    pub declarations: Vec<Declaration>,
}

/// A `@keyframes name { .. }` rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyframesRule {
    /// Animation name.
    pub name: String,
    /// Keyframe blocks.
    pub keyframes: Vec<Keyframe>,
}

impl KeyframesRule {
    /// Iterate every declaration across all blocks.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> + '_ {
        self.keyframes.iter().flat_map(|k| k.declarations.iter())
    }
}

/// Kind of a conditional group rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GroupKind {
    /// `@media`
    Media,
    /// `@supports`
    Supports,
    /// `@layer`, `@container`, and similar wrappers.
    Other,
}

/// A conditional group rule holding nested rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupRule {
    /// Which at-rule this is.
    pub kind: GroupKind,
    /// Condition text, for diagnostics.
    pub condition: String,
    /// Nested rules.
    pub rules: Vec<CssRule>,
}

/// Any rule the index understands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CssRule {
    /// Qualified style rule.
    Style(StyleRule),
    /// `@keyframes`.
    Keyframes(KeyframesRule),
    /// `@media`, `@supports`, and other group rules.
    Group(GroupRule),
}

/// Depth-first iterator over rules, descending into group rules.
pub fn walk_rules<'a>(rules: &'a [CssRule]) -> impl Iterator<Item = &'a CssRule> + 'a {
    let mut stack: Vec<core::slice::Iter<'a, CssRule>> = alloc::vec![rules.iter()];
    core::iter::from_fn(move || {
        loop {
            let top = stack.last_mut()?;
            match top.next() {
                Some(rule) => {
                    if let CssRule::Group(group) = rule {
                        stack.push(group.rules.iter());
                    }
                    return Some(rule);
                }
                None => {
                    stack.pop();
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn rule(decls: &[(&str, &str)]) -> StyleRule {
        StyleRule::new(
            vec![Selector::parse("div").unwrap()],
            decls.iter().map(|(n, v)| Declaration::new(n, v)).collect(),
        )
    }

    #[test]
    fn declaration_items_are_trimmed() {
        let d = Declaration::new(" Transition-Property ", "width , height,");
        assert_eq!(d.name, "transition-property");
        assert_eq!(d.items, vec!["width", "height"]);
        assert!(Declaration::new("animation-name", " ").is_empty());
    }

    #[test]
    fn later_declaration_wins() {
        let r = rule(&[
            ("animation", "spin 1s linear"),
            ("animation-name", "grow, none"),
        ]);
        assert_eq!(r.animation_names(), vec!["grow"]);
        let r = rule(&[("animation-name", "grow"), ("animation", "spin 1s linear")]);
        assert!(r.animation_names().contains(&"spin"));
        assert!(!r.animation_names().contains(&"grow"));

        let r = rule(&[("transition-property", "color"), ("transition", "width 1s")]);
        assert_eq!(r.transition_properties(), vec!["width"]);
        let r = rule(&[("transition", "width 1s"), ("transition-property", "color")]);
        assert_eq!(r.transition_properties(), vec!["color"]);
    }

    #[test]
    fn transition_shorthand_yields_property_per_item() {
        let r = rule(&[("transition", "padding 20s ease, margin 0s ease")]);
        assert_eq!(r.transition_properties(), vec!["padding", "margin"]);
        let r = rule(&[("transition-property", "none")]);
        assert!(r.transition_properties().is_empty());
    }

    #[test]
    fn transition_shorthand_skips_times_and_timing_functions() {
        let r = rule(&[("transition", "2s width")]);
        assert_eq!(r.transition_properties(), vec!["width"]);
        let r = rule(&[(
            "transition",
            "1s cubic-bezier(0.1, 0.7, 1, 0.1) height, ease-in 0.5s --gutter",
        )]);
        assert_eq!(r.transition_properties(), vec!["height", "--gutter"]);
        let r = rule(&[("transition", "300ms ease")]);
        assert_eq!(r.transition_properties(), vec!["all"]);
        let r = rule(&[("transition", "none")]);
        assert!(r.transition_properties().is_empty());
        assert_eq!(
            Declaration::new("transition", "width 1s steps(4, end), top 2s").items,
            vec!["width 1s steps(4, end)", "top 2s"]
        );
    }

    #[test]
    fn walk_descends_into_groups() {
        let inner = CssRule::Style(rule(&[("width", "1px")]));
        let rules = vec![
            CssRule::Group(GroupRule {
                kind: GroupKind::Media,
                condition: "screen".into(),
                rules: vec![inner.clone(), inner.clone()],
            }),
            inner,
        ];
        assert_eq!(walk_rules(&rules).count(), 4);
    }
}
