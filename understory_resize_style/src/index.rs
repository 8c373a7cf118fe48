// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule classification: which selectors can drive a size change, and how.
//!
//! ## Overview
//!
//! [`RuleIndex::scan`] walks every rule once (descending into group rules) and sorts
//! selectors into four lists:
//!
//! - animation: rules whose animation names a resize-relevant `@keyframes`;
//! - transition: rules transitioning a size-affecting property;
//! - hover: rules gated on `:hover`, stripped to the hovered element;
//! - activation: rules gated on `:focus`, `:active`, or `:checked`, stripped likewise.
//!
//! State-gated rules are kept whatever they declare: `font-size`, `display`, or
//! generated `content` change a size as surely as `width` does.
//!
//! `@keyframes` may appear after the rules that reference them, so keyframes are
//! collected in a first walk and style rules classified in a second.
//!
//! The index works on selectors only. Resolving them to live elements is the host's job.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use crate::properties::PropertySet;
use crate::rules::{CssRule, StyleRule, walk_rules};
use crate::selector::{PseudoClass, Selector};

/// True for the pseudo-class that gates the hover association.
pub fn is_hover_trigger(pc: &PseudoClass) -> bool {
    matches!(pc, PseudoClass::Hover)
}

/// True for pseudo-classes that gate the active/focus/checked association.
pub fn is_activation_trigger(pc: &PseudoClass) -> bool {
    matches!(
        pc,
        PseudoClass::Focus | PseudoClass::Active | PseudoClass::Checked
    )
}

/// Selector-level classification of a rule set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleIndex {
    resize_keyframes: BTreeSet<String>,
    animation: Vec<Selector>,
    transition: Vec<Selector>,
    hover: Vec<Selector>,
    activation: Vec<Selector>,
}

impl RuleIndex {
    /// Classify `rules` against the size-affecting property set `props`.
    pub fn scan(rules: &[CssRule], props: &PropertySet) -> Self {
        let mut index = Self::default();
        for rule in walk_rules(rules) {
            if let CssRule::Keyframes(kf) = rule {
                if kf.declarations().any(|d| props.contains(&d.name)) {
                    index.resize_keyframes.insert(kf.name.clone());
                }
            }
        }
        for rule in walk_rules(rules) {
            if let CssRule::Style(style) = rule {
                index.classify(style, props);
            }
        }
        index
    }

    fn classify(&mut self, rule: &StyleRule, props: &PropertySet) {
        let animates = rule
            .animation_names()
            .iter()
            .any(|name| self.resize_keyframes.contains(*name));
        let transitions = rule
            .transition_properties()
            .iter()
            .any(|name| props.contains_transition(name));
        for selector in &rule.selectors {
            if animates {
                self.animation.push(selector.without_state());
            }
            if transitions {
                self.transition.push(selector.without_state());
            }
            if let Some(base) = selector.strip_state(is_hover_trigger) {
                self.hover.push(base);
            }
            if let Some(base) = selector.strip_state(is_activation_trigger) {
                self.activation.push(base);
            }
        }
    }

    /// True if `@keyframes name` changes a size-affecting property.
    pub fn is_resize_keyframes(&self, name: &str) -> bool {
        self.resize_keyframes.contains(name)
    }

    /// Selectors of elements whose animation can change their size.
    pub fn animation_selectors(&self) -> &[Selector] {
        &self.animation
    }

    /// Selectors of elements whose transition can change their size.
    pub fn transition_selectors(&self) -> &[Selector] {
        &self.transition
    }

    /// Selectors of elements whose hover state can change some element's size.
    pub fn hover_selectors(&self) -> &[Selector] {
        &self.hover
    }

    /// Selectors of elements whose focus, active, or checked state can change some
    /// element's size.
    pub fn activation_selectors(&self) -> &[Selector] {
        &self.activation
    }

    /// True if nothing was classified.
    pub fn is_empty(&self) -> bool {
        self.animation.is_empty()
            && self.transition.is_empty()
            && self.hover.is_empty()
            && self.activation.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Declaration, GroupKind, GroupRule, Keyframe, KeyframesRule};
    use crate::selector::parse_selector_list;
    use alloc::string::ToString;
    use alloc::vec;

    fn style(selectors: &str, decls: &[(&str, &str)]) -> CssRule {
        CssRule::Style(StyleRule::new(
            parse_selector_list(selectors).unwrap(),
            decls.iter().map(|(n, v)| Declaration::new(n, v)).collect(),
        ))
    }

    fn keyframes(name: &str, decls: &[(&str, &str)]) -> CssRule {
        CssRule::Keyframes(KeyframesRule {
            name: name.into(),
            keyframes: vec![Keyframe {
                key: "100%".into(),
                declarations: decls.iter().map(|(n, v)| Declaration::new(n, v)).collect(),
            }],
        })
    }

    fn names(list: &[Selector]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn keyframes_declared_after_use_still_count() {
        let rules = vec![
            style(
                "#animation-block div:first-child",
                &[("animation", "squeeze-in-out 10s 10s alternate")],
            ),
            style("#fade", &[("animation-name", "fade")]),
            keyframes("squeeze-in-out", &[("width", "50%")]),
            keyframes("fade", &[("opacity", "0")]),
        ];
        let index = RuleIndex::scan(&rules, &PropertySet::new());
        assert!(index.is_resize_keyframes("squeeze-in-out"));
        assert!(!index.is_resize_keyframes("fade"));
        assert_eq!(
            names(index.animation_selectors()),
            vec!["#animation-block div:first-child"]
        );
    }

    #[test]
    fn transitions_need_a_size_property() {
        let rules = vec![
            style("#line", &[("transition", "background-color 30s ease")]),
            style("#grow", &[("transition", "padding 20s ease, margin 0s ease")]),
            style(".any", &[("transition-property", "all")]),
        ];
        let index = RuleIndex::scan(&rules, &PropertySet::new());
        assert_eq!(names(index.transition_selectors()), vec!["#grow", ".any"]);
    }

    #[test]
    fn pseudo_class_rules_are_stripped() {
        let rules = vec![
            style("#hover:hover", &[("height", "100px")]),
            style("#input input:focus ~ div", &[("width", "100px")]),
            style("#checkbox input:checked ~ div", &[("width", "100px")]),
            style("a:hover", &[("font-size", "2em")]),
            style("p:not(:hover)", &[("width", "1px")]),
        ];
        let index = RuleIndex::scan(&rules, &PropertySet::new());
        assert_eq!(names(index.hover_selectors()), vec!["#hover", "a"]);
        assert_eq!(
            names(index.activation_selectors()),
            vec!["#input input", "#checkbox input"]
        );
    }

    #[test]
    fn group_rules_and_extra_properties() {
        let rules = vec![CssRule::Group(GroupRule {
            kind: GroupKind::Media,
            condition: "(min-width: 10px)".into(),
            rules: vec![
                style(".gutter:active", &[("--gutter", "4px")]),
                style(".pad", &[("transition", "--gutter 1s")]),
            ],
        })];
        let plain = RuleIndex::scan(&rules, &PropertySet::new());
        assert_eq!(names(plain.activation_selectors()), vec![".gutter"]);
        assert!(plain.transition_selectors().is_empty());
        let index = RuleIndex::scan(&rules, &PropertySet::with_extra(["--gutter"]));
        assert_eq!(names(index.transition_selectors()), vec![".pad"]);
    }

    #[test]
    fn state_rules_count_whatever_they_declare() {
        let rules = vec![
            style("#hover:hover", &[("font-size", "40px")]),
            style(".tab:focus", &[("display", "none")]),
            style("li:checked::after", &[("content", "'done'")]),
        ];
        let index = RuleIndex::scan(&rules, &PropertySet::new());
        assert_eq!(names(index.hover_selectors()), vec!["#hover"]);
        assert_eq!(names(index.activation_selectors()), vec![".tab", "li"]);
    }

    #[test]
    fn animated_hover_rule_lands_in_both_lists() {
        let rules = vec![
            keyframes("pulse", &[("transform", "scale(2)")]),
            style(".menu:hover::after", &[("animation-name", "pulse")]),
        ];
        let index = RuleIndex::scan(&rules, &PropertySet::new());
        assert_eq!(names(index.animation_selectors()), vec![".menu"]);
        assert_eq!(names(index.hover_selectors()), vec![".menu"]);
    }
}
