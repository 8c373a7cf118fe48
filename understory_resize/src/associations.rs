// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element-level associations resolved from a [`RuleIndex`].

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use understory_resize_style::RuleIndex;
use understory_resize_style::selector::Selector;

use crate::host::Host;

/// Which live elements can drive a size change, and how.
#[derive(Clone, Debug)]
pub(crate) struct Associations<E> {
    /// Elements with a size-changing animation, mapped to whether it runs now.
    animation: HashMap<E, bool>,
    transition: HashSet<E>,
    hover: HashSet<E>,
    activation: HashSet<E>,
}

impl<E> Default for Associations<E> {
    fn default() -> Self {
        Self {
            animation: HashMap::new(),
            transition: HashSet::new(),
            hover: HashSet::new(),
            activation: HashSet::new(),
        }
    }
}

fn matched<H: Host>(host: &H, selectors: &[Selector]) -> Vec<H::Element> {
    selectors
        .iter()
        .flat_map(|sel| host.query_selector_all(sel))
        .collect()
}

impl<E: Copy + Eq + Hash> Associations<E> {
    /// Resolve every selector of `index` against the host's live tree.
    pub(crate) fn resolve<H: Host<Element = E>>(host: &H, index: &RuleIndex) -> Self {
        let animation = matched(host, index.animation_selectors())
            .into_iter()
            .map(|el| (el, host.computed_style(el).is_animating()))
            .collect();
        Self {
            animation,
            transition: matched(host, index.transition_selectors()).into_iter().collect(),
            hover: matched(host, index.hover_selectors()).into_iter().collect(),
            activation: matched(host, index.activation_selectors()).into_iter().collect(),
        }
    }

    pub(crate) fn is_animated(&self, element: E) -> bool {
        self.animation.contains_key(&element)
    }

    pub(crate) fn is_transitioned(&self, element: E) -> bool {
        self.transition.contains(&element)
    }

    /// Record the live play state of an animation-associated element.
    pub(crate) fn set_running(&mut self, element: E, running: bool) {
        if let Some(state) = self.animation.get_mut(&element) {
            *state = running;
        }
    }

    /// Associated elements between the root and `target` (inclusive) whose hover state
    /// can change a size, root first.
    pub(crate) fn hover_chain<H: Host<Element = E>>(&self, host: &H, target: Option<E>) -> Vec<E> {
        chain(host, target, &self.hover)
    }

    /// Like [`hover_chain`](Self::hover_chain) for focus, active, and checked.
    pub(crate) fn activation_chain<H: Host<Element = E>>(
        &self,
        host: &H,
        target: Option<E>,
    ) -> Vec<E> {
        chain(host, target, &self.activation)
    }

    /// Forget associations of elements that are no longer alive.
    pub(crate) fn retain(&mut self, mut is_alive: impl FnMut(E) -> bool) {
        self.animation.retain(|el, _| is_alive(*el));
        self.transition.retain(|el| is_alive(*el));
        self.hover.retain(|el| is_alive(*el));
        self.activation.retain(|el| is_alive(*el));
    }

    pub(crate) fn len(&self) -> usize {
        self.animation.len() + self.transition.len() + self.hover.len() + self.activation.len()
    }
}

/// Iterative ancestor walk collecting members of `set`, root first.
fn chain<H: Host>(
    host: &H,
    target: Option<H::Element>,
    set: &HashSet<H::Element>,
) -> Vec<H::Element> {
    let mut out = Vec::new();
    if set.is_empty() {
        return out;
    }
    let mut node = target.filter(|el| host.is_alive(*el));
    while let Some(el) = node {
        if set.contains(&el) {
            out.push(el);
        }
        node = host.parent(el);
    }
    out.reverse();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_host::MemoryHost;
    use understory_resize_style::selector::parse_selector_list;
    use understory_resize_style::{CssRule, Declaration, PropertySet, StyleRule};

    fn rule(selectors: &str, name: &str, value: &str) -> CssRule {
        CssRule::Style(StyleRule::new(
            parse_selector_list(selectors).unwrap(),
            vec![Declaration::new(name, value)],
        ))
    }

    #[test]
    fn chains_are_root_first_and_filtered() {
        let mut host = MemoryHost::new();
        let root = host.root();
        let rules = vec![
            rule(".menu:hover", "height", "10px"),
            rule(".menu .item:hover", "width", "10px"),
            rule(".tip:hover", "font-weight", "bold"),
        ];
        let menu = host.append(root, "div");
        host.add_class(menu, "menu");
        let item = host.append(menu, "div");
        host.add_class(item, "item");
        let tip = host.append(item, "span");
        host.add_class(tip, "tip");
        let label = host.append(item, "span");

        let index = RuleIndex::scan(&rules, &PropertySet::new());
        let assoc = Associations::resolve(&host, &index);
        assert_eq!(assoc.hover_chain(&host, Some(tip)), vec![menu, item, tip]);
        assert_eq!(assoc.hover_chain(&host, Some(label)), vec![menu, item]);
        assert_eq!(assoc.hover_chain(&host, Some(menu)), vec![menu]);
        assert!(assoc.hover_chain(&host, None).is_empty());
        assert!(assoc.activation_chain(&host, Some(tip)).is_empty());

        host.remove(item);
        assert!(
            assoc.hover_chain(&host, Some(tip)).is_empty(),
            "removed targets have no chain"
        );
    }

    #[test]
    fn animation_state_tracks_play_state() {
        let mut host = MemoryHost::new();
        let root = host.root();
        let rules = vec![rule("#spin", "transition", "width 1s")];
        let el = host.append(root, "div");
        host.set_id(el, "spin");

        let index = RuleIndex::scan(&rules, &PropertySet::new());
        let mut assoc = Associations::resolve(&host, &index);
        assert!(assoc.is_transitioned(el));
        assert!(!assoc.is_animated(el));
        assoc.set_running(el, true);
        assert!(!assoc.is_animated(el), "set_running never adds an association");
        assert_eq!(assoc.len(), 1);

        host.remove(el);
        assoc.retain(|e| host.is_alive(e));
        assert_eq!(assoc.len(), 0);
    }
}
