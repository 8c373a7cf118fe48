// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tracked-element table.
//!
//! Entries are keyed by a registration sequence number so iteration follows
//! registration order; a side map finds an element's entry by handle.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use kurbo::Rect;

use crate::diff::{Dimensions, build_entry, compute_dimensions};
use crate::host::ComputedStyle;
use crate::types::{BoxModel, ObserverId, ResizeEntry};

/// One tracked element and its last reported sizes.
#[derive(Clone, Debug)]
pub(crate) struct TrackedElement<E> {
    pub(crate) element: E,
    pub(crate) box_model: BoxModel,
    pub(crate) owner: ObserverId,
    pub(crate) previous: Dimensions,
    pub(crate) current: Dimensions,
    pub(crate) style: ComputedStyle,
}

#[derive(Clone, Debug)]
pub(crate) struct ElementRegistry<E> {
    entries: BTreeMap<u64, TrackedElement<E>>,
    by_element: HashMap<E, u64>,
    next_seq: u64,
}

impl<E> Default for ElementRegistry<E> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            by_element: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<E: Copy + Eq + Hash> ElementRegistry<E> {
    /// Track `element` for `owner`, seeded from a fresh read.
    ///
    /// Returns the first-measurement entry, or `None` if the element is already
    /// tracked (by any owner).
    pub(crate) fn register(
        &mut self,
        element: E,
        box_model: BoxModel,
        owner: ObserverId,
        rect: Rect,
        style: ComputedStyle,
    ) -> Option<ResizeEntry<E>> {
        if self.by_element.contains_key(&element) {
            return None;
        }
        let dims = compute_dimensions(rect, &style);
        let entry = build_entry(element, rect, &style, box_model);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_element.insert(element, seq);
        self.entries.insert(
            seq,
            TrackedElement {
                element,
                box_model,
                owner,
                previous: dims,
                current: dims,
                style,
            },
        );
        Some(entry)
    }

    /// Stop tracking `element`, returning its owner if it was tracked.
    pub(crate) fn unregister(&mut self, element: E) -> Option<ObserverId> {
        let seq = self.by_element.remove(&element)?;
        self.entries.remove(&seq).map(|t| t.owner)
    }

    /// Stop tracking everything `owner` owns, returning the removed elements in
    /// registration order.
    pub(crate) fn unregister_owner(&mut self, owner: ObserverId) -> Vec<E> {
        let mut removed = Vec::new();
        self.entries.retain(|_, t| {
            if t.owner == owner {
                removed.push(t.element);
                false
            } else {
                true
            }
        });
        for element in &removed {
            self.by_element.remove(element);
        }
        removed
    }

    /// Drop entries whose element is gone, returning them with their owners.
    pub(crate) fn prune(&mut self, mut is_alive: impl FnMut(E) -> bool) -> Vec<(E, ObserverId)> {
        let mut dead = Vec::new();
        self.entries.retain(|_, t| {
            if is_alive(t.element) {
                true
            } else {
                dead.push((t.element, t.owner));
                false
            }
        });
        for (element, _) in &dead {
            self.by_element.remove(element);
        }
        dead
    }

    pub(crate) fn contains(&self, element: E) -> bool {
        self.by_element.contains_key(&element)
    }

    pub(crate) fn owner_of(&self, element: E) -> Option<ObserverId> {
        let seq = self.by_element.get(&element)?;
        self.entries.get(seq).map(|t| t.owner)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Tracked elements in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TrackedElement<E>> + '_ {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrackedElement<E>> + '_ {
        self.entries.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Insets;

    const A: ObserverId = ObserverId(1);
    const B: ObserverId = ObserverId(2);

    fn rect(w: f64, h: f64) -> Rect {
        Rect::new(0.0, 0.0, w, h)
    }

    #[test]
    fn first_owner_wins() {
        let mut reg = ElementRegistry::default();
        let first = reg.register(7_u32, BoxModel::ContentBox, A, rect(10.0, 10.0), ComputedStyle::default());
        assert_eq!(first.map(|e| e.target), Some(7));
        let again = reg.register(7, BoxModel::BorderBox, B, rect(10.0, 10.0), ComputedStyle::default());
        assert!(again.is_none());
        assert_eq!(reg.owner_of(7), Some(A));
        assert_eq!(reg.iter().next().map(|t| t.box_model), Some(BoxModel::ContentBox));
    }

    #[test]
    fn seeded_snapshot_matches_first_entry() {
        let mut reg = ElementRegistry::default();
        let style = ComputedStyle {
            padding: Insets::uniform(10.0),
            ..Default::default()
        };
        let entry = reg
            .register(1_u32, BoxModel::ContentBox, A, rect(120.0, 50.0), style)
            .unwrap();
        let tracked = reg.iter().next().unwrap();
        assert_eq!(tracked.current, tracked.previous);
        assert_eq!(tracked.current.content.width, entry.content_box_size.inline_size);
    }

    #[test]
    fn owner_removal_keeps_registration_order() {
        let mut reg = ElementRegistry::default();
        for (el, owner) in [(1_u32, A), (2, B), (3, A), (4, B)] {
            reg.register(el, BoxModel::ContentBox, owner, rect(1.0, 1.0), ComputedStyle::default());
        }
        assert_eq!(reg.unregister_owner(A), vec![1, 3]);
        assert_eq!(reg.iter().map(|t| t.element).collect::<Vec<_>>(), vec![2, 4]);
        assert!(!reg.contains(1));
        assert_eq!(reg.unregister(2), Some(B));
        assert_eq!(reg.unregister(2), None);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn prune_reports_dead_elements() {
        let mut reg = ElementRegistry::default();
        for el in 0_u32..4 {
            reg.register(el, BoxModel::ContentBox, A, rect(1.0, 1.0), ComputedStyle::default());
        }
        let dead = reg.prune(|el| el % 2 == 0);
        assert_eq!(dead, vec![(1, A), (3, A)]);
        assert!(!reg.contains(3));
        assert_eq!(reg.prune(|el| el == 0), vec![(2, A)]);
        assert_eq!(reg.len(), 1);
    }
}
