// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouping changed entries per observer and invoking callbacks in isolation.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use tracing::warn;

use crate::types::{ObserverId, ResizeEntry};

/// A shared observer callback.
pub(crate) type Callback<E> = Rc<RefCell<dyn FnMut(&[ResizeEntry<E>])>>;

/// One observer: its callback and the elements it owns.
pub(crate) struct Subscriber<E> {
    pub(crate) callback: Callback<E>,
    pub(crate) owned: HashSet<E>,
}

impl<E> Subscriber<E> {
    pub(crate) fn new(callback: Callback<E>) -> Self {
        Self {
            callback,
            owned: HashSet::new(),
        }
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for Subscriber<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("owned", &self.owned)
            .finish_non_exhaustive()
    }
}

/// Entries bucketed by owner.
///
/// Buckets are ordered by their first entry; entries keep push order.
#[derive(Debug)]
pub(crate) struct Buckets<E> {
    order: Vec<ObserverId>,
    entries: HashMap<ObserverId, Vec<ResizeEntry<E>>>,
}

impl<E> Default for Buckets<E> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<E> Buckets<E> {
    pub(crate) fn push(&mut self, owner: ObserverId, entry: ResizeEntry<E>) {
        self.entries
            .entry(owner)
            .or_insert_with(|| {
                self.order.push(owner);
                Vec::new()
            })
            .push(entry);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Non-empty buckets in first-change order.
    pub(crate) fn into_batches(mut self) -> Vec<(ObserverId, Vec<ResizeEntry<E>>)> {
        self.order
            .iter()
            .filter_map(|id| self.entries.remove(id).map(|entries| (*id, entries)))
            .collect()
    }
}

/// Outcome of handing a batch to its callback.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Delivery {
    /// The callback ran (and may have panicked, which is logged).
    Delivered,
    /// The callback is running further up the stack; retry once it returns.
    Busy,
}

/// Invoke `callback` with `entries`, containing any panic.
pub(crate) fn deliver<E>(
    id: ObserverId,
    callback: &Callback<E>,
    entries: &[ResizeEntry<E>],
) -> Delivery {
    let Ok(mut f) = callback.try_borrow_mut() else {
        return Delivery::Busy;
    };
    if catch_unwind(AssertUnwindSafe(|| (&mut *f)(entries))).is_err() {
        warn!(
            observer = id.get(),
            entries = entries.len(),
            "resize callback panicked; continuing with the next observer"
        );
    }
    Delivery::Delivered
}
