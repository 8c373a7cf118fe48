// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-observer handle.

use std::fmt;

use crate::error::ArgumentError;
use crate::host::Host;
use crate::types::{ObserveOptions, ObserverId};
use crate::watcher::ResizeWatcher;

/// One observer: a callback plus the elements it observes.
///
/// Created by [`ResizeWatcher::observer`]. Dropping the observer disconnects it.
pub struct ResizeObserver<H: Host> {
    id: ObserverId,
    watcher: ResizeWatcher<H>,
}

impl<H: Host> ResizeObserver<H> {
    pub(crate) fn new(id: ObserverId, watcher: ResizeWatcher<H>) -> Self {
        Self { id, watcher }
    }

    /// This observer's identifier.
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// The watcher this observer belongs to.
    pub fn watcher(&self) -> &ResizeWatcher<H> {
        &self.watcher
    }

    /// Start observing `element`.
    ///
    /// The callback receives the element's current size right away, before this
    /// returns (or right after the callback returns, if called from inside it).
    /// Observing an element that is already tracked, by this or another observer,
    /// does nothing.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::NotAnElement`] if `element` no longer exists.
    pub fn observe(&self, element: H::Element, options: ObserveOptions) -> Result<(), ArgumentError> {
        self.watcher.observe(self.id, element, options)
    }

    /// Stop observing `element`. Elements this observer does not own are ignored.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::NotAnElement`] if `element` no longer exists.
    pub fn unobserve(&self, element: H::Element) -> Result<(), ArgumentError> {
        self.watcher.unobserve(self.id, element)
    }

    /// Stop observing everything. Calling it again does nothing.
    pub fn disconnect(&self) {
        self.watcher.disconnect(self.id);
    }

    /// Observed elements, in registration order.
    pub fn observed(&self) -> Vec<H::Element> {
        self.watcher.observed(self.id)
    }
}

impl<H: Host> fmt::Debug for ResizeObserver<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeObserver")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Drop for ResizeObserver<H> {
    fn drop(&mut self) {
        self.watcher.remove_observer(self.id);
    }
}
