// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Idle / polling state and the frame loop bookkeeping.
//!
//! The scheduler polls every frame while at least one element is mid-animation or
//! mid-transition, and otherwise sits idle. It owns at most one pending frame.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::debug;

use crate::host::{FrameId, Host};

/// Whether the watcher is polling every frame.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum SchedulerState {
    /// Passes run only on discrete triggers.
    #[default]
    Idle,
    /// A pass runs every frame.
    ActivePolling,
}

/// Which processing set an element belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Track {
    Animation,
    Transition,
}

#[derive(Clone, Debug)]
pub(crate) struct ChangeScheduler<E> {
    animating: HashSet<E>,
    transitioning: HashSet<E>,
    /// Removed from `animating` because the animation paused without an event.
    suspended: HashSet<E>,
    frame: Option<FrameId>,
}

impl<E> Default for ChangeScheduler<E> {
    fn default() -> Self {
        Self {
            animating: HashSet::new(),
            transitioning: HashSet::new(),
            suspended: HashSet::new(),
            frame: None,
        }
    }
}

impl<E: Copy + Eq + Hash> ChangeScheduler<E> {
    pub(crate) fn state(&self) -> SchedulerState {
        if self.animating.is_empty() && self.transitioning.is_empty() {
            SchedulerState::Idle
        } else {
            SchedulerState::ActivePolling
        }
    }

    pub(crate) fn is_polling(&self) -> bool {
        self.state() == SchedulerState::ActivePolling
    }

    fn set_mut(&mut self, track: Track) -> &mut HashSet<E> {
        match track {
            Track::Animation => &mut self.animating,
            Track::Transition => &mut self.transitioning,
        }
    }

    /// Add `element` to a processing set.
    pub(crate) fn insert(&mut self, track: Track, element: E) {
        let was_idle = !self.is_polling();
        if track == Track::Animation {
            self.suspended.remove(&element);
        }
        self.set_mut(track).insert(element);
        if was_idle {
            debug!(?track, "resize scheduler: idle -> polling");
        }
    }

    /// Remove `element` from a processing set.
    ///
    /// Returns true if the element was processing and both sets are now empty, which
    /// calls for one final pass.
    pub(crate) fn remove(&mut self, track: Track, element: E) -> bool {
        if track == Track::Animation {
            self.suspended.remove(&element);
        }
        let settled = self.set_mut(track).remove(&element) && !self.is_polling();
        if settled {
            debug!(?track, "resize scheduler: polling -> idle");
        }
        settled
    }

    /// Park a processing animation whose play state stopped running.
    pub(crate) fn suspend(&mut self, element: E) {
        if self.animating.remove(&element) {
            self.suspended.insert(element);
            debug!(suspended = self.suspended.len(), "resize animation paused");
        }
    }

    /// Park an animation that started while paused, so it joins once it runs.
    pub(crate) fn park(&mut self, element: E) {
        if !self.animating.contains(&element) {
            self.suspended.insert(element);
        }
    }

    /// Bring a parked animation back once it runs again.
    pub(crate) fn resume(&mut self, element: E) {
        if self.suspended.remove(&element) {
            self.animating.insert(element);
        }
    }

    /// Request or cancel the frame so that one is pending exactly while polling.
    pub(crate) fn sync<H: Host>(&mut self, host: &mut H) {
        match (self.is_polling(), self.frame) {
            (true, None) => self.frame = Some(host.request_frame()),
            (false, Some(frame)) => {
                host.cancel_frame(frame);
                self.frame = None;
            }
            _ => {}
        }
    }

    /// Consume a delivered frame. False for frames this scheduler no longer waits on.
    pub(crate) fn accept_frame(&mut self, frame: FrameId) -> bool {
        if self.frame == Some(frame) {
            self.frame = None;
            true
        } else {
            false
        }
    }

    /// Drop processing elements that are no longer alive.
    pub(crate) fn retain(&mut self, mut is_alive: impl FnMut(E) -> bool) {
        self.animating.retain(|el| is_alive(*el));
        self.transitioning.retain(|el| is_alive(*el));
        self.suspended.retain(|el| is_alive(*el));
    }

    /// Cancel any pending frame and forget all processing elements.
    pub(crate) fn clear<H: Host>(&mut self, host: &mut H) {
        self.animating.clear();
        self.transitioning.clear();
        self.suspended.clear();
        self.sync(host);
    }

    #[cfg(any(test, feature = "test-helpers"))]
    pub(crate) fn pending_frame(&self) -> Option<FrameId> {
        self.frame
    }
}
