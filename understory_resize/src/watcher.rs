// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared watcher: one context per document, any number of observers.
//!
//! ## Passes
//!
//! A pass reads the rectangle and style of every tracked element, then compares each
//! against its last reported sizes, then groups changed entries by owner, then calls
//! each owner with a non-empty batch exactly once. No host read happens after the
//! first comparison, and the watcher's state is not borrowed while callbacks run, so
//! callbacks may observe, unobserve, disconnect, or feed further events.
//!
//! Passes never nest. A trigger that arrives while one is notifying marks it for a
//! re-run, bounded by [`ResizeConfig::max_chained_passes`].
//!
//! ## Triggers
//!
//! - `load` and window `resize`: always one pass.
//! - `click`: one pass when the target sits inside an element whose focus, active, or
//!   checked state changes a size, or when it leaves such a chain.
//! - `mousemove` and `touchstart`: one pass when the chain of hover-associated
//!   ancestors of the target changed.
//! - Animation and transition starts on associated elements switch to polling every
//!   frame; the last matching end or cancel switches back and runs one final pass.
//! - Mutation batches rescan styles on stylesheet insertion, re-derive animation play
//!   states, and run one pass unless polling already covers it.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::Rc;

use kurbo::Rect;
use tracing::{debug, trace, warn};
use understory_resize_style::{PropertySet, RuleIndex};

use crate::associations::Associations;
use crate::config::ResizeConfig;
use crate::diff::{build_entry, compute_dimensions, has_changed};
use crate::dispatch::{Buckets, Callback, Delivery, Subscriber, deliver};
use crate::error::ArgumentError;
use crate::host::{
    ComputedStyle, EventKind, FrameId, Host, HostEvent, ListenerSet, MutationRecord,
};
use crate::observer::ResizeObserver;
use crate::pseudo::ChainState;
use crate::registry::ElementRegistry;
use crate::scheduler::{ChangeScheduler, SchedulerState, Track};
use crate::types::{ObserveOptions, ObserverId, ResizeEntry};

type Batch<E> = (ObserverId, Callback<E>, Vec<ResizeEntry<E>>);

/// Shared change-detection engine.
///
/// Cloning is cheap and yields another handle to the same engine. Create one per
/// document and hand clones to whatever wires up observers and host notifications.
///
/// ```
/// # #[cfg(feature = "test-helpers")]
/// # {
/// use kurbo::Insets;
/// use understory_resize::{MemoryHost, ObserveOptions, ResizeWatcher};
///
/// let mut host = MemoryHost::new();
/// let root = host.root();
/// let el = host.append(root, "div");
/// host.set_size(el, 120.0, 50.0);
/// host.set_padding(el, Insets::uniform(10.0));
///
/// let watcher = ResizeWatcher::new(host);
/// let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
/// let sink = seen.clone();
/// let observer = watcher.observer(move |entries| {
///     sink.borrow_mut().extend(entries.iter().map(|e| e.content_box_size.inline_size));
/// });
/// observer.observe(el, ObserveOptions::default()).unwrap();
/// assert_eq!(*seen.borrow(), vec![100.0]);
/// # }
/// ```
pub struct ResizeWatcher<H: Host> {
    shared: Rc<RefCell<WatcherState<H>>>,
}

impl<H: Host> Clone for ResizeWatcher<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<H: Host> fmt::Debug for ResizeWatcher<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ResizeWatcher");
        if let Ok(st) = self.shared.try_borrow() {
            s.field("tracked", &st.registry.len())
                .field("observers", &st.subscribers.len())
                .field("state", &st.scheduler.state())
                .field("attached", &st.attached);
        }
        s.finish_non_exhaustive()
    }
}

struct WatcherState<H: Host> {
    host: H,
    config: ResizeConfig,
    props: PropertySet,
    index: RuleIndex,
    registry: ElementRegistry<H::Element>,
    subscribers: BTreeMap<ObserverId, Subscriber<H::Element>>,
    next_observer: u64,
    associations: Associations<H::Element>,
    hover: ChainState<H::Element>,
    activation: ChainState<H::Element>,
    scheduler: ChangeScheduler<H::Element>,
    attached: bool,
    in_pass: bool,
    rerun: bool,
    /// Batches whose callback was already running when they were delivered.
    deferred: Vec<(ObserverId, Vec<ResizeEntry<H::Element>>)>,
}

/// Clears the pass flags even if a pass unwinds.
struct PassGuard<'a, H: Host> {
    shared: &'a RefCell<WatcherState<H>>,
}

impl<H: Host> Drop for PassGuard<'_, H> {
    fn drop(&mut self) {
        if let Ok(mut st) = self.shared.try_borrow_mut() {
            st.in_pass = false;
            st.rerun = false;
        }
    }
}

impl<H: Host> ResizeWatcher<H> {
    /// Create a watcher over `host` with the default configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, ResizeConfig::default())
    }

    /// Create a watcher over `host`.
    pub fn with_config(host: H, config: ResizeConfig) -> Self {
        let props = PropertySet::with_extra(&config.extra_properties);
        Self {
            shared: Rc::new(RefCell::new(WatcherState {
                host,
                config,
                props,
                index: RuleIndex::default(),
                registry: ElementRegistry::default(),
                subscribers: BTreeMap::new(),
                next_observer: 1,
                associations: Associations::default(),
                hover: ChainState::new(),
                activation: ChainState::new(),
                scheduler: ChangeScheduler::default(),
                attached: false,
                in_pass: false,
                rerun: false,
                deferred: Vec::new(),
            })),
        }
    }

    /// Create an observer whose batches are delivered to `callback`.
    pub fn observer<F>(&self, callback: F) -> ResizeObserver<H>
    where
        F: FnMut(&[ResizeEntry<H::Element>]) + 'static,
    {
        let callback: Callback<H::Element> = Rc::new(RefCell::new(callback));
        let id = {
            let mut st = self.shared.borrow_mut();
            let id = ObserverId(st.next_observer);
            st.next_observer += 1;
            st.subscribers.insert(id, Subscriber::new(callback));
            id
        };
        debug!(observer = id.get(), "resize observer created");
        ResizeObserver::new(id, self.clone())
    }

    /// Forward an event delivered by one of the attached listeners.
    pub fn handle_event(&self, event: HostEvent<H::Element>) {
        let run = self.shared.borrow_mut().on_event(event);
        if run {
            self.run_pass();
        }
    }

    /// Forward a batch from the subtree mutation observer.
    pub fn handle_mutations(&self, records: &[MutationRecord<H::Element>]) {
        let run = self.shared.borrow_mut().on_mutations(records);
        if run {
            self.run_pass();
        }
    }

    /// Forward a frame callback requested through [`Host::request_frame`].
    ///
    /// The next frame is requested before the pass runs, so a pass that fails cannot
    /// stop the loop. Frames the watcher no longer waits on are ignored.
    pub fn on_frame(&self, frame: FrameId) {
        let run = {
            let mut guard = self.shared.borrow_mut();
            let st = &mut *guard;
            if !st.scheduler.accept_frame(frame) {
                trace!(frame = frame.0, "stale frame ignored");
                return;
            }
            st.scheduler.sync(&mut st.host);
            st.scheduler.is_polling()
        };
        if run {
            self.run_pass();
        }
    }

    /// Measure every tracked element and notify owners of changes.
    ///
    /// Called from within a callback, the request is folded into a re-run of the
    /// pass that is currently notifying.
    pub fn run_pass(&self) {
        {
            let mut st = self.shared.borrow_mut();
            if st.in_pass {
                st.rerun = true;
                return;
            }
            st.in_pass = true;
        }
        let _guard = PassGuard {
            shared: &self.shared,
        };
        let mut chained = 0;
        loop {
            let batches = self.shared.borrow_mut().collect_changes();
            self.notify(batches);
            let mut st = self.shared.borrow_mut();
            if !std::mem::take(&mut st.rerun) {
                break;
            }
            if chained >= st.config.max_chained_passes {
                warn!(chained, "resize pass chain exhausted; dropping re-run");
                break;
            }
            chained += 1;
        }
    }

    /// Current scheduler state.
    pub fn state(&self) -> SchedulerState {
        self.shared.borrow().scheduler.state()
    }

    /// Number of tracked elements across all observers.
    pub fn tracked_len(&self) -> usize {
        self.shared.borrow().registry.len()
    }

    /// True if `element` is tracked by any observer.
    pub fn is_tracking(&self, element: H::Element) -> bool {
        self.shared.borrow().registry.contains(element)
    }

    /// The observer that owns `element`, if it is tracked.
    pub fn owner_of(&self, element: H::Element) -> Option<ObserverId> {
        self.shared.borrow().registry.owner_of(element)
    }

    /// True while listeners are attached to the host.
    pub fn is_attached(&self) -> bool {
        self.shared.borrow().attached
    }

    /// Run `f` with the host.
    ///
    /// `f` must not call back into this watcher.
    pub fn with_host<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut self.shared.borrow_mut().host)
    }

    /// Panic if registry ownership, owned sets, listeners, and frames disagree.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn check_invariants(&self) {
        let st = self.shared.borrow();
        let owned: usize = st.subscribers.values().map(|s| s.owned.len()).sum();
        assert_eq!(owned, st.registry.len(), "owned sets and registry differ in size");
        for tracked in st.registry.iter() {
            let listed = st
                .subscribers
                .get(&tracked.owner)
                .is_some_and(|s| s.owned.contains(&tracked.element));
            assert!(listed, "{:?} missing from its owner's set", tracked.element);
        }
        assert_eq!(
            st.attached,
            !st.registry.is_empty(),
            "listeners must be attached exactly while something is tracked"
        );
        assert_eq!(
            st.scheduler.pending_frame().is_some(),
            st.scheduler.is_polling(),
            "a frame must be pending exactly while polling"
        );
    }

    pub(crate) fn observe(
        &self,
        id: ObserverId,
        element: H::Element,
        options: ObserveOptions,
    ) -> Result<(), ArgumentError> {
        let batch = {
            let mut guard = self.shared.borrow_mut();
            let st = &mut *guard;
            if !st.host.is_alive(element) {
                return Err(ArgumentError::NotAnElement { method: "observe" });
            }
            let Some(callback) = st.subscribers.get(&id).map(|s| Rc::clone(&s.callback)) else {
                return Ok(());
            };
            if st.registry.contains(element) {
                trace!(observer = id.get(), ?element, "already tracked");
                return Ok(());
            }
            if !st.attached {
                st.setup();
            }
            let rect = st.host.bounding_rect(element);
            let style = st.host.computed_style(element);
            let Some(entry) = st
                .registry
                .register(element, options.box_model, id, rect, style)
            else {
                return Ok(());
            };
            if let Some(sub) = st.subscribers.get_mut(&id) {
                sub.owned.insert(element);
            }
            debug!(observer = id.get(), ?element, box_model = options.box_model.as_str(), "observe");
            (id, callback, vec![entry])
        };
        self.notify(vec![batch]);
        Ok(())
    }

    pub(crate) fn unobserve(&self, id: ObserverId, element: H::Element) -> Result<(), ArgumentError> {
        let mut st = self.shared.borrow_mut();
        if !st.host.is_alive(element) {
            return Err(ArgumentError::NotAnElement {
                method: "unobserve",
            });
        }
        if st.registry.owner_of(element) != Some(id) {
            return Ok(());
        }
        st.registry.unregister(element);
        if let Some(sub) = st.subscribers.get_mut(&id) {
            sub.owned.remove(&element);
        }
        for (owner, entries) in &mut st.deferred {
            if *owner == id {
                entries.retain(|e| e.target != element);
            }
        }
        st.deferred.retain(|(_, entries)| !entries.is_empty());
        debug!(observer = id.get(), ?element, "unobserve");
        st.teardown_if_empty();
        Ok(())
    }

    pub(crate) fn disconnect(&self, id: ObserverId) {
        let Ok(mut st) = self.shared.try_borrow_mut() else {
            warn!(observer = id.get(), "disconnect while the watcher is borrowed");
            return;
        };
        st.disconnect(id);
    }

    pub(crate) fn remove_observer(&self, id: ObserverId) {
        let Ok(mut st) = self.shared.try_borrow_mut() else {
            warn!(observer = id.get(), "observer dropped while the watcher is borrowed");
            return;
        };
        st.disconnect(id);
        st.subscribers.remove(&id);
    }

    pub(crate) fn observed(&self, id: ObserverId) -> Vec<H::Element> {
        self.shared
            .borrow()
            .registry
            .iter()
            .filter(|t| t.owner == id)
            .map(|t| t.element)
            .collect()
    }

    fn notify(&self, batches: Vec<Batch<H::Element>>) {
        for (id, callback, entries) in batches {
            if deliver(id, &callback, &entries) == Delivery::Busy {
                self.shared.borrow_mut().deferred.push((id, entries));
            }
            self.drain_deferred();
        }
    }

    fn drain_deferred(&self) {
        let pending = std::mem::take(&mut self.shared.borrow_mut().deferred);
        for (id, entries) in pending {
            let callback = self
                .shared
                .borrow()
                .subscribers
                .get(&id)
                .map(|s| Rc::clone(&s.callback));
            let Some(callback) = callback else {
                continue;
            };
            if deliver(id, &callback, &entries) == Delivery::Busy {
                self.shared.borrow_mut().deferred.push((id, entries));
            }
        }
    }
}

impl<H: Host> WatcherState<H> {
    fn setup(&mut self) {
        self.host.attach(self.config.listeners);
        self.attached = true;
        debug!(listeners = ?self.config.listeners, "resize listeners attached");
        self.rescan();
    }

    fn rescan(&mut self) {
        let rules = self.host.style_rules();
        self.index = RuleIndex::scan(&rules, &self.props);
        self.associations = Associations::resolve(&self.host, &self.index);
        debug!(
            rules = rules.len(),
            associated = self.associations.len(),
            "style rules rescanned"
        );
    }

    fn teardown(&mut self) {
        if !self.attached {
            return;
        }
        self.scheduler.clear(&mut self.host);
        self.host.detach(self.config.listeners);
        self.attached = false;
        self.associations = Associations::default();
        self.hover = ChainState::new();
        self.activation = ChainState::new();
        self.index = RuleIndex::default();
        debug!("resize listeners detached");
    }

    fn teardown_if_empty(&mut self) {
        if self.registry.is_empty() {
            self.teardown();
        }
    }

    fn disconnect(&mut self, id: ObserverId) {
        let removed = self.registry.unregister_owner(id);
        if let Some(sub) = self.subscribers.get_mut(&id) {
            sub.owned.clear();
        }
        self.deferred.retain(|(owner, _)| *owner != id);
        if !removed.is_empty() {
            debug!(observer = id.get(), removed = removed.len(), "disconnect");
        }
        self.teardown_if_empty();
    }

    fn listens(&self, listener: ListenerSet) -> bool {
        self.attached && self.config.listeners.contains(listener)
    }

    fn on_event(&mut self, event: HostEvent<H::Element>) -> bool {
        if !self.listens(event.kind.listener()) {
            return false;
        }
        match event.kind {
            EventKind::Load | EventKind::Resize => true,
            EventKind::Click => {
                let chain = self.associations.activation_chain(&self.host, event.target);
                let changes = self.activation.update_path(&chain);
                !chain.is_empty() || !changes.is_empty()
            }
            EventKind::MouseMove | EventKind::TouchStart => {
                let chain = self.associations.hover_chain(&self.host, event.target);
                !self.hover.update_path(&chain).is_empty()
            }
            EventKind::AnimationStart | EventKind::AnimationIteration => {
                if let Some(el) = self.live_target(event) {
                    if self.associations.is_animated(el) {
                        let running = self.host.computed_style(el).is_animating();
                        self.associations.set_running(el, running);
                        if running {
                            self.scheduler.insert(Track::Animation, el);
                            self.scheduler.sync(&mut self.host);
                        } else {
                            self.scheduler.park(el);
                        }
                    }
                }
                false
            }
            EventKind::TransitionStart => {
                if let Some(el) = self.live_target(event) {
                    if self.associations.is_transitioned(el)
                        && self.host.computed_style(el).transitions_size(&self.props)
                    {
                        self.scheduler.insert(Track::Transition, el);
                        self.scheduler.sync(&mut self.host);
                    }
                }
                false
            }
            EventKind::AnimationEnd | EventKind::AnimationCancel => {
                self.finish(Track::Animation, event.target)
            }
            EventKind::TransitionEnd | EventKind::TransitionCancel => {
                self.finish(Track::Transition, event.target)
            }
        }
    }

    fn live_target(&self, event: HostEvent<H::Element>) -> Option<H::Element> {
        event.target.filter(|el| self.host.is_alive(*el))
    }

    /// Returns true when this end settles polling and a final pass is due.
    fn finish(&mut self, track: Track, target: Option<H::Element>) -> bool {
        let Some(el) = target else {
            return false;
        };
        let settled = self.scheduler.remove(track, el);
        if settled {
            self.scheduler.sync(&mut self.host);
        }
        settled
    }

    fn on_mutations(&mut self, records: &[MutationRecord<H::Element>]) -> bool {
        if !self.listens(ListenerSet::MUTATIONS) || records.is_empty() {
            return false;
        }
        let stylesheet_added = records
            .iter()
            .flat_map(MutationRecord::added)
            .any(|n| self.host.is_alive(*n) && self.host.is_stylesheet_node(*n));
        if stylesheet_added {
            self.rescan();
        }
        let mut touched = HashSet::new();
        for record in records {
            for &node in std::iter::once(&record.target).chain(record.added()) {
                if touched.insert(node) {
                    self.rederive_play_state(node);
                }
            }
        }
        self.scheduler.sync(&mut self.host);
        !self.scheduler.is_polling()
    }

    fn rederive_play_state(&mut self, element: H::Element) {
        if !self.associations.is_animated(element) || !self.host.is_alive(element) {
            return;
        }
        let running = self.host.computed_style(element).is_animating();
        self.associations.set_running(element, running);
        if running {
            self.scheduler.resume(element);
        } else {
            self.scheduler.suspend(element);
        }
    }

    fn prune_dead(&mut self) {
        let host = &self.host;
        let dead = self.registry.prune(|el| host.is_alive(el));
        self.scheduler.retain(|el| host.is_alive(el));
        self.associations.retain(|el| host.is_alive(el));
        if !dead.is_empty() {
            for (el, owner) in &dead {
                if let Some(sub) = self.subscribers.get_mut(owner) {
                    sub.owned.remove(el);
                }
            }
            debug!(count = dead.len(), "dropped elements that no longer exist");
        }
        if self.registry.is_empty() {
            self.teardown();
        } else {
            self.scheduler.sync(&mut self.host);
        }
    }

    fn collect_changes(&mut self) -> Vec<Batch<H::Element>> {
        self.prune_dead();
        if self.registry.is_empty() {
            return Vec::new();
        }

        // Read phase: every host read happens before any comparison.
        let host = &self.host;
        let reads: Vec<(Rect, ComputedStyle)> = self
            .registry
            .iter()
            .map(|t| (host.bounding_rect(t.element), host.computed_style(t.element)))
            .collect();

        // Compute phase.
        let mut buckets = Buckets::default();
        for (tracked, (rect, style)) in self.registry.iter_mut().zip(reads) {
            let dims = compute_dimensions(rect, &style);
            if !has_changed(&tracked.current, &dims, tracked.box_model) {
                continue;
            }
            buckets.push(
                tracked.owner,
                build_entry(tracked.element, rect, &style, tracked.box_model),
            );
            tracked.previous = tracked.current;
            tracked.current = dims;
            tracked.style = style;
            trace!(
                element = ?tracked.element,
                from = ?tracked.previous.for_box(tracked.box_model),
                to = ?tracked.current.for_box(tracked.box_model),
                animating = tracked.style.is_animating(),
                "size changed"
            );
        }
        trace!(
            tracked = self.registry.len(),
            changed = buckets.len(),
            "resize pass"
        );
        if buckets.is_empty() {
            return Vec::new();
        }

        // Group phase.
        buckets
            .into_batches()
            .into_iter()
            .filter_map(|(id, entries)| {
                self.subscribers
                    .get(&id)
                    .map(|s| (id, Rc::clone(&s.callback), entries))
            })
            .collect()
    }
}
