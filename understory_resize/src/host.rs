// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host boundary: everything the watcher needs from a document, and the
//! notifications a document feeds back.
//!
//! ## Overview
//!
//! The watcher never owns elements and never touches a real tree. A [`Host`] answers
//! geometry, style, and selector queries, schedules frames, and attaches or detaches
//! its event and mutation listeners when asked. The host in turn forwards what those
//! listeners see into [`ResizeWatcher::handle_event`](crate::ResizeWatcher::handle_event),
//! [`ResizeWatcher::handle_mutations`](crate::ResizeWatcher::handle_mutations), and
//! [`ResizeWatcher::on_frame`](crate::ResizeWatcher::on_frame).

use std::fmt::Debug;
use std::hash::Hash;

use kurbo::{Insets, Rect};
use understory_resize_style::selector::Selector;
use understory_resize_style::{CssRule, PropertySet};

/// Document access used by the watcher.
///
/// Read methods take `&self`; a pass performs all of them before it computes or
/// notifies anything.
pub trait Host {
    /// Element handle.
    ///
    /// Handles must not keep elements alive, and a stale handle must never alias a
    /// different live element (a generational index satisfies both).
    type Element: Copy + Eq + Hash + Debug + 'static;

    /// True if `element` still refers to a live element.
    fn is_alive(&self, element: Self::Element) -> bool;

    /// Parent element, if any.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// Border-box rectangle in document coordinates.
    fn bounding_rect(&self, element: Self::Element) -> Rect;

    /// Resolved style values the watcher reads.
    fn computed_style(&self, element: Self::Element) -> ComputedStyle;

    /// True for `<style>` elements and stylesheet links, whose insertion invalidates
    /// the rule index.
    fn is_stylesheet_node(&self, element: Self::Element) -> bool;

    /// Every accessible rule, in document order.
    fn style_rules(&self) -> Vec<CssRule>;

    /// Live elements matching `selector`, in document order.
    fn query_selector_all(&self, selector: &Selector) -> Vec<Self::Element>;

    /// Schedule one frame callback.
    fn request_frame(&mut self) -> FrameId;

    /// Cancel a frame callback requested earlier.
    fn cancel_frame(&mut self, frame: FrameId);

    /// Start delivering the given notifications.
    fn attach(&mut self, listeners: ListenerSet);

    /// Stop delivering the given notifications.
    fn detach(&mut self, listeners: ListenerSet);
}

/// Identifier of a requested frame callback.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// Animation play state.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PlayState {
    /// Running.
    #[default]
    Running,
    /// Paused.
    Paused,
}

/// Resolved style values consulted by the watcher.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComputedStyle {
    /// Padding widths (`x0` left, `y0` top, `x1` right, `y1` bottom).
    pub padding: Insets,
    /// Border widths, same layout as `padding`.
    pub border: Insets,
    /// Applied animation names; empty or `none` when not animated.
    pub animation_names: Vec<String>,
    /// Animation play state.
    pub animation_play_state: PlayState,
    /// Transitioned properties; empty when no transition applies.
    pub transition_properties: Vec<String>,
}

impl ComputedStyle {
    /// True if an animation is applied and running.
    pub fn is_animating(&self) -> bool {
        self.animation_play_state == PlayState::Running
            && self.animation_names.iter().any(|n| n != "none")
    }

    /// True if a transition over a size-affecting property applies.
    pub fn transitions_size(&self, props: &PropertySet) -> bool {
        self.transition_properties
            .iter()
            .any(|p| props.contains_transition(p))
    }
}

bitflags::bitflags! {
    /// Notifications the watcher subscribes to while it tracks anything.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ListenerSet: u16 {
        /// Page `load`.
        const LOAD = 1 << 0;
        /// Window `resize`.
        const RESIZE = 1 << 1;
        /// `click`.
        const CLICK = 1 << 2;
        /// `mousemove`.
        const MOUSE_MOVE = 1 << 3;
        /// `touchstart`.
        const TOUCH_START = 1 << 4;
        /// `animationstart`.
        const ANIMATION_START = 1 << 5;
        /// `animationend`.
        const ANIMATION_END = 1 << 6;
        /// `animationcancel`.
        const ANIMATION_CANCEL = 1 << 7;
        /// `animationiteration`.
        const ANIMATION_ITERATION = 1 << 8;
        /// `transitionstart`.
        const TRANSITION_START = 1 << 9;
        /// `transitionend`.
        const TRANSITION_END = 1 << 10;
        /// `transitioncancel`.
        const TRANSITION_CANCEL = 1 << 11;
        /// Subtree mutation observer.
        const MUTATIONS = 1 << 12;
    }
}

impl Default for ListenerSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Kind of a forwarded event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// Page `load`.
    Load,
    /// Window `resize`.
    Resize,
    /// `click`.
    Click,
    /// `mousemove`.
    MouseMove,
    /// `touchstart`.
    TouchStart,
    /// `animationstart`.
    AnimationStart,
    /// `animationend`.
    AnimationEnd,
    /// `animationcancel`.
    AnimationCancel,
    /// `animationiteration`.
    AnimationIteration,
    /// `transitionstart`.
    TransitionStart,
    /// `transitionend`.
    TransitionEnd,
    /// `transitioncancel`.
    TransitionCancel,
}

impl EventKind {
    /// The listener that delivers this kind.
    pub const fn listener(self) -> ListenerSet {
        match self {
            Self::Load => ListenerSet::LOAD,
            Self::Resize => ListenerSet::RESIZE,
            Self::Click => ListenerSet::CLICK,
            Self::MouseMove => ListenerSet::MOUSE_MOVE,
            Self::TouchStart => ListenerSet::TOUCH_START,
            Self::AnimationStart => ListenerSet::ANIMATION_START,
            Self::AnimationEnd => ListenerSet::ANIMATION_END,
            Self::AnimationCancel => ListenerSet::ANIMATION_CANCEL,
            Self::AnimationIteration => ListenerSet::ANIMATION_ITERATION,
            Self::TransitionStart => ListenerSet::TRANSITION_START,
            Self::TransitionEnd => ListenerSet::TRANSITION_END,
            Self::TransitionCancel => ListenerSet::TRANSITION_CANCEL,
        }
    }
}

/// An event forwarded by the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HostEvent<E> {
    /// What happened.
    pub kind: EventKind,
    /// Event target; `None` for window-level events.
    pub target: Option<E>,
}

impl<E> HostEvent<E> {
    /// A window-level event.
    pub const fn window(kind: EventKind) -> Self {
        Self { kind, target: None }
    }

    /// An event targeting `target`.
    pub const fn on(kind: EventKind, target: E) -> Self {
        Self {
            kind,
            target: Some(target),
        }
    }
}

/// What a mutation record describes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MutationKind<E> {
    /// Children were added or removed under the target.
    ChildList {
        /// Added nodes.
        added: Vec<E>,
        /// Removed nodes.
        removed: Vec<E>,
    },
    /// An attribute of the target changed.
    Attributes {
        /// Attribute name.
        name: String,
    },
    /// Text content under the target changed.
    CharacterData,
}

/// One record of a mutation batch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MutationRecord<E> {
    /// Node the mutation happened on.
    pub target: E,
    /// What changed.
    pub kind: MutationKind<E>,
}

impl<E> MutationRecord<E> {
    /// Nodes added by this record.
    pub fn added(&self) -> &[E] {
        match &self.kind {
            MutationKind::ChildList { added, .. } => added,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animating_requires_a_running_named_animation() {
        let mut style = ComputedStyle::default();
        assert!(!style.is_animating());
        style.animation_names = vec!["none".to_string()];
        assert!(!style.is_animating());
        style.animation_names = vec!["grow".to_string()];
        assert!(style.is_animating());
        style.animation_play_state = PlayState::Paused;
        assert!(!style.is_animating());
    }

    #[test]
    fn transition_check_uses_the_allow_list() {
        let props = PropertySet::new();
        let mut style = ComputedStyle {
            transition_properties: vec!["background-color".to_string()],
            ..Default::default()
        };
        assert!(!style.transitions_size(&props));
        style.transition_properties.push("padding".to_string());
        assert!(style.transitions_size(&props));
    }

    #[test]
    fn every_event_kind_has_a_listener() {
        let kinds = [
            EventKind::Load,
            EventKind::Resize,
            EventKind::Click,
            EventKind::MouseMove,
            EventKind::TouchStart,
            EventKind::AnimationStart,
            EventKind::AnimationEnd,
            EventKind::AnimationCancel,
            EventKind::AnimationIteration,
            EventKind::TransitionStart,
            EventKind::TransitionEnd,
            EventKind::TransitionCancel,
        ];
        let all = kinds
            .iter()
            .fold(ListenerSet::empty(), |acc, k| acc | k.listener());
        assert_eq!(all | ListenerSet::MUTATIONS, ListenerSet::all());
    }
}
