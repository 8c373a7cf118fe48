// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`Host`] for tests, benches, and demos.
//!
//! [`MemoryHost`] keeps a small element tree with tags, ids, classes, attributes,
//! rectangles, and computed styles set directly by the caller. Stylesheets are
//! `style` elements carrying already-parsed rules. Frames are queued and delivered
//! with [`ResizeWatcher::advance_frame`]; nothing animates on its own, so a test
//! changes sizes and styles between frames itself.
//!
//! Dynamic pseudo-classes (`:hover`, `:checked`, ..) never match, as in a host that
//! resolves selectors statically.

use kurbo::{Insets, Rect};
use understory_resize_style::CssRule;
use understory_resize_style::selector::{
    AttrOp, Combinator, CompoundSelector, PseudoClass, Selector, SimpleSelector,
};

use crate::host::{ComputedStyle, FrameId, Host, ListenerSet};
use crate::watcher::ResizeWatcher;

/// Generational element handle of a [`MemoryHost`].
///
/// A removed element's handle stays stale: reusing its slot bumps the generation, so
/// the old handle never aliases the new element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, Default)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    rect: Rect,
    style: ComputedStyle,
    rules: Vec<CssRule>,
}

/// In-memory element tree implementing [`Host`].
#[derive(Clone, Debug)]
pub struct MemoryHost {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    next_frame: u64,
    frames: Vec<FrameId>,
    attached: ListenerSet,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// A host holding only the root `html` element.
    pub fn new() -> Self {
        let mut host = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId(0, 1),
            next_frame: 1,
            frames: Vec::new(),
            attached: ListenerSet::empty(),
        };
        host.root = host.insert(None, "html");
        host
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn insert(&mut self, parent: Option<NodeId>, tag: &str) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        self.nodes[idx] = Some(Node {
            generation,
            parent,
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId(idx as u32, generation);
        if let Some(p) = parent.and_then(|p| self.node_mut(p)) {
            p.children.push(id);
        }
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.1)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.1)
    }

    /// Append a `tag` element as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let parent = if self.node(parent).is_some() {
            parent
        } else {
            self.root
        };
        self.insert(Some(parent), tag)
    }

    /// Append a `style` element carrying `rules` under `parent`.
    pub fn append_style(&mut self, parent: NodeId, rules: Vec<CssRule>) -> NodeId {
        let id = self.append(parent, "style");
        if let Some(n) = self.node_mut(id) {
            n.rules = rules;
        }
        id
    }

    /// Remove `id` and its subtree. Handles into the subtree become stale.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        let Some(parent) = self.node(id).map(|n| n.parent) else {
            return;
        };
        if let Some(p) = parent.and_then(|p| self.node_mut(p)) {
            p.children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(n) = self.nodes[next.idx()].take() {
                stack.extend(n.children);
                self.free_list.push(next.idx());
            }
        }
    }

    /// Set the `id` attribute.
    pub fn set_id(&mut self, id: NodeId, value: &str) {
        if let Some(n) = self.node_mut(id) {
            n.id = Some(value.to_string());
        }
    }

    /// Add a class.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(n) = self.node_mut(id) {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        }
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_mut(id) {
            let name = name.to_ascii_lowercase();
            match n.attrs.iter_mut().find(|(k, _)| *k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => n.attrs.push((name, value.to_string())),
            }
        }
    }

    /// Set the border-box rectangle.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(n) = self.node_mut(id) {
            n.rect = rect;
        }
    }

    /// Resize the border box, keeping its origin.
    pub fn set_size(&mut self, id: NodeId, width: f64, height: f64) {
        if let Some(n) = self.node_mut(id) {
            n.rect = Rect::from_origin_size(n.rect.origin(), (width, height));
        }
    }

    /// Set padding widths.
    pub fn set_padding(&mut self, id: NodeId, padding: Insets) {
        if let Some(style) = self.style_mut(id) {
            style.padding = padding;
        }
    }

    /// Set border widths.
    pub fn set_border(&mut self, id: NodeId, border: Insets) {
        if let Some(style) = self.style_mut(id) {
            style.border = border;
        }
    }

    /// Mutable access to the computed style, for animation and transition state.
    pub fn style_mut(&mut self, id: NodeId) -> Option<&mut ComputedStyle> {
        self.node_mut(id).map(|n| &mut n.style)
    }

    /// First live element whose `id` attribute is `value`, in document order.
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants()
            .into_iter()
            .find(|id| self.node(*id).and_then(|n| n.id.as_deref()) == Some(value))
    }

    /// Frames requested and not yet delivered or cancelled.
    pub fn pending_frames(&self) -> &[FrameId] {
        &self.frames
    }

    /// Take the pending frames for delivery.
    pub fn take_frames(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.frames)
    }

    /// Listeners currently attached.
    pub fn attached(&self) -> ListenerSet {
        self.attached
    }

    /// Every live element in document order, root first.
    fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.node(id) {
                out.push(id);
                stack.extend(n.children.iter().rev());
            }
        }
        out
    }

    fn siblings(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .and_then(|n| n.parent)
            .and_then(|p| self.node(p))
            .map(|p| p.children.as_slice())
            .unwrap_or_default()
    }

    fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.siblings(id);
        let at = siblings.iter().position(|s| *s == id)?;
        at.checked_sub(1).map(|i| siblings[i])
    }

    fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        let compounds: Vec<&CompoundSelector> = selector.compounds().collect();
        self.match_from(id, selector, &compounds, compounds.len() - 1)
    }

    /// Right-to-left match of `compounds[..=at]` with `id` as the subject.
    fn match_from(
        &self,
        id: NodeId,
        selector: &Selector,
        compounds: &[&CompoundSelector],
        at: usize,
    ) -> bool {
        if !self.matches_compound(id, compounds[at]) {
            return false;
        }
        if at == 0 {
            return true;
        }
        let next = |candidate: NodeId| self.match_from(candidate, selector, compounds, at - 1);
        match selector.rest[at - 1].0 {
            Combinator::Child => self.parent(id).is_some_and(next),
            Combinator::NextSibling => self.prev_sibling(id).is_some_and(next),
            Combinator::Descendant => {
                let mut up = self.parent(id);
                while let Some(a) = up {
                    if next(a) {
                        return true;
                    }
                    up = self.parent(a);
                }
                false
            }
            Combinator::SubsequentSibling => {
                let mut left = self.prev_sibling(id);
                while let Some(s) = left {
                    if next(s) {
                        return true;
                    }
                    left = self.prev_sibling(s);
                }
                false
            }
        }
    }

    fn matches_compound(&self, id: NodeId, compound: &CompoundSelector) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        compound.simples.iter().all(|simple| match simple {
            SimpleSelector::Universal => true,
            SimpleSelector::Type(tag) => node.tag.eq_ignore_ascii_case(tag),
            SimpleSelector::Id(value) => node.id.as_deref() == Some(value.as_str()),
            SimpleSelector::Class(class) => node.classes.iter().any(|c| c == class),
            SimpleSelector::Attribute { name, op, value } => {
                matches_attribute(node, name, *op, value.as_deref())
            }
            SimpleSelector::PseudoClass(pc) => self.matches_pseudo_class(id, node, pc),
            SimpleSelector::PseudoElement(_) => false,
        })
    }

    fn matches_pseudo_class(&self, id: NodeId, node: &Node, pc: &PseudoClass) -> bool {
        let siblings = self.siblings(id);
        let position = siblings.iter().position(|s| *s == id);
        let of_type: Vec<NodeId> = siblings
            .iter()
            .copied()
            .filter(|s| self.node(*s).is_some_and(|n| n.tag == node.tag))
            .collect();
        match pc {
            PseudoClass::Root => node.parent.is_none(),
            PseudoClass::Empty => node.children.is_empty(),
            PseudoClass::FirstChild => position == Some(0),
            PseudoClass::LastChild => position.is_some_and(|p| p + 1 == siblings.len()),
            PseudoClass::OnlyChild => siblings.len() == 1,
            PseudoClass::FirstOfType => of_type.first() == Some(&id),
            PseudoClass::LastOfType => of_type.last() == Some(&id),
            PseudoClass::OnlyOfType => of_type.len() == 1,
            PseudoClass::NthChild(a, b) => {
                position.is_some_and(|p| nth_matches(*a, *b, p + 1))
            }
            PseudoClass::NthLastChild(a, b) => {
                position.is_some_and(|p| nth_matches(*a, *b, siblings.len() - p))
            }
            PseudoClass::Not(inner) => !self.matches_compound(id, inner),
            // Element state is not modelled.
            _ => false,
        }
    }
}

fn matches_attribute(node: &Node, name: &str, op: AttrOp, value: Option<&str>) -> bool {
    let Some(actual) = node
        .attrs
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
    else {
        return false;
    };
    let Some(value) = value else {
        return op == AttrOp::Exists;
    };
    match op {
        AttrOp::Exists => true,
        AttrOp::Eq => actual == value,
        AttrOp::Includes => actual.split_whitespace().any(|w| w == value),
        AttrOp::DashMatch => {
            actual == value
                || actual
                    .strip_prefix(value)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        AttrOp::Prefix => !value.is_empty() && actual.starts_with(value),
        AttrOp::Suffix => !value.is_empty() && actual.ends_with(value),
        AttrOp::Substring => !value.is_empty() && actual.contains(value),
    }
}

/// True if the 1-based position `n` is `a*k + b` for some `k >= 0`.
fn nth_matches(a: i32, b: i32, n: usize) -> bool {
    let Ok(n) = i32::try_from(n) else {
        return false;
    };
    if a == 0 {
        return n == b;
    }
    let diff = n - b;
    diff % a == 0 && diff / a >= 0
}

impl Host for MemoryHost {
    type Element = NodeId;

    fn is_alive(&self, element: NodeId) -> bool {
        self.node(element).is_some()
    }

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.node(element)?.parent
    }

    fn bounding_rect(&self, element: NodeId) -> Rect {
        self.node(element).map(|n| n.rect).unwrap_or(Rect::ZERO)
    }

    fn computed_style(&self, element: NodeId) -> ComputedStyle {
        self.node(element)
            .map(|n| n.style.clone())
            .unwrap_or_default()
    }

    fn is_stylesheet_node(&self, element: NodeId) -> bool {
        self.node(element).is_some_and(|n| {
            n.tag == "style"
                || (n.tag == "link"
                    && n.attrs
                        .iter()
                        .any(|(k, v)| k == "rel" && v.eq_ignore_ascii_case("stylesheet")))
        })
    }

    fn style_rules(&self) -> Vec<CssRule> {
        self.descendants()
            .into_iter()
            .filter_map(|id| self.node(id))
            .flat_map(|n| n.rules.iter().cloned())
            .collect()
    }

    fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|id| self.matches(*id, selector))
            .collect()
    }

    fn request_frame(&mut self) -> FrameId {
        let frame = FrameId(self.next_frame);
        self.next_frame += 1;
        self.frames.push(frame);
        frame
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        self.frames.retain(|f| *f != frame);
    }

    fn attach(&mut self, listeners: ListenerSet) {
        self.attached |= listeners;
    }

    fn detach(&mut self, listeners: ListenerSet) {
        self.attached -= listeners;
    }
}

impl ResizeWatcher<MemoryHost> {
    /// Deliver every pending frame, returning how many were delivered.
    pub fn advance_frame(&self) -> usize {
        let frames = self.with_host(MemoryHost::take_frames);
        for frame in &frames {
            self.on_frame(*frame);
        }
        frames.len()
    }
}
