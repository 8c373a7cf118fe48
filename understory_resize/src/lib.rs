// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_resize --heading-base-level=0

//! Understory Resize: a shared engine that reports element size changes.
//!
//! ## Overview
//!
//! A [`ResizeWatcher`] tracks elements for any number of [`ResizeObserver`]s. It does
//! not measure continuously. It measures when something that can change a size has
//! happened:
//!
//! - every frame, while an element associated with a size-changing CSS animation or
//!   transition is mid-flight;
//! - once, on page `load`, window `resize`, a relevant `click`, or a pointer move that
//!   changes which hover-sensitive elements contain the pointer;
//! - once, after a batch of subtree mutations.
//!
//! Each such pass reads every tracked element first, then diffs, then calls each
//! observer with a non-empty batch exactly once. Observing an element reports its
//! current size immediately.
//!
//! ## Host
//!
//! The engine never touches a document itself. A [`Host`] answers geometry, style, and
//! selector queries, schedules frames, and attaches listeners, which feed back into
//! [`ResizeWatcher::handle_event`], [`ResizeWatcher::handle_mutations`], and
//! [`ResizeWatcher::on_frame`]. Style rules are classified by
//! [`understory_resize_style`], re-exported as [`style`].
//!
//! Element handles are generational: a handle to a removed element is reported as
//! not an element and is dropped from tracking before the next pass.
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "test-helpers")]
//! # {
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_resize::{HostEvent, EventKind, MemoryHost, ObserveOptions, ResizeWatcher};
//!
//! let mut host = MemoryHost::new();
//! let root = host.root();
//! let panel = host.append(root, "div");
//! host.set_size(panel, 200.0, 100.0);
//!
//! let watcher = ResizeWatcher::new(host);
//! let widths = Rc::new(RefCell::new(Vec::new()));
//! let sink = widths.clone();
//! let observer = watcher.observer(move |entries| {
//!     sink.borrow_mut().extend(entries.iter().map(|e| e.content_rect.width));
//! });
//!
//! observer.observe(panel, ObserveOptions::default()).unwrap();
//! watcher.with_host(|h| h.set_size(panel, 320.0, 100.0));
//! watcher.handle_event(HostEvent::window(EventKind::Resize));
//! assert_eq!(*widths.borrow(), vec![200.0, 320.0]);
//! # }
//! ```
//!
//! With the `test-helpers` feature the crate also provides [`MemoryHost`], an
//! in-memory host used by the tests, benches, and demos.

pub mod bindings;
pub mod diff;
pub mod host;
pub mod pseudo;
pub mod types;

mod associations;
mod config;
mod dispatch;
mod error;
#[cfg(any(test, feature = "test-helpers"))]
mod memory_host;
mod observer;
mod registry;
mod scheduler;
mod watcher;

pub use understory_resize_style as style;

pub use config::ResizeConfig;
pub use error::ArgumentError;
pub use host::{
    ComputedStyle, EventKind, FrameId, Host, HostEvent, ListenerSet, MutationKind,
    MutationRecord, PlayState,
};
#[cfg(any(test, feature = "test-helpers"))]
pub use memory_host::{MemoryHost, NodeId};
pub use observer::ResizeObserver;
pub use scheduler::SchedulerState;
pub use types::{BoxModel, BoxSize, ContentRect, ObserveOptions, ObserverId, ResizeEntry};
pub use watcher::ResizeWatcher;
