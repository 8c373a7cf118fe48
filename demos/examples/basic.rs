// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resize basics.
//!
//! Observe two panels with different box options, resize the window, and pad one
//! panel. Set `RUST_LOG=understory_resize=debug` to see the watcher's log.
//!
//! Run:
//! - `cargo run -p understory_resize_demos --example basic`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Insets;
use tracing_subscriber::EnvFilter;
use understory_resize::{
    EventKind, HostEvent, MemoryHost, ObserveOptions, ResizeEntry, ResizeWatcher,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut host = MemoryHost::new();
    let root = host.root();
    let sidebar = host.append(root, "aside");
    host.set_size(sidebar, 240.0, 600.0);
    let content = host.append(root, "main");
    host.set_size(content, 760.0, 600.0);
    host.set_padding(content, Insets::uniform(16.0));

    let watcher = ResizeWatcher::new(host);
    let log: Rc<RefCell<Vec<ResizeEntry<_>>>> = Rc::default();
    let sink = log.clone();
    let observer = watcher.observer(move |entries| {
        for e in entries {
            println!(
                "{:?}: content {}x{}, border {}x{}",
                e.target,
                e.content_box_size.inline_size,
                e.content_box_size.block_size,
                e.border_box_size.inline_size,
                e.border_box_size.block_size,
            );
        }
        sink.borrow_mut().extend_from_slice(entries);
    });

    // Both report right away.
    observer.observe(sidebar, ObserveOptions::default()).unwrap();
    observer.observe(content, ObserveOptions::BORDER_BOX).unwrap();
    assert_eq!(log.borrow().len(), 2);

    // The window narrows; only the content column shrinks.
    watcher.with_host(|h| h.set_size(content, 560.0, 600.0));
    watcher.handle_event(HostEvent::window(EventKind::Resize));
    assert_eq!(log.borrow().len(), 3);

    // Padding changes the content box, not the border box, so the border-box observation
    // stays quiet.
    watcher.with_host(|h| h.set_padding(content, Insets::uniform(24.0)));
    watcher.handle_event(HostEvent::window(EventKind::Resize));
    assert_eq!(log.borrow().len(), 3);

    observer.disconnect();
    println!("listeners attached after disconnect: {}", watcher.is_attached());
}
