// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polling during a CSS animation.
//!
//! A `@keyframes` rule grows a bar's width. While the animation runs the watcher
//! polls once per frame; when it ends it settles back to idle after one final pass.
//!
//! Run:
//! - `cargo run -p understory_resize_demos --example animation`

use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_resize::style::selector::parse_selector_list;
use understory_resize::style::{CssRule, Declaration, Keyframe, KeyframesRule, StyleRule};
use understory_resize::{
    EventKind, HostEvent, MemoryHost, ObserveOptions, ResizeWatcher, SchedulerState,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut host = MemoryHost::new();
    let root = host.root();
    host.append_style(
        root,
        vec![
            CssRule::Keyframes(KeyframesRule {
                name: "fill".into(),
                keyframes: vec![
                    Keyframe {
                        key: "from".into(),
                        declarations: vec![Declaration::new("width", "0")],
                    },
                    Keyframe {
                        key: "to".into(),
                        declarations: vec![Declaration::new("width", "100%")],
                    },
                ],
            }),
            CssRule::Style(StyleRule::new(
                parse_selector_list(".progress").unwrap(),
                vec![Declaration::new("animation", "fill 500ms ease-out")],
            )),
        ],
    );
    let bar = host.append(root, "div");
    host.add_class(bar, "progress");
    host.set_size(bar, 0.0, 8.0);
    if let Some(style) = host.style_mut(bar) {
        style.animation_names = vec!["fill".into()];
    }

    let watcher = ResizeWatcher::new(host);
    let observer = watcher.observer(|entries| {
        for e in entries {
            info!(width = e.content_rect.width, "bar resized");
            println!("bar width {}", e.content_rect.width);
        }
    });
    observer.observe(bar, ObserveOptions::default()).unwrap();

    watcher.handle_event(HostEvent::on(EventKind::AnimationStart, bar));
    assert_eq!(watcher.state(), SchedulerState::ActivePolling);

    // Drive frames the way a host's animation clock would.
    for frame in 1..=10 {
        watcher.with_host(|h| h.set_size(bar, f64::from(frame) * 40.0, 8.0));
        watcher.advance_frame();
    }

    watcher.handle_event(HostEvent::on(EventKind::AnimationEnd, bar));
    assert_eq!(watcher.state(), SchedulerState::Idle);
    println!("settled; frames pending: {}", watcher.with_host(|h| h.pending_frames().len()));
}
