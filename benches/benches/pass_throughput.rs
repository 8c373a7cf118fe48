// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use understory_resize::style::selector::parse_selector_list;
use understory_resize::style::{CssRule, Declaration, Keyframe, KeyframesRule, StyleRule};
use understory_resize::{
    EventKind, HostEvent, MemoryHost, NodeId, ObserveOptions, ResizeObserver, ResizeWatcher,
};

const COUNTS: [usize; 3] = [16, 256, 2048];

fn animated_rules() -> Vec<CssRule> {
    vec![
        CssRule::Keyframes(KeyframesRule {
            name: "grow".into(),
            keyframes: vec![Keyframe {
                key: "to".into(),
                declarations: vec![Declaration::new("width", "200px")],
            }],
        }),
        CssRule::Style(StyleRule::new(
            parse_selector_list(".anim").unwrap(),
            vec![Declaration::new("animation-name", "grow")],
        )),
    ]
}

/// `n` observed elements split evenly across four observers.
fn setup(n: usize) -> (ResizeWatcher<MemoryHost>, Vec<ResizeObserver<MemoryHost>>, Vec<NodeId>) {
    let mut host = MemoryHost::new();
    let root = host.root();
    host.append_style(root, animated_rules());
    let elements: Vec<NodeId> = (0..n)
        .map(|i| {
            let el = host.append(root, "div");
            host.add_class(el, "anim");
            host.set_size(el, 10.0 + (i % 7) as f64, 10.0);
            if let Some(style) = host.style_mut(el) {
                style.animation_names = vec!["grow".into()];
            }
            el
        })
        .collect();
    let watcher = ResizeWatcher::new(host);
    let observers: Vec<_> = (0..4)
        .map(|_| {
            watcher.observer(|entries| {
                black_box(entries.len());
            })
        })
        .collect();
    for (i, el) in elements.iter().enumerate() {
        observers[i % observers.len()]
            .observe(*el, ObserveOptions::default())
            .unwrap();
    }
    (watcher, observers, elements)
}

fn bench_idle_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("pass_unchanged");
    for n in COUNTS {
        let (watcher, _observers, _) = setup(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| watcher.run_pass());
        });
    }
    group.finish();
}

fn bench_all_changed(c: &mut Criterion) {
    let mut group = c.benchmark_group("pass_all_changed");
    for n in COUNTS {
        let (watcher, _observers, elements) = setup(n);
        group.throughput(Throughput::Elements(n as u64));
        let mut width = 10.0;
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| {
                width += 1.0;
                watcher.with_host(|h| {
                    for el in &elements {
                        h.set_size(*el, width, 10.0);
                    }
                });
                watcher.handle_event(HostEvent::window(EventKind::Resize));
            });
        });
    }
    group.finish();
}

fn bench_polling_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("polling_frame");
    for n in COUNTS {
        let (watcher, _observers, elements) = setup(n);
        for el in &elements {
            watcher.handle_event(HostEvent::on(EventKind::AnimationStart, *el));
        }
        group.throughput(Throughput::Elements(n as u64));
        let mut step = 0_u32;
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| {
                step = step.wrapping_add(1);
                // Only one element in eight moves per frame.
                watcher.with_host(|h| {
                    for el in elements.iter().step_by(8) {
                        h.set_size(*el, 10.0 + f64::from(step % 50), 10.0);
                    }
                });
                black_box(watcher.advance_frame());
            });
        });
    }
    group.finish();
}

fn bench_observe_cycle(c: &mut Criterion) {
    c.bench_function("observe_unobserve", |b| {
        let (watcher, observers, elements) = setup(64);
        let spare = watcher.with_host(|h| {
            let root = h.root();
            let el = h.append(root, "div");
            h.set_size(el, 5.0, 5.0);
            el
        });
        b.iter(|| {
            observers[0].observe(spare, ObserveOptions::BORDER_BOX).unwrap();
            observers[0].unobserve(spare).unwrap();
        });
        black_box(elements.len());
    });
}

criterion_group!(
    benches,
    bench_idle_pass,
    bench_all_changed,
    bench_polling_frame,
    bench_observe_cycle
);
criterion_main!(benches);
