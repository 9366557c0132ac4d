#![forbid(unsafe_code)]

//! End-to-end scroll behavior for a page with three pinned sections.
//!
//! Layout (viewport 800px, content 4800px before spacing):
//!
//! | Section | Top | Height | Trigger |
//! |---------|-----|--------|---------|
//! | hero    | 0    | 800 | pinned, `top top` → `+=120%`, scrub 0.4 |
//! | stats   | 800  | 800 | reveal, `top 80%`, once |
//! | summit  | 1600 | 800 | pinned, `top top` → `+=115%`, scrub 0.5 |
//! | split   | 3200 | 800 | pinned, `top top` → `+=120%` |
//!
//! Run:
//!   cargo test -p ridgeline-scroll --test alpine_page

use std::time::Duration;

use ridgeline_core::{SNAP_BUFFER, SnapRanges};
use ridgeline_scroll::{
    ElementBox, Scrub, ScrollObserver, SnapPolicy, TriggerEventKind, TriggerId, TriggerPosition,
    TriggerSpec,
};

const VIEWPORT: f64 = 800.0;
const CONTENT: f64 = 4800.0;

struct Page {
    obs: ScrollObserver,
    hero: TriggerId,
    stats: TriggerId,
    summit: TriggerId,
    split: TriggerId,
}

fn pinned(top: f64, end: &str, label: &str) -> TriggerSpec {
    TriggerSpec::new(ElementBox::new(top, 800.0))
        .start(TriggerPosition::TOP_TOP)
        .end_at(end)
        .unwrap()
        .pin(true)
        .label(label)
}

fn page() -> Page {
    let mut obs = ScrollObserver::new();
    let hero = obs.register(pinned(0.0, "+=120%", "hero").scrub(Scrub::Smoothed(0.4)));
    let stats = obs.register(
        TriggerSpec::new(ElementBox::new(800.0, 800.0))
            .start_at("top 80%")
            .unwrap()
            .once(true)
            .label("stats"),
    );
    let summit = obs.register(pinned(1600.0, "+=115%", "summit").scrub(Scrub::Smoothed(0.5)));
    let split = obs.register(pinned(3200.0, "+=120%", "split"));
    obs.refresh(VIEWPORT, CONTENT);
    Page {
        obs,
        hero,
        stats,
        summit,
        split,
    }
}

fn install(obs: &mut ScrollObserver) {
    let ranges =
        SnapRanges::from_regions(&obs.pinned_regions(), obs.max_scroll(), SNAP_BUFFER).unwrap();
    obs.install_snap(SnapPolicy::new(ranges));
}

fn settle(obs: &mut ScrollObserver) {
    for _ in 0..64 {
        obs.tick(Duration::from_millis(16));
    }
}

#[test]
fn layout_accumulates_pin_spacing() {
    let p = page();
    assert_eq!(p.obs.pin_spacing(), 960.0 + 920.0 + 960.0);
    assert_eq!(p.obs.max_scroll(), CONTENT + 2840.0 - VIEWPORT);
    assert_eq!(p.obs.document_height(), CONTENT + 2840.0);

    let summit = p.obs.resolved(p.summit).unwrap();
    assert_eq!((summit.start, summit.end), (2560.0, 3480.0));
    let split = p.obs.resolved(p.split).unwrap();
    assert_eq!((split.start, split.end), (5080.0, 6040.0));
    let stats = p.obs.resolved(p.stats).unwrap();
    assert_eq!(stats.start, 1760.0 - 640.0);

    let starts: Vec<f64> = p.obs.pinned_regions().iter().map(|r| r.start_offset()).collect();
    assert_eq!(starts, [0.0, 2560.0, 5080.0]);
}

#[test]
fn snap_pulls_into_nearest_pinned_center() {
    let mut p = page();
    install(&mut p.obs);

    p.obs.scroll_to(1000.0);
    assert!(!p.obs.end_gesture().is_free());
    settle(&mut p.obs);
    assert!((p.obs.scroll_y() - 480.0).abs() < 1e-6);

    p.obs.scroll_to(2500.0);
    p.obs.end_gesture();
    settle(&mut p.obs);
    assert!((p.obs.scroll_y() - 3020.0).abs() < 1e-6);
}

#[test]
fn gaps_between_sections_scroll_freely() {
    let mut p = page();
    install(&mut p.obs);

    p.obs.scroll_to(1500.0);
    assert!(p.obs.end_gesture().is_free());
    assert!(!p.obs.is_snapping());
    settle(&mut p.obs);
    assert_eq!(p.obs.scroll_y(), 1500.0);
}

#[test]
fn reveal_fires_once_across_round_trips() {
    let mut p = page();
    let mut stats_events = 0;
    for y in [1200.0, 0.0, 1200.0, 4000.0, 0.0] {
        stats_events += p
            .obs
            .scroll_to(y)
            .iter()
            .filter(|e| e.label.as_deref() == Some("stats"))
            .count();
    }
    assert_eq!(stats_events, 1);
    assert!(p.obs.spec(p.stats).is_none());
}

#[test]
fn pinned_sections_report_direction() {
    let mut p = page();
    let ev = p.obs.scroll_to(3000.0);
    let summit: Vec<_> = ev
        .iter()
        .filter(|e| e.id == p.summit)
        .map(|e| e.kind)
        .collect();
    assert_eq!(summit, [TriggerEventKind::Enter]);
    assert!(ev.iter().any(|e| e.id == p.hero && e.kind == TriggerEventKind::Leave));

    let ev = p.obs.scroll_to(500.0);
    let kinds: Vec<_> = ev.iter().map(|e| (e.id, e.kind)).collect();
    assert_eq!(
        kinds,
        [
            (p.summit, TriggerEventKind::LeaveBack),
            (p.hero, TriggerEventKind::EnterBack),
        ]
    );
}

#[test]
fn header_compacts_after_threshold() {
    let mut p = page();
    assert!(!p.obs.is_scrolled(100.0));
    p.obs.scroll_to(100.0);
    assert!(!p.obs.is_scrolled(100.0));
    p.obs.scroll_to(101.0);
    assert!(p.obs.is_scrolled(100.0));
}

#[test]
fn resize_rebuilds_snap_targets() {
    let mut p = page();
    install(&mut p.obs);
    p.obs.refresh(1000.0, CONTENT);
    // Hero now spans 0..1200 of a larger scroll range.
    let ranges = p.obs.snap_policy().unwrap().ranges().unwrap();
    let hero = ranges.ranges()[0];
    assert!((hero.end - 1200.0 / p.obs.max_scroll()).abs() < 1e-12);

    p.obs.scroll_to(1000.0);
    p.obs.end_gesture();
    settle(&mut p.obs);
    assert!((p.obs.scroll_y() - 600.0).abs() < 1e-6);
}

#[test]
fn scrubbed_hero_trails_scroll() {
    let mut p = page();
    p.obs.scroll_to(480.0);
    assert_eq!(p.obs.progress(p.hero), Some(0.5));
    let lagging = p.obs.smoothed_progress(p.hero).unwrap();
    assert!(lagging < 0.5);
    p.obs.tick(Duration::from_millis(400));
    assert_eq!(p.obs.smoothed_progress(p.hero), Some(0.5));
}
