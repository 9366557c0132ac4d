#![forbid(unsafe_code)]

//! The scroll observer: trigger registry, layout, dispatch, and snapping.
//!
//! [`ScrollObserver`] owns every trigger registered for a page and the
//! current vertical scroll offset. It does **not** own a clock; the host
//! feeds it scroll positions and frame deltas.
//!
//! # Frame protocol
//!
//! 1. Register triggers with [`ScrollObserver::register`].
//! 2. Call [`ScrollObserver::refresh`] with the viewport and content heights
//!    whenever either changes (and after registering). Layout, pin spacing
//!    and `max_scroll` are only recomputed here.
//! 3. Feed user scrolling through [`ScrollObserver::scroll_to`].
//! 4. When the user's gesture ends, call [`ScrollObserver::end_gesture`].
//! 5. Call [`ScrollObserver::tick`] every frame to advance scrub smoothing
//!    and any snap transition.
//!
//! # Pin spacing
//!
//! A pinned trigger holds its element for `end - start` pixels of scrolling.
//! Every element whose top lies at or below the pinned element's bottom is
//! pushed down by that distance, and so is the document end. Pins are laid
//! out top to bottom, so a later pin's own position already includes the
//! spacing of every pin above it.

use std::time::Duration;

use ridgeline_core::{PinnedRegion, SnapDecision};
use tracing::{debug, trace};

use crate::scrub::ScrubState;
use crate::snap_policy::{SnapPolicy, SnapTransition};
use crate::trigger::{
    ElementBox, ResolvedTrigger, TriggerEvent, TriggerEventKind, TriggerFlags, TriggerId,
    TriggerSpec, Zone, crossings,
};

/// Default header threshold: the page counts as scrolled past this offset.
pub const DEFAULT_SCROLLED_THRESHOLD: f64 = 100.0;

/// Snap targets closer than this to the current position are ignored.
const SNAP_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
struct Slot {
    id: TriggerId,
    spec: TriggerSpec,
    resolved: Option<ResolvedTrigger>,
    zone: Zone,
    scrub: ScrubState,
}

/// Trigger registry and scroll state for one page.
#[derive(Debug, Clone, Default)]
pub struct ScrollObserver {
    slots: Vec<Slot>,
    next_id: u64,
    viewport_height: f64,
    content_height: f64,
    pin_spacing: f64,
    max_scroll: f64,
    scroll_y: f64,
    /// Set when triggers were added or removed since the last refresh.
    dirty: bool,
    snap: Option<SnapPolicy>,
    transition: Option<SnapTransition>,
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

impl ScrollObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger. It takes part in layout and dispatch from the
    /// next [`refresh`](Self::refresh).
    pub fn register(&mut self, spec: TriggerSpec) -> TriggerId {
        let id = TriggerId(self.next_id);
        self.next_id += 1;
        trace!(
            target: "ridgeline.scroll",
            id = id.get(),
            label = spec.label_str().unwrap_or(""),
            pinned = spec.is_pinned(),
            "trigger registered"
        );
        self.slots.push(Slot {
            id,
            scrub: ScrubState::new(spec.scrub_mode()),
            spec,
            resolved: None,
            zone: Zone::Before,
        });
        self.dirty = true;
        id
    }

    /// Unregister a trigger. Returns `false` if it was already gone.
    pub fn kill(&mut self, id: TriggerId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.id != id);
        let removed = self.slots.len() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Unregister every trigger.
    pub fn kill_all(&mut self) {
        if !self.slots.is_empty() {
            debug!(target: "ridgeline.scroll", count = self.slots.len(), "killing all triggers");
            self.slots.clear();
            self.dirty = true;
        }
    }

    /// Number of registered triggers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether triggers changed since the last refresh.
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        self.dirty
    }

    /// Ids of all registered triggers, in registration order.
    pub fn trigger_ids(&self) -> impl Iterator<Item = TriggerId> + '_ {
        self.slots.iter().map(|s| s.id)
    }

    #[must_use]
    pub fn spec(&self, id: TriggerId) -> Option<&TriggerSpec> {
        self.slot(id).map(|s| &s.spec)
    }

    /// Resolved pixel extent of a trigger, once laid out.
    #[must_use]
    pub fn resolved(&self, id: TriggerId) -> Option<ResolvedTrigger> {
        self.slot(id).and_then(|s| s.resolved)
    }

    fn slot(&self, id: TriggerId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

impl ScrollObserver {
    /// Recompute layout for new viewport and content heights.
    ///
    /// `content_height` is the document height without pin spacing. The
    /// scroll offset is clamped to the new range, any snap transition is
    /// dropped, an installed snap policy is rebuilt against the new layout,
    /// and boundary events for the current offset are returned.
    pub fn refresh(&mut self, viewport_height: f64, content_height: f64) -> Vec<TriggerEvent> {
        self.viewport_height = viewport_height.max(0.0);
        self.content_height = content_height.max(0.0);
        self.layout();

        self.max_scroll =
            (self.content_height + self.pin_spacing - self.viewport_height).max(0.0);
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll);
        self.transition = None;
        self.dirty = false;

        if let Some(policy) = self.snap.as_mut() {
            let regions = pinned_regions_of(&self.slots);
            let live = policy.rebuild(&regions, self.max_scroll);
            debug!(
                target: "ridgeline.scroll",
                live,
                pinned = regions.len(),
                "snap policy rebuilt"
            );
        }

        debug!(
            target: "ridgeline.scroll",
            viewport_height = self.viewport_height,
            content_height = self.content_height,
            pin_spacing = self.pin_spacing,
            max_scroll = self.max_scroll,
            triggers = self.slots.len(),
            "layout refreshed"
        );

        self.dispatch(self.scroll_y, true)
    }

    fn layout(&mut self) {
        let viewport = self.viewport_height;

        let mut order: Vec<usize> = (0..self.slots.len()).collect();
        order.sort_by(|&a, &b| {
            self.slots[a]
                .spec
                .element
                .top
                .total_cmp(&self.slots[b].spec.element.top)
        });

        // (element bottom in un-pinned space, spacing) for each laid-out pin.
        let mut pins: Vec<(f64, f64)> = Vec::new();
        let spacing_above = |pins: &[(f64, f64)], top: f64| -> f64 {
            pins.iter()
                .filter(|(bottom, _)| top >= *bottom)
                .map(|(_, spacing)| spacing)
                .sum()
        };

        for &i in &order {
            let element = self.slots[i].spec.element;
            let shifted_top = element.top + spacing_above(&pins, element.top);
            let resolved = resolve(&self.slots[i].spec, element, shifted_top, viewport);
            if self.slots[i].spec.flags.contains(TriggerFlags::PIN) {
                pins.push((element.bottom(), resolved.pin_spacing()));
            }
            self.slots[i].resolved = Some(resolved);
        }

        self.pin_spacing = pins.iter().map(|(_, s)| s).sum();
    }
}

fn resolve(
    spec: &TriggerSpec,
    element: ElementBox,
    shifted_top: f64,
    viewport: f64,
) -> ResolvedTrigger {
    // A relative start is measured from the element reaching the top.
    let start = spec
        .start
        .resolve(shifted_top, element.height, viewport, shifted_top);
    let end = spec.end.resolve(shifted_top, element.height, viewport, start);
    ResolvedTrigger {
        start,
        end: end.max(start),
        element_top: shifted_top,
    }
}

fn pinned_regions_of(slots: &[Slot]) -> Vec<PinnedRegion> {
    let mut regions: Vec<PinnedRegion> = slots
        .iter()
        .filter(|s| s.spec.is_pinned())
        .filter_map(|s| s.resolved.map(|r| r.region()))
        .collect();
    regions.sort_by(|a, b| a.start_offset().total_cmp(&b.start_offset()));
    regions
}

// ---------------------------------------------------------------------------
// Scroll position and dispatch
// ---------------------------------------------------------------------------

impl ScrollObserver {
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Maximum scroll offset of the last refresh.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        self.max_scroll
    }

    /// Current offset as a fraction of `max_scroll` (0 when nothing scrolls).
    #[must_use]
    pub fn scroll_fraction(&self) -> f64 {
        if self.max_scroll > 0.0 {
            self.scroll_y / self.max_scroll
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Document height including pin spacing.
    #[must_use]
    pub fn document_height(&self) -> f64 {
        self.content_height + self.pin_spacing
    }

    /// Total pixels added by pinned triggers.
    #[must_use]
    pub fn pin_spacing(&self) -> f64 {
        self.pin_spacing
    }

    /// Whether the page has scrolled past `threshold` pixels; drives the
    /// compact header state.
    #[must_use]
    pub fn is_scrolled(&self, threshold: f64) -> bool {
        self.scroll_y > threshold
    }

    /// User scroll to `y` pixels. Interrupts any snap transition.
    pub fn scroll_to(&mut self, y: f64) -> Vec<TriggerEvent> {
        if self.transition.take().is_some() {
            trace!(target: "ridgeline.scroll", "snap transition interrupted");
        }
        self.move_to(y)
    }

    /// User scroll to a fraction of `max_scroll`.
    pub fn scroll_to_fraction(&mut self, fraction: f64) -> Vec<TriggerEvent> {
        self.scroll_to(fraction * self.max_scroll)
    }

    fn move_to(&mut self, y: f64) -> Vec<TriggerEvent> {
        let y = if y.is_nan() { self.scroll_y } else { y.clamp(0.0, self.max_scroll) };
        let forward = y >= self.scroll_y;
        self.scroll_y = y;
        self.dispatch(y, forward)
    }

    fn dispatch(&mut self, y: f64, forward: bool) -> Vec<TriggerEvent> {
        let mut order: Vec<usize> = (0..self.slots.len())
            .filter(|&i| self.slots[i].resolved.is_some())
            .collect();
        order.sort_by(|&a, &b| {
            let sa = self.slots[a].resolved.map_or(0.0, |r| r.start);
            let sb = self.slots[b].resolved.map_or(0.0, |r| r.start);
            if forward { sa.total_cmp(&sb) } else { sb.total_cmp(&sa) }
        });

        let mut events = Vec::new();
        let mut spent: Vec<TriggerId> = Vec::new();
        for i in order {
            let slot = &mut self.slots[i];
            let Some(resolved) = slot.resolved else {
                continue;
            };
            let zone = resolved.zone(y);
            let once = slot.spec.flags.contains(TriggerFlags::ONCE);
            for &kind in crossings(slot.zone, zone) {
                events.push(TriggerEvent {
                    id: slot.id,
                    kind,
                    label: slot.spec.label.clone(),
                });
                if once && kind == TriggerEventKind::Enter {
                    spent.push(slot.id);
                    break;
                }
            }
            slot.zone = zone;
            slot.scrub.set_raw(resolved.progress(y));
        }

        for id in spent {
            trace!(target: "ridgeline.scroll", id = id.get(), "once trigger spent");
            self.kill(id);
        }
        for e in &events {
            trace!(
                target: "ridgeline.scroll",
                id = e.id.get(),
                kind = ?e.kind,
                y,
                "trigger crossed"
            );
        }
        events
    }

    /// Raw progress of a trigger at the current offset.
    #[must_use]
    pub fn progress(&self, id: TriggerId) -> Option<f64> {
        self.slot(id)
            .and_then(|s| s.resolved.map(|r| r.progress(self.scroll_y)))
    }

    /// Scrub-smoothed progress of a trigger.
    #[must_use]
    pub fn smoothed_progress(&self, id: TriggerId) -> Option<f64> {
        self.slot(id)
            .filter(|s| s.resolved.is_some())
            .map(|s| s.scrub.smoothed())
    }

    /// Whether the current offset lies between a trigger's start and end.
    #[must_use]
    pub fn is_active(&self, id: TriggerId) -> bool {
        self.slot(id).is_some_and(|s| s.zone == Zone::Active)
    }

    /// Pinned triggers as pixel regions, sorted by start.
    #[must_use]
    pub fn pinned_regions(&self) -> Vec<PinnedRegion> {
        pinned_regions_of(&self.slots)
    }

    /// Advance scrub smoothing and any snap transition by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Vec<TriggerEvent> {
        for slot in &mut self.slots {
            slot.scrub.tick(dt);
        }

        let Some(transition) = self.transition.as_mut() else {
            return Vec::new();
        };
        transition.tick(dt);
        let fraction = transition.position();
        let done = transition.is_complete();
        if done {
            debug!(
                target: "ridgeline.snap",
                target_fraction = fraction,
                "snap transition settled"
            );
            self.transition = None;
        }
        self.move_to(fraction * self.max_scroll)
    }

    /// Whether any scrub is still catching up or a snap is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some() || self.slots.iter().any(|s| s.scrub.is_settling())
    }
}

// ---------------------------------------------------------------------------
// Snapping
// ---------------------------------------------------------------------------

impl ScrollObserver {
    /// Make `policy` the active snap behavior, replacing any previous one.
    pub fn install_snap(&mut self, policy: SnapPolicy) {
        debug!(
            target: "ridgeline.snap",
            ranges = policy.ranges().map_or(0, |r| r.len()),
            ease = %policy.easing(),
            min_ms = policy.duration_bounds().min().as_millis() as u64,
            max_ms = policy.duration_bounds().max().as_millis() as u64,
            "snap policy installed"
        );
        self.snap = Some(policy);
    }

    /// Remove the snap behavior; scrolling becomes free.
    pub fn uninstall_snap(&mut self) -> Option<SnapPolicy> {
        self.transition = None;
        self.snap.take()
    }

    #[must_use]
    pub fn snap_policy(&self) -> Option<&SnapPolicy> {
        self.snap.as_ref()
    }

    #[must_use]
    pub fn transition(&self) -> Option<&SnapTransition> {
        self.transition.as_ref()
    }

    #[must_use]
    pub fn is_snapping(&self) -> bool {
        self.transition.is_some()
    }

    /// The user's scroll gesture ended. Starts a snap transition when the
    /// installed policy maps the current fraction somewhere else.
    pub fn end_gesture(&mut self) -> SnapDecision {
        let value = self.scroll_fraction();
        let Some(policy) = self.snap.as_ref() else {
            return SnapDecision::Free { value };
        };
        if self.max_scroll <= 0.0 {
            return SnapDecision::Free { value };
        }

        let decision = policy.decide(value);
        let target = decision.target();
        if (target - value).abs() > SNAP_EPSILON {
            let transition = policy.transition(value, target);
            debug!(
                target: "ridgeline.snap",
                from = value,
                to = target,
                duration_ms = transition.duration().as_millis() as u64,
                "snap transition started"
            );
            self.transition = Some(transition);
        } else {
            trace!(target: "ridgeline.snap", value, free = decision.is_free(), "no snap needed");
        }
        decision
    }
}
