#![forbid(unsafe_code)]

//! The installed snap policy and the transition it drives.
//!
//! A [`SnapPolicy`] pairs the snap mapping ([`SnapRanges`]) with the
//! transition parameters: duration bounds, start delay, and easing. When a
//! scroll gesture ends, the observer asks the policy for a target and, if
//! the target differs from the current position, runs a [`SnapTransition`].
//!
//! # Invariants
//!
//! 1. Transition durations always lie within `[min, max]`.
//! 2. A transition ends exactly on its target.
//! 3. A policy whose ranges were lost on refresh (no pins left, zero scroll)
//!    maps every value to itself.

use std::time::Duration;

use ridgeline_core::{Animation, Ease, PinnedRegion, SNAP_BUFFER, SnapDecision, SnapRanges, Tween};

/// Default lower bound of a snap transition.
pub const DEFAULT_MIN_DURATION: Duration = Duration::from_millis(100);
/// Default upper bound of a snap transition.
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_millis(250);
/// Transition seconds per unit of scroll fraction before clamping.
pub const DEFAULT_SECONDS_PER_FRACTION: f64 = 2.5;

/// Inclusive bounds on a snap transition's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationBounds {
    min: Duration,
    max: Duration,
}

impl DurationBounds {
    /// Bounds `[min, max]`; a `max` below `min` is raised to `min`.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    #[must_use]
    pub fn min(&self) -> Duration {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Duration {
        self.max
    }

    #[must_use]
    pub fn clamp(&self, d: Duration) -> Duration {
        d.clamp(self.min, self.max)
    }
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DURATION, DEFAULT_MAX_DURATION)
    }
}

/// Snap mapping plus transition parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapPolicy {
    ranges: Option<SnapRanges>,
    buffer: f64,
    duration: DurationBounds,
    delay: Duration,
    ease: Ease,
    seconds_per_fraction: f64,
}

impl SnapPolicy {
    /// A policy over `ranges` with the default transition parameters.
    #[must_use]
    pub fn new(ranges: SnapRanges) -> Self {
        Self {
            buffer: ranges.buffer(),
            ranges: Some(ranges),
            duration: DurationBounds::default(),
            delay: Duration::ZERO,
            ease: Ease::default(),
            seconds_per_fraction: DEFAULT_SECONDS_PER_FRACTION,
        }
    }

    #[must_use]
    pub fn duration(mut self, bounds: DurationBounds) -> Self {
        self.duration = bounds;
        self
    }

    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    #[must_use]
    pub fn seconds_per_fraction(mut self, secs: f64) -> Self {
        self.seconds_per_fraction = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        self
    }

    /// Snap target for `value`, or `value` itself when no ranges are live.
    #[must_use]
    pub fn snap_to(&self, value: f64) -> f64 {
        match &self.ranges {
            Some(ranges) => ranges.snap_to(value),
            None => value,
        }
    }

    #[must_use]
    pub fn decide(&self, value: f64) -> SnapDecision {
        match &self.ranges {
            Some(ranges) => ranges.decide(value),
            None => SnapDecision::Free { value },
        }
    }

    #[must_use]
    pub fn ranges(&self) -> Option<&SnapRanges> {
        self.ranges.as_ref()
    }

    #[must_use]
    pub fn duration_bounds(&self) -> DurationBounds {
        self.duration
    }

    #[must_use]
    pub fn delay_duration(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn easing(&self) -> Ease {
        self.ease
    }

    /// Duration for a transition covering `distance` of the scroll range.
    #[must_use]
    pub fn transition_duration(&self, distance: f64) -> Duration {
        let secs = distance.abs() * self.seconds_per_fraction;
        let raw = Duration::try_from_secs_f64(secs).unwrap_or(self.duration.max());
        self.duration.clamp(raw)
    }

    /// The transition from `from` to `to`, both scroll fractions.
    #[must_use]
    pub fn transition(&self, from: f64, to: f64) -> SnapTransition {
        let tween = Tween::new(from, to, self.transition_duration(to - from))
            .delay(self.delay)
            .ease(self.ease);
        SnapTransition { tween }
    }

    /// Recompute the mapping for a new layout, keeping the transition
    /// parameters. Returns whether any ranges are live afterwards.
    pub(crate) fn rebuild(&mut self, regions: &[PinnedRegion], max_scroll: f64) -> bool {
        self.ranges = SnapRanges::from_regions(regions, max_scroll, self.buffer);
        self.ranges.is_some()
    }
}

impl Default for SnapPolicy {
    /// A policy with no ranges; every value maps to itself.
    fn default() -> Self {
        Self {
            ranges: None,
            buffer: SNAP_BUFFER,
            duration: DurationBounds::default(),
            delay: Duration::ZERO,
            ease: Ease::default(),
            seconds_per_fraction: DEFAULT_SECONDS_PER_FRACTION,
        }
    }
}

/// An in-flight eased move toward a snap target, in scroll fractions.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapTransition {
    tween: Tween,
}

impl SnapTransition {
    #[must_use]
    pub fn target(&self) -> f64 {
        self.tween.to_value()
    }

    #[must_use]
    pub fn origin(&self) -> f64 {
        self.tween.from_value()
    }

    /// Total moving time, excluding the delay.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.tween.duration()
    }

    /// Current scroll fraction.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.tween.value()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.tween.is_complete()
    }

    pub fn tick(&mut self, dt: Duration) {
        self.tween.tick(dt);
    }
}
