#![forbid(unsafe_code)]

//! Eased interpolation between two values with an optional start delay.
//!
//! # Invariants
//!
//! 1. `value()` equals `from` until the delay has elapsed.
//! 2. `value()` equals `to` exactly once complete (no float drift at the end).
//! 3. A zero duration completes as soon as the delay has elapsed.

use std::time::Duration;

use super::{Animation, Ease};

/// A value moving from `from` to `to` over `duration`, shaped by `ease`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    delay: Duration,
    duration: Duration,
    ease: Ease,
    elapsed: Duration,
}

impl Tween {
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            delay: Duration::ZERO,
            duration,
            ease: Ease::None,
            elapsed: Duration::ZERO,
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Hold at `from` for `delay` before moving (builder pattern).
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn from_value(&self) -> f64 {
        self.from
    }

    #[must_use]
    pub fn to_value(&self) -> f64 {
        self.to
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
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

    /// Linear progress through the moving phase, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let moving = self.elapsed.saturating_sub(self.delay);
        if self.duration.is_zero() {
            return if self.elapsed >= self.delay { 1.0 } else { 0.0 };
        }
        (moving.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn total(&self) -> Duration {
        self.delay.saturating_add(self.duration)
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        if dt.is_zero() || self.is_complete() {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt).min(self.total());
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.total()
    }

    fn value(&self) -> f64 {
        if self.is_complete() {
            return self.to;
        }
        self.from + (self.to - self.from) * self.ease.apply(self.progress())
    }
}
