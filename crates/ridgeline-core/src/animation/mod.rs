#![forbid(unsafe_code)]

//! Time-driven animation primitives.
//!
//! Everything here is advanced explicitly with [`Animation::tick`]; nothing
//! reads a clock. Hosts decide the frame cadence.
//!
//! - [`easing`]: named easing curves ([`Ease`]) and their identifier syntax.
//! - [`tween`]: a delayed, eased interpolation between two scroll values.

pub mod easing;
pub mod tween;

use std::time::Duration;

pub use easing::{Ease, EaseCurve, EaseParseError};
pub use tween::Tween;

/// A value that evolves as time is fed into it.
///
/// # Invariants
///
/// 1. `tick` with a zero duration is a no-op.
/// 2. Once `is_complete()` returns `true`, further ticks do not change
///    `value()`.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    fn is_complete(&self) -> bool;

    /// Current output value.
    fn value(&self) -> f64;
}
