#![forbid(unsafe_code)]

//! Core: pinned-region geometry, snap mapping, and easing.
//!
//! # Role in Ridgeline
//! `ridgeline-core` is the pure layer. It knows nothing about triggers,
//! timers, or page lifecycles; it turns a set of pinned pixel intervals into
//! a scroll-fraction mapping and provides the curves used to animate toward
//! a snap target.
//!
//! # Primary responsibilities
//! - **PinnedRegion / NormalizedRange**: pixel and fraction views of a
//!   pinned section.
//! - **SnapRanges / snap_to**: nearest-center snapping with free-scroll
//!   zones between pinned sections.
//! - **Ease / Tween**: named easing curves and the eased interpolation the
//!   snap transition runs on.
//!
//! # How it fits in the system
//! `ridgeline-scroll` resolves triggers into [`PinnedRegion`]s and runs
//! [`Tween`]s; `ridgeline-runtime` builds [`SnapRanges`] once the page is
//! ready and installs them.

pub mod animation;
pub mod geometry;
pub mod snap;

pub use animation::{Animation, Ease, EaseCurve, EaseParseError, Tween};
pub use geometry::{NormalizedRange, PinnedRegion};
pub use snap::{SNAP_BUFFER, SnapDecision, SnapRanges, nearest_pinned, snap_to};
