#![forbid(unsafe_code)]

//! Scroll: triggers, pinning, and the snap transition.
//!
//! # Role in Ridgeline
//! `ridgeline-scroll` is the scroll engine a page registers its sections
//! with. It lays triggers out against the viewport, adds pin spacing,
//! reports boundary crossings, smooths scrubbed progress, and, once a
//! [`SnapPolicy`] is installed, eases the page onto the nearest pinned
//! section when a gesture ends.
//!
//! # Primary responsibilities
//! - **TriggerSpec / TriggerPosition**: declarative trigger definitions
//!   (`"top 80%"`, `"+=120%"`).
//! - **ScrollObserver**: registry, layout, dispatch, and frame ticking.
//! - **SnapPolicy / SnapTransition**: snap mapping plus its eased move.
//!
//! # How it fits in the system
//! Pure math comes from `ridgeline-core`. `ridgeline-runtime` decides *when*
//! a policy is installed; this crate only knows *how* to run one.

pub mod observer;
pub mod position;
mod scrub;
pub mod snap_policy;
pub mod trigger;

pub use observer::{DEFAULT_SCROLLED_THRESHOLD, ScrollObserver};
pub use position::{Edge, PositionParseError, TriggerPosition};
pub use snap_policy::{
    DEFAULT_MAX_DURATION, DEFAULT_MIN_DURATION, DEFAULT_SECONDS_PER_FRACTION, DurationBounds,
    SnapPolicy, SnapTransition,
};
pub use trigger::{
    ElementBox, ResolvedTrigger, Scrub, TriggerEvent, TriggerEventKind, TriggerFlags, TriggerId,
    TriggerSpec,
};
