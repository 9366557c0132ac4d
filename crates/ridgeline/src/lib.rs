#![forbid(unsafe_code)]

//! Ridgeline public facade crate.
//!
//! Re-exports the types a page needs from the internal crates and offers
//! [`Page`], which bundles the scroll observer with the lifecycle that
//! decides when snapping switches on.

use web_time::{Duration, Instant};

// --- Core re-exports -------------------------------------------------------

pub use ridgeline_core::{
    Animation, Ease, EaseCurve, EaseParseError, NormalizedRange, PinnedRegion, SNAP_BUFFER,
    SnapDecision, SnapRanges, Tween, snap_to,
};

// --- Scroll re-exports -----------------------------------------------------

pub use ridgeline_scroll::{
    DurationBounds, ElementBox, PositionParseError, ResolvedTrigger, Scrub, ScrollObserver,
    SnapPolicy, SnapTransition, TriggerEvent, TriggerEventKind, TriggerFlags, TriggerId,
    TriggerPosition, TriggerSpec,
};

// --- Runtime re-exports ----------------------------------------------------

pub use ridgeline_runtime::{
    CancellationToken, InstallOutcome, LogFormat, LoggingError, PageLifecycle, ReadinessEvent,
    SnapConfig, SnapConfigError, SnapCoordinator, SnapGuard, SnapHost,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Ridgeline hosts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] SnapConfigError),
    #[error(transparent)]
    Position(#[from] PositionParseError),
    #[error(transparent)]
    Ease(#[from] EaseParseError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
}

/// Standard result type for Ridgeline APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Page facade -----------------------------------------------------------

/// One mounted page: its triggers, scroll state, and snap activation.
#[derive(Debug)]
pub struct Page {
    observer: ScrollObserver,
    lifecycle: PageLifecycle,
}

impl Page {
    #[must_use]
    pub fn mount(config: SnapConfig) -> Self {
        Self::mount_at(config, Instant::now())
    }

    #[must_use]
    pub fn mount_at(config: SnapConfig, now: Instant) -> Self {
        Self {
            observer: ScrollObserver::new(),
            lifecycle: PageLifecycle::mount_at(config, now),
        }
    }

    pub fn register(&mut self, spec: TriggerSpec) -> TriggerId {
        self.observer.register(spec)
    }

    pub fn refresh(&mut self, viewport_height: f64, content_height: f64) -> Vec<TriggerEvent> {
        self.observer.refresh(viewport_height, content_height)
    }

    pub fn notify(&mut self, event: ReadinessEvent) -> InstallOutcome {
        self.lifecycle.notify(event, &mut self.observer)
    }

    pub fn poll(&mut self, now: Instant) -> Option<InstallOutcome> {
        self.lifecycle.poll(now, &mut self.observer)
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.lifecycle.next_deadline()
    }

    pub fn scroll_to(&mut self, y: f64) -> Vec<TriggerEvent> {
        self.observer.scroll_to(y)
    }

    pub fn end_gesture(&mut self) -> SnapDecision {
        self.observer.end_gesture()
    }

    pub fn tick(&mut self, dt: Duration) -> Vec<TriggerEvent> {
        self.observer.tick(dt)
    }

    /// Header state with the configured threshold.
    #[must_use]
    pub fn is_scrolled(&self) -> bool {
        self.observer
            .is_scrolled(self.lifecycle.config().header.scrolled_threshold)
    }

    /// Cancelled when the page unmounts.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.lifecycle.cancellation_token()
    }

    #[must_use]
    pub fn guard(&self) -> SnapGuard {
        self.lifecycle.guard()
    }

    #[must_use]
    pub fn observer(&self) -> &ScrollObserver {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut ScrollObserver {
        &mut self.observer
    }

    #[must_use]
    pub fn lifecycle(&self) -> &PageLifecycle {
        &self.lifecycle
    }

    /// Tear down: cancel pending activation, drop the snap policy and every
    /// trigger.
    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
        self.observer.uninstall_snap();
        self.observer.kill_all();
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ElementBox, Error, InstallOutcome, Page, ReadinessEvent, Result, Scrub, ScrollObserver,
        SnapConfig, SnapDecision, TriggerEvent, TriggerEventKind, TriggerId, TriggerPosition,
        TriggerSpec,
    };
    pub use crate::{core, runtime, scroll};
}

pub use ridgeline_core as core;
pub use ridgeline_runtime as runtime;
pub use ridgeline_scroll as scroll;
