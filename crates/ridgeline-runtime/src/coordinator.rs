#![forbid(unsafe_code)]

//! One-shot installation of pinned-section snapping.
//!
//! The [`SnapCoordinator`] reads the pinned regions and maximum scroll from
//! a [`SnapHost`], builds [`SnapRanges`], and installs a [`SnapPolicy`]
//! carrying the configured transition parameters. It installs at most once:
//! its [`SnapGuard`] goes from `Uninitialized` to `Installed` and never back.
//!
//! Installation is not fallible. Every reason to skip is reported as an
//! [`InstallOutcome`], logged at debug level under `ridgeline.snap`, and
//! leaves scrolling free. Skips other than
//! [`AlreadyInstalled`](InstallOutcome::AlreadyInstalled) keep the guard
//! `Uninitialized`, so a later attempt may still succeed.

use std::fmt;

use ridgeline_core::{PinnedRegion, SnapRanges};
use ridgeline_scroll::{ScrollObserver, SnapPolicy};

use crate::config::SnapConfig;

/// What the coordinator needs from the scroll engine.
pub trait SnapHost {
    /// Every pinned region, in any order.
    fn pinned_regions(&self) -> Vec<PinnedRegion>;

    /// Maximum scroll offset in pixels.
    fn max_scroll(&self) -> f64;

    /// Make `policy` the active snap behavior.
    fn install_snap(&mut self, policy: SnapPolicy);

    /// Whether the engine is available. Consulted by the timer fallback in
    /// place of an explicit readiness event.
    fn is_engine_loaded(&self) -> bool {
        true
    }
}

impl SnapHost for ScrollObserver {
    fn pinned_regions(&self) -> Vec<PinnedRegion> {
        ScrollObserver::pinned_regions(self)
    }

    fn max_scroll(&self) -> f64 {
        ScrollObserver::max_scroll(self)
    }

    fn install_snap(&mut self, policy: SnapPolicy) {
        ScrollObserver::install_snap(self, policy);
    }
}

/// Per-page installation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SnapGuard {
    #[default]
    Uninitialized,
    Installed,
}

/// Result of one installation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// A policy over this many pinned regions was installed.
    Installed { regions: usize },
    /// This page already installed its policy.
    AlreadyInstalled,
    /// The scroll engine has not loaded.
    EngineNotLoaded,
    /// Sections are still registering.
    RegistrationPending,
    /// The page does not scroll.
    ZeroScroll,
    /// No trigger pins its element.
    NoPinnedRegions,
    /// The page was unmounted.
    TornDown,
}

impl InstallOutcome {
    #[must_use]
    pub fn is_installed(self) -> bool {
        matches!(self, Self::Installed { .. })
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Installed { .. } => "installed",
            Self::AlreadyInstalled => "already_installed",
            Self::EngineNotLoaded => "engine_not_loaded",
            Self::RegistrationPending => "registration_pending",
            Self::ZeroScroll => "zero_scroll",
            Self::NoPinnedRegions => "no_pinned_regions",
            Self::TornDown => "torn_down",
        }
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installed { regions } => write!(f, "installed ({regions} regions)"),
            other => f.write_str(other.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapCoordinator {
    guard: SnapGuard,
    config: SnapConfig,
}

impl SnapCoordinator {
    #[must_use]
    pub fn new(config: SnapConfig) -> Self {
        Self {
            guard: SnapGuard::Uninitialized,
            config,
        }
    }

    #[must_use]
    pub fn guard(&self) -> SnapGuard {
        self.guard
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.guard == SnapGuard::Installed
    }

    #[must_use]
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// Build and install the snap policy if the host has anything to snap.
    pub fn try_install<H: SnapHost + ?Sized>(&mut self, host: &mut H) -> InstallOutcome {
        let span = tracing::debug_span!(
            "snap.install",
            max_scroll = tracing::field::Empty,
            regions = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );
        let _entered = span.enter();

        let outcome = self.install_inner(host, &span);
        span.record("outcome", outcome.as_str());
        tracing::debug!(
            target: "ridgeline.snap",
            outcome = outcome.as_str(),
            "snap installation attempt"
        );
        outcome
    }

    fn install_inner<H: SnapHost + ?Sized>(
        &mut self,
        host: &mut H,
        span: &tracing::Span,
    ) -> InstallOutcome {
        if self.is_installed() {
            return InstallOutcome::AlreadyInstalled;
        }

        let max_scroll = host.max_scroll();
        span.record("max_scroll", max_scroll);
        // Non-finite and non-positive ranges scroll nowhere.
        if !(max_scroll.is_finite() && max_scroll > 0.0) {
            return InstallOutcome::ZeroScroll;
        }

        let regions = host.pinned_regions();
        span.record("regions", regions.len() as u64);
        let Some(ranges) = SnapRanges::from_regions(&regions, max_scroll, self.config.snap.buffer)
        else {
            return InstallOutcome::NoPinnedRegions;
        };

        for (i, r) in ranges.ranges().iter().enumerate() {
            tracing::trace!(
                target: "ridgeline.snap",
                index = i,
                start = r.start,
                end = r.end,
                center = r.center,
                "snap range"
            );
        }

        let count = ranges.len();
        host.install_snap(self.config.to_policy(ranges));
        self.guard = SnapGuard::Installed;
        InstallOutcome::Installed { regions: count }
    }
}
