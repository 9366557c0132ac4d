#![forbid(unsafe_code)]

//! Page lifetime: owns the snap guard and its pending activation attempts.
//!
//! A [`PageLifecycle`] is created when a page mounts and dropped (or
//! [`unmount`](PageLifecycle::unmount)ed) when it goes away. Mounting arms
//! a fresh [`SnapCoordinator`] and the deferred timer fallback; remounting
//! therefore starts from an uninitialized guard.
//!
//! Installation is attempted from two directions:
//! - [`notify`](PageLifecycle::notify) with readiness events, installing as
//!   soon as both have been seen;
//! - [`poll`](PageLifecycle::poll) with the current time, for hosts that
//!   never send events.
//!
//! Whichever gets there first installs; the other then reports
//! [`InstallOutcome::AlreadyInstalled`].

use web_time::Instant;

use crate::cancellation::{CancellationSource, CancellationToken};
use crate::config::SnapConfig;
use crate::coordinator::{InstallOutcome, SnapCoordinator, SnapGuard, SnapHost};
use crate::deferred::{DeferredActivation, DeferredStep};
use crate::readiness::{Readiness, ReadinessEvent};

#[derive(Debug)]
pub struct PageLifecycle {
    coordinator: SnapCoordinator,
    readiness: Readiness,
    deferred: DeferredActivation,
    cancel: CancellationSource,
}

impl PageLifecycle {
    /// Mount a page now.
    #[must_use]
    pub fn mount(config: SnapConfig) -> Self {
        Self::mount_at(config, Instant::now())
    }

    /// Mount a page at `now`; the deferred schedule is timed from here.
    #[must_use]
    pub fn mount_at(config: SnapConfig, now: Instant) -> Self {
        let cancel = CancellationSource::new();
        let deferred = DeferredActivation::schedule(now, config.delays(), cancel.token());
        tracing::debug!(
            target: "ridgeline.lifecycle",
            outer_delay_ms = config.activation.outer_delay_ms,
            inner_delay_ms = config.activation.inner_delay_ms,
            "page mounted"
        );
        Self {
            coordinator: SnapCoordinator::new(config),
            readiness: Readiness::new(),
            deferred,
            cancel,
        }
    }

    #[must_use]
    pub fn guard(&self) -> SnapGuard {
        self.coordinator.guard()
    }

    #[must_use]
    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    #[must_use]
    pub fn config(&self) -> &SnapConfig {
        self.coordinator.config()
    }

    /// Token cancelled by [`unmount`](Self::unmount). Hosts polling in real
    /// time can sleep on it until the next deadline.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.token()
    }

    /// When the deferred fallback next wants a [`poll`](Self::poll).
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.is_mounted() {
            self.deferred.next_deadline()
        } else {
            None
        }
    }

    /// Feed a readiness event; installs once both events have arrived.
    pub fn notify<H: SnapHost + ?Sized>(
        &mut self,
        event: ReadinessEvent,
        host: &mut H,
    ) -> InstallOutcome {
        if !self.is_mounted() {
            tracing::debug!(target: "ridgeline.lifecycle", %event, "event after unmount ignored");
            return InstallOutcome::TornDown;
        }
        let fresh = self.readiness.observe(event);
        tracing::debug!(target: "ridgeline.lifecycle", %event, fresh, "readiness event");

        if self.coordinator.is_installed() {
            return InstallOutcome::AlreadyInstalled;
        }
        if !self.readiness.engine_loaded() {
            return InstallOutcome::EngineNotLoaded;
        }
        if !self.readiness.registration_complete() {
            return InstallOutcome::RegistrationPending;
        }
        let outcome = self.coordinator.try_install(host);
        if outcome.is_installed() {
            self.deferred.abandon();
        }
        outcome
    }

    /// Drive the timer fallback. Returns `None` when no stage was due.
    pub fn poll<H: SnapHost + ?Sized>(
        &mut self,
        now: Instant,
        host: &mut H,
    ) -> Option<InstallOutcome> {
        if !self.is_mounted() {
            return Some(InstallOutcome::TornDown);
        }
        match self.deferred.poll(now) {
            DeferredStep::Idle => None,
            DeferredStep::OuterDue => {
                let outcome = if self.coordinator.is_installed() {
                    Some(InstallOutcome::AlreadyInstalled)
                } else if !(self.readiness.engine_loaded() || host.is_engine_loaded()) {
                    Some(InstallOutcome::EngineNotLoaded)
                } else {
                    None
                };
                if let Some(outcome) = outcome {
                    self.deferred.abandon();
                    tracing::debug!(
                        target: "ridgeline.lifecycle",
                        outcome = outcome.as_str(),
                        "deferred activation abandoned"
                    );
                } else {
                    tracing::debug!(target: "ridgeline.lifecycle", "deferred activation armed");
                }
                outcome
            }
            DeferredStep::InnerDue => {
                tracing::debug!(target: "ridgeline.lifecycle", "deferred activation due");
                Some(self.coordinator.try_install(host))
            }
        }
    }

    /// Tear the page down. Pending attempts are cancelled and later calls
    /// report [`InstallOutcome::TornDown`].
    pub fn unmount(&mut self) {
        if self.is_mounted() {
            self.cancel.cancel();
            tracing::debug!(
                target: "ridgeline.lifecycle",
                installed = self.coordinator.is_installed(),
                "page unmounted"
            );
        }
    }
}

impl Drop for PageLifecycle {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridgeline_core::PinnedRegion;
    use ridgeline_scroll::SnapPolicy;
    use web_time::Duration;

    #[derive(Default)]
    struct FakeHost {
        loaded: bool,
        installs: usize,
    }

    impl SnapHost for FakeHost {
        fn pinned_regions(&self) -> Vec<PinnedRegion> {
            vec![PinnedRegion::new(0.0, 960.0)]
        }
        fn max_scroll(&self) -> f64 {
            4000.0
        }
        fn install_snap(&mut self, _policy: SnapPolicy) {
            self.installs += 1;
        }
        fn is_engine_loaded(&self) -> bool {
            self.loaded
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn events_install_in_either_order() {
        let mut host = FakeHost::default();
        let mut page = PageLifecycle::mount(SnapConfig::default());
        assert_eq!(
            page.notify(ReadinessEvent::RegistrationComplete, &mut host),
            InstallOutcome::EngineNotLoaded
        );
        assert!(page.notify(ReadinessEvent::EngineLoaded, &mut host).is_installed());
        assert_eq!(page.guard(), SnapGuard::Installed);
        assert_eq!(page.next_deadline(), None);
    }

    #[test]
    fn registration_pending_until_signalled() {
        let mut host = FakeHost::default();
        let mut page = PageLifecycle::mount(SnapConfig::default());
        assert_eq!(
            page.notify(ReadinessEvent::EngineLoaded, &mut host),
            InstallOutcome::RegistrationPending
        );
        assert_eq!(host.installs, 0);
    }

    #[test]
    fn fallback_installs_after_both_delays() {
        let t0 = Instant::now();
        let mut host = FakeHost {
            loaded: true,
            ..FakeHost::default()
        };
        let mut page = PageLifecycle::mount_at(SnapConfig::default(), t0);
        assert_eq!(page.poll(t0 + ms(500), &mut host), None);
        assert_eq!(page.poll(t0 + ms(800), &mut host), None);
        assert_eq!(page.next_deadline(), Some(t0 + ms(2000)));
        assert_eq!(
            page.poll(t0 + ms(2000), &mut host),
            Some(InstallOutcome::Installed { regions: 1 })
        );
        assert_eq!(host.installs, 1);
    }

    #[test]
    fn fallback_gives_up_without_engine() {
        let t0 = Instant::now();
        let mut host = FakeHost::default();
        let mut page = PageLifecycle::mount_at(SnapConfig::default(), t0);
        assert_eq!(
            page.poll(t0 + ms(800), &mut host),
            Some(InstallOutcome::EngineNotLoaded)
        );
        assert_eq!(page.poll(t0 + ms(5000), &mut host), None);
        assert_eq!(host.installs, 0);
    }

    #[test]
    fn unmount_cancels_everything() {
        let t0 = Instant::now();
        let mut host = FakeHost {
            loaded: true,
            ..FakeHost::default()
        };
        let mut page = PageLifecycle::mount_at(SnapConfig::default(), t0);
        page.poll(t0 + ms(800), &mut host);
        page.unmount();
        assert!(!page.is_mounted());
        assert_eq!(
            page.poll(t0 + ms(2000), &mut host),
            Some(InstallOutcome::TornDown)
        );
        assert_eq!(
            page.notify(ReadinessEvent::EngineLoaded, &mut host),
            InstallOutcome::TornDown
        );
        assert_eq!(host.installs, 0);
    }

    #[test]
    fn unmount_wakes_deadline_waiter() {
        let page = PageLifecycle::mount(SnapConfig::default());
        let token = page.cancellation_token();
        assert!(!token.wait_until(Instant::now() + ms(1)));
        let mut page = page;
        page.unmount();
        assert!(token.wait_until(Instant::now() + ms(10_000)));
    }

    #[test]
    fn remount_starts_uninitialized() {
        let mut host = FakeHost::default();
        let mut page = PageLifecycle::mount(SnapConfig::default());
        page.notify(ReadinessEvent::EngineLoaded, &mut host);
        page.notify(ReadinessEvent::RegistrationComplete, &mut host);
        assert_eq!(page.guard(), SnapGuard::Installed);
        drop(page);

        let page = PageLifecycle::mount(SnapConfig::default());
        assert_eq!(page.guard(), SnapGuard::Uninitialized);
    }
}
