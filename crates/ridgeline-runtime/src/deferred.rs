#![forbid(unsafe_code)]

//! Timer fallback for hosts that never report readiness.
//!
//! The schedule has two stages. After the **outer** delay the host is
//! checked for a loaded engine; if present, the **inner** delay starts,
//! giving sections time to register, and when it elapses the coordinator
//! enumerates pinned regions. The inner stage is timed from the poll that
//! observed the outer deadline, the way a nested timer starts when its
//! enclosing callback runs.
//!
//! Nothing sleeps here: the caller polls with its own [`Instant`]s, which
//! keeps the schedule deterministic under test. A cancelled token stops
//! both stages.
//!
//! ```text
//!   schedule ──outer──▶ OuterDue ──inner──▶ InnerDue ──▶ Finished
//!       │                   │
//!       └──── cancel ───────┴──────────────▶ Cancelled
//! ```

use web_time::{Duration, Instant};

use crate::cancellation::CancellationToken;

/// Default wait before checking the engine.
pub const DEFAULT_OUTER_DELAY: Duration = Duration::from_millis(800);
/// Default wait between the engine check and region enumeration.
pub const DEFAULT_INNER_DELAY: Duration = Duration::from_millis(1200);

/// The two delays of the fallback schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredDelays {
    pub outer: Duration,
    pub inner: Duration,
}

impl Default for DeferredDelays {
    fn default() -> Self {
        Self {
            outer: DEFAULT_OUTER_DELAY,
            inner: DEFAULT_INNER_DELAY,
        }
    }
}

/// Where the schedule stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredPhase {
    AwaitingOuter { due: Instant },
    AwaitingInner { due: Instant },
    Finished,
    Cancelled,
}

/// What a poll observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredStep {
    /// No deadline passed.
    Idle,
    /// The outer deadline passed; the inner stage is now armed. Call
    /// [`DeferredActivation::abandon`] if the engine check fails.
    OuterDue,
    /// The inner deadline passed; enumerate regions now.
    InnerDue,
}

#[derive(Debug, Clone)]
pub struct DeferredActivation {
    phase: DeferredPhase,
    inner_delay: Duration,
    token: CancellationToken,
}

impl DeferredActivation {
    /// Start the schedule at `now`.
    #[must_use]
    pub fn schedule(now: Instant, delays: DeferredDelays, token: CancellationToken) -> Self {
        Self {
            phase: DeferredPhase::AwaitingOuter {
                due: now + delays.outer,
            },
            inner_delay: delays.inner,
            token,
        }
    }

    #[must_use]
    pub fn phase(&self) -> DeferredPhase {
        self.phase
    }

    /// The next instant at which [`poll`](Self::poll) can make progress.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            DeferredPhase::AwaitingOuter { due } | DeferredPhase::AwaitingInner { due } => {
                Some(due)
            }
            DeferredPhase::Finished | DeferredPhase::Cancelled => None,
        }
    }

    /// Whether the schedule can still fire.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.next_deadline().is_some()
    }

    /// Advance to `now`. At most one stage fires per poll.
    pub fn poll(&mut self, now: Instant) -> DeferredStep {
        if self.token.is_cancelled() {
            self.phase = DeferredPhase::Cancelled;
            return DeferredStep::Idle;
        }
        match self.phase {
            DeferredPhase::AwaitingOuter { due } if now >= due => {
                self.phase = DeferredPhase::AwaitingInner {
                    due: now + self.inner_delay,
                };
                DeferredStep::OuterDue
            }
            DeferredPhase::AwaitingInner { due } if now >= due => {
                self.phase = DeferredPhase::Finished;
                DeferredStep::InnerDue
            }
            _ => DeferredStep::Idle,
        }
    }

    /// Stop the schedule without firing again.
    pub fn abandon(&mut self) {
        if self.is_pending() {
            self.phase = DeferredPhase::Finished;
        }
    }
}
