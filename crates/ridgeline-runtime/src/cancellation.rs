#![forbid(unsafe_code)]

//! Teardown signal for a mounted page.
//!
//! A page owns one [`CancellationSource`]. Every deferred activation it
//! schedules holds a [`CancellationToken`] and checks it before acting, so
//! unmounting the page turns all outstanding attempts into no-ops. Hosts
//! that wait on the wall clock for the next activation deadline can block
//! in [`CancellationToken::wait_until`] and are woken early by an unmount.
//!
//! ```
//! use ridgeline_runtime::cancellation::CancellationSource;
//! use web_time::{Duration, Instant};
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//! assert!(!token.wait_until(Instant::now() + Duration::from_millis(1)));
//!
//! source.cancel();
//! assert!(token.is_cancelled());
//! ```

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use web_time::Instant;

#[derive(Default)]
struct Signal {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl Signal {
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.cancelled.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// The page's side of the signal.
///
/// Dropping the source leaves its tokens uncancelled; teardown goes through
/// [`cancel`](Self::cancel).
#[derive(Default)]
pub struct CancellationSource {
    signal: Arc<Signal>,
}

impl CancellationSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A token observing this source.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            signal: Arc::clone(&self.signal),
        }
    }

    /// Mark the page torn down and wake every waiter. Idempotent.
    pub fn cancel(&self) {
        *self.signal.lock() = true;
        self.signal.wake.notify_all();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.signal.lock()
    }
}

impl fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSource")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Cloneable observer of a page's teardown.
#[derive(Clone)]
pub struct CancellationToken {
    signal: Arc<Signal>,
}

impl CancellationToken {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.signal.lock()
    }

    /// Block until `deadline` or until the page is torn down.
    ///
    /// Returns `true` when woken by cancellation. A deadline already in the
    /// past returns immediately.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut cancelled = self.signal.lock();
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let (guard, _) = self
                .signal
                .wake
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            cancelled = guard;
        }
        *cancelled
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use web_time::Duration;

    fn in_ms(n: u64) -> Instant {
        Instant::now() + Duration::from_millis(n)
    }

    #[test]
    fn every_token_sees_teardown() {
        let source = CancellationSource::new();
        let first = source.token();
        let second = first.clone();
        source.cancel();
        assert!(first.is_cancelled() && second.is_cancelled());
        assert!(source.is_cancelled());
    }

    #[test]
    fn dropped_source_is_not_teardown() {
        let token = CancellationSource::new().token();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn repeated_cancel_is_harmless() {
        let source = CancellationSource::new();
        source.cancel();
        source.cancel();
        assert!(source.token().is_cancelled());
    }

    #[test]
    fn past_deadline_returns_at_once() {
        let source = CancellationSource::new();
        let start = Instant::now();
        assert!(!source.token().wait_until(start));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn wait_reaches_deadline() {
        let source = CancellationSource::new();
        let deadline = in_ms(10);
        assert!(!source.token().wait_until(deadline));
        assert!(Instant::now() >= deadline);
    }

    #[test]
    fn cancelled_token_does_not_wait() {
        let source = CancellationSource::new();
        source.cancel();
        assert!(source.token().wait_until(in_ms(10_000)));
    }

    #[test]
    fn unmount_wakes_sleeping_host() {
        let source = CancellationSource::new();
        let token = source.token();
        let host = thread::spawn(move || token.wait_until(in_ms(10_000)));
        thread::sleep(Duration::from_millis(20));
        source.cancel();
        assert!(host.join().unwrap());
    }
}
