#![forbid(unsafe_code)]

//! Runtime: when and whether snapping gets installed.
//!
//! # Role in Ridgeline
//! `ridgeline-runtime` owns the activation story. A page mounts a
//! [`PageLifecycle`], which waits for the scroll subsystem to report
//! [`ReadinessEvent`]s (or for the deferred timer fallback to expire) and
//! then lets the [`SnapCoordinator`] install a snap policy exactly once.
//!
//! # Primary responsibilities
//! - **SnapCoordinator / SnapGuard**: one-shot installation against any
//!   [`SnapHost`].
//! - **PageLifecycle**: mount, readiness, timer fallback, and teardown.
//! - **SnapConfig**: tunables loaded from TOML or JSON.
//! - **logging**: `tracing-subscriber` setup for binaries.
//!
//! # How it fits in the system
//! [`ScrollObserver`](ridgeline_scroll::ScrollObserver) implements
//! [`SnapHost`]; this crate never touches trigger layout itself.

pub mod cancellation;
pub mod config;
pub mod coordinator;
pub mod deferred;
pub mod lifecycle;
pub mod logging;
pub mod readiness;

pub use cancellation::{CancellationSource, CancellationToken};
pub use config::{ActivationSection, HeaderSection, SnapConfig, SnapConfigError, SnapSection};
pub use coordinator::{InstallOutcome, SnapCoordinator, SnapGuard, SnapHost};
pub use deferred::{
    DEFAULT_INNER_DELAY, DEFAULT_OUTER_DELAY, DeferredActivation, DeferredDelays, DeferredPhase,
    DeferredStep,
};
pub use lifecycle::PageLifecycle;
pub use logging::{LogFormat, LoggingError};
pub use readiness::{Readiness, ReadinessEvent};
