#![forbid(unsafe_code)]

//! Readiness signals from the scroll subsystem.
//!
//! Snapping may only be installed once the scroll engine is loaded **and**
//! every pinned section has registered its trigger. Hosts report both facts
//! as [`ReadinessEvent`]s; [`Readiness`] folds them into one flag.

use std::fmt;

/// A fact the scroll subsystem reports about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadinessEvent {
    /// The scroll engine is available.
    EngineLoaded,
    /// All pinned sections have registered their triggers.
    RegistrationComplete,
}

impl fmt::Display for ReadinessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EngineLoaded => "engine-loaded",
            Self::RegistrationComplete => "registration-complete",
        })
    }
}

/// Which readiness events have been seen. Events are sticky and may arrive
/// in any order or more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    engine_loaded: bool,
    registration_complete: bool,
}

impl Readiness {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event`. Returns `true` if it was new.
    pub fn observe(&mut self, event: ReadinessEvent) -> bool {
        let slot = match event {
            ReadinessEvent::EngineLoaded => &mut self.engine_loaded,
            ReadinessEvent::RegistrationComplete => &mut self.registration_complete,
        };
        !std::mem::replace(slot, true)
    }

    #[must_use]
    pub fn engine_loaded(&self) -> bool {
        self.engine_loaded
    }

    #[must_use]
    pub fn registration_complete(&self) -> bool {
        self.registration_complete
    }

    /// Both events seen.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.engine_loaded && self.registration_complete
    }
}
