#![forbid(unsafe_code)]

//! Scrubbed progress: trigger progress that trails the scroll position.
//!
//! With [`Scrub::Smoothed`], every change of the raw progress restarts a
//! catch-up tween from the current smoothed value to the new raw value over
//! the configured lag, eased with `power3.out`. With [`Scrub::Immediate`]
//! the smoothed value is the raw value.

use std::time::Duration;

use ridgeline_core::{Animation, Ease, EaseCurve, Tween};

use crate::trigger::Scrub;

const CATCH_UP_EASE: Ease = Ease::Power3(EaseCurve::Out);

#[derive(Debug, Clone)]
pub(crate) struct ScrubState {
    mode: Option<Scrub>,
    raw: f64,
    catch_up: Option<Tween>,
    smoothed: f64,
}

impl ScrubState {
    pub(crate) fn new(mode: Option<Scrub>) -> Self {
        Self {
            mode,
            raw: 0.0,
            catch_up: None,
            smoothed: 0.0,
        }
    }

    pub(crate) fn raw(&self) -> f64 {
        self.raw
    }

    pub(crate) fn smoothed(&self) -> f64 {
        self.smoothed
    }

    pub(crate) fn is_settling(&self) -> bool {
        self.catch_up.is_some()
    }

    pub(crate) fn set_raw(&mut self, raw: f64) {
        if raw == self.raw {
            return;
        }
        self.raw = raw;
        match self.mode {
            Some(Scrub::Smoothed(lag)) if lag > 0.0 => {
                let lag = Duration::try_from_secs_f64(lag).unwrap_or(Duration::ZERO);
                if (raw - self.smoothed).abs() > f64::EPSILON {
                    self.catch_up =
                        Some(Tween::new(self.smoothed, raw, lag).ease(CATCH_UP_EASE));
                } else {
                    self.catch_up = None;
                    self.smoothed = raw;
                }
            }
            _ => {
                self.catch_up = None;
                self.smoothed = raw;
            }
        }
    }

    pub(crate) fn tick(&mut self, dt: Duration) {
        if let Some(tween) = self.catch_up.as_mut() {
            tween.tick(dt);
            self.smoothed = tween.value();
            if tween.is_complete() {
                self.catch_up = None;
            }
        }
    }
}
