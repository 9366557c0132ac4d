#![forbid(unsafe_code)]

//! Snap behavior as data.
//!
//! [`SnapConfig`] gathers every tunable of snapping and activation so they
//! can be loaded from TOML or JSON instead of being compiled in.
//!
//! ```toml
//! # ridgeline.toml
//! [snap]
//! buffer = 0.02
//! min_duration_ms = 100
//! max_duration_ms = 250
//! ease = "power2.out"
//!
//! [activation]
//! outer_delay_ms = 800
//! inner_delay_ms = 1200
//! ```
//!
//! ```rust,ignore
//! let config = SnapConfig::from_toml_file("ridgeline.toml")?;
//! let config = SnapConfig::from_json_str(json)?.validated()?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the constants the crates use when no config is
//! given, so `SnapConfig::default()` reproduces the stock behavior.

use std::path::Path;

use ridgeline_core::{Ease, SNAP_BUFFER, SnapRanges};
use ridgeline_scroll::{
    DEFAULT_MAX_DURATION, DEFAULT_MIN_DURATION, DEFAULT_SCROLLED_THRESHOLD,
    DEFAULT_SECONDS_PER_FRACTION, DurationBounds, SnapPolicy,
};
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::deferred::{DEFAULT_INNER_DELAY, DEFAULT_OUTER_DELAY, DeferredDelays};

/// Largest accepted buffer; wider buffers would swallow the gaps between
/// sections entirely.
const MAX_BUFFER: f64 = 0.5;

// ---------------------------------------------------------------------------
// Top-level SnapConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Snap mapping and transition.
    pub snap: SnapSection,
    /// Deferred activation timing.
    pub activation: ActivationSection,
    /// Header compaction.
    pub header: HeaderSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSection {
    /// Fraction of the scroll range around each pinned section that still
    /// snaps.
    pub buffer: f64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    pub delay_ms: u64,
    pub ease: Ease,
    /// Transition seconds per unit of scroll fraction, before clamping.
    pub seconds_per_fraction: f64,
}

impl Default for SnapSection {
    fn default() -> Self {
        Self {
            buffer: SNAP_BUFFER,
            min_duration_ms: millis(DEFAULT_MIN_DURATION),
            max_duration_ms: millis(DEFAULT_MAX_DURATION),
            delay_ms: 0,
            ease: Ease::default(),
            seconds_per_fraction: DEFAULT_SECONDS_PER_FRACTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationSection {
    pub outer_delay_ms: u64,
    pub inner_delay_ms: u64,
}

impl Default for ActivationSection {
    fn default() -> Self {
        Self {
            outer_delay_ms: millis(DEFAULT_OUTER_DELAY),
            inner_delay_ms: millis(DEFAULT_INNER_DELAY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSection {
    /// Scroll offset in pixels past which the page counts as scrolled.
    pub scrolled_threshold: f64,
}

impl Default for HeaderSection {
    fn default() -> Self {
        Self {
            scrolled_threshold: DEFAULT_SCROLLED_THRESHOLD,
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl SnapConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, SnapConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SnapConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, SnapConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SnapConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every field against its accepted range.
    ///
    /// Returns one message per problem; an empty list means the config is
    /// valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let snap = &self.snap;

        if !(0.0..=MAX_BUFFER).contains(&snap.buffer) {
            errors.push(format!(
                "snap.buffer must be in [0, {MAX_BUFFER}], got {}",
                snap.buffer
            ));
        }
        if snap.max_duration_ms == 0 {
            errors.push("snap.max_duration_ms must be > 0".into());
        }
        if snap.min_duration_ms > snap.max_duration_ms {
            errors.push(format!(
                "snap.min_duration_ms ({}) must not exceed snap.max_duration_ms ({})",
                snap.min_duration_ms, snap.max_duration_ms
            ));
        }
        if !snap.seconds_per_fraction.is_finite() || snap.seconds_per_fraction < 0.0 {
            errors.push(format!(
                "snap.seconds_per_fraction must be finite and >= 0, got {}",
                snap.seconds_per_fraction
            ));
        }
        if !self.header.scrolled_threshold.is_finite() || self.header.scrolled_threshold < 0.0 {
            errors.push(format!(
                "header.scrolled_threshold must be finite and >= 0, got {}",
                self.header.scrolled_threshold
            ));
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, SnapConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(SnapConfigError::Validation(errors))
        }
    }

    #[must_use]
    pub fn duration_bounds(&self) -> DurationBounds {
        DurationBounds::new(
            Duration::from_millis(self.snap.min_duration_ms),
            Duration::from_millis(self.snap.max_duration_ms),
        )
    }

    #[must_use]
    pub fn delays(&self) -> DeferredDelays {
        DeferredDelays {
            outer: Duration::from_millis(self.activation.outer_delay_ms),
            inner: Duration::from_millis(self.activation.inner_delay_ms),
        }
    }

    /// Wrap `ranges` in a policy carrying this config's transition
    /// parameters.
    #[must_use]
    pub fn to_policy(&self, ranges: SnapRanges) -> SnapPolicy {
        SnapPolicy::new(ranges)
            .duration(self.duration_bounds())
            .delay(Duration::from_millis(self.snap.delay_ms))
            .ease(self.snap.ease)
            .seconds_per_fraction(self.snap.seconds_per_fraction)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors loading a [`SnapConfig`].
#[derive(Debug, thiserror::Error)]
pub enum SnapConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridgeline_core::{EaseCurve, NormalizedRange};

    #[test]
    fn defaults_are_stock_constants() {
        let c = SnapConfig::default();
        assert_eq!(c.snap.buffer, 0.02);
        assert_eq!(c.snap.min_duration_ms, 100);
        assert_eq!(c.snap.max_duration_ms, 250);
        assert_eq!(c.snap.delay_ms, 0);
        assert_eq!(c.snap.ease.name(), "power2.out");
        assert_eq!(c.snap.seconds_per_fraction, 2.5);
        assert_eq!(c.activation.outer_delay_ms, 800);
        assert_eq!(c.activation.inner_delay_ms, 1200);
        assert_eq!(c.header.scrolled_threshold, 100.0);
        assert!(c.validate().is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = SnapConfig::from_toml_str(
            r#"
            [snap]
            ease = "sine.inOut"
            max_duration_ms = 400
            "#,
        )
        .unwrap();
        assert_eq!(c.snap.ease, Ease::Sine(EaseCurve::InOut));
        assert_eq!(c.snap.max_duration_ms, 400);
        assert_eq!(c.snap.min_duration_ms, 100);
        assert_eq!(c.activation, ActivationSection::default());
    }

    #[test]
    fn json_loads() {
        let c = SnapConfig::from_json_str(r#"{"activation":{"inner_delay_ms":600}}"#).unwrap();
        assert_eq!(c.delays().inner, Duration::from_millis(600));
        assert_eq!(c.delays().outer, Duration::from_millis(800));
    }

    #[test]
    fn unknown_ease_is_a_parse_error() {
        let err = SnapConfig::from_toml_str("[snap]\nease = \"bounce\"").unwrap_err();
        assert!(matches!(err, SnapConfigError::Toml(_)));
    }

    #[test]
    fn validate_reports_each_problem() {
        let mut c = SnapConfig::default();
        c.snap.buffer = 0.9;
        c.snap.min_duration_ms = 500;
        c.header.scrolled_threshold = f64::NAN;
        let errors = c.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors[0].contains("snap.buffer"));

        let err = c.validated().unwrap_err();
        assert!(err.to_string().starts_with("validation errors:"));
    }

    #[test]
    fn policy_carries_parameters() {
        let mut c = SnapConfig::default();
        c.snap.delay_ms = 50;
        let ranges =
            SnapRanges::from_ranges([NormalizedRange::from_fractions(0.0, 0.5)], c.snap.buffer)
                .unwrap();
        let policy = c.to_policy(ranges);
        assert_eq!(policy.delay_duration(), Duration::from_millis(50));
        assert_eq!(policy.duration_bounds().max(), Duration::from_millis(250));
        assert_eq!(policy.snap_to(0.1), 0.25);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SnapConfig::from_toml_file("/nonexistent/ridgeline.toml").unwrap_err();
        assert!(matches!(err, SnapConfigError::Io(_)));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ridgeline.json");
        let mut c = SnapConfig::default();
        c.snap.buffer = 0.05;
        std::fs::write(&path, serde_json::to_string(&c).unwrap()).unwrap();
        assert_eq!(SnapConfig::from_json_file(&path).unwrap(), c);
    }
}
