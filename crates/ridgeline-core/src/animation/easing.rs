#![forbid(unsafe_code)]

//! Easing curves addressed by name.
//!
//! Identifiers follow the `family.direction` form used by web animation
//! engines: `"power2.out"`, `"power3.inOut"`, `"sine.in"`. A bare family
//! (`"power2"`) means `.out`. `"none"` and `"linear"` are the identity.
//!
//! # Invariants
//!
//! 1. Every curve maps `0.0 -> 0.0` and `1.0 -> 1.0`.
//! 2. Every curve is monotonically non-decreasing on `[0, 1]`.
//! 3. Inputs outside `[0, 1]` are clamped before evaluation.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which end of the curve carries the acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaseCurve {
    In,
    Out,
    InOut,
}

/// A named easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum Ease {
    /// Identity.
    None,
    /// Quadratic (`power1`).
    Power1(EaseCurve),
    /// Cubic (`power2`).
    Power2(EaseCurve),
    /// Quartic (`power3`).
    Power3(EaseCurve),
    /// Quintic (`power4`).
    Power4(EaseCurve),
    Sine(EaseCurve),
}

impl Default for Ease {
    /// `power2.out`, the snap transition curve.
    fn default() -> Self {
        Self::Power2(EaseCurve::Out)
    }
}

/// Error returned when an easing identifier is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown easing identifier: {input:?}")]
pub struct EaseParseError {
    pub input: String,
}

impl Ease {
    /// Evaluate the curve at `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::None => t,
            Self::Power1(c) => power(t, 2, c),
            Self::Power2(c) => power(t, 3, c),
            Self::Power3(c) => power(t, 4, c),
            Self::Power4(c) => power(t, 5, c),
            Self::Sine(c) => sine(t, c),
        }
    }

    /// Canonical identifier, e.g. `"power2.out"`.
    #[must_use]
    pub fn name(self) -> String {
        let (family, curve) = match self {
            Self::None => return "none".to_string(),
            Self::Power1(c) => ("power1", c),
            Self::Power2(c) => ("power2", c),
            Self::Power3(c) => ("power3", c),
            Self::Power4(c) => ("power4", c),
            Self::Sine(c) => ("sine", c),
        };
        let suffix = match curve {
            EaseCurve::In => "in",
            EaseCurve::Out => "out",
            EaseCurve::InOut => "inOut",
        };
        format!("{family}.{suffix}")
    }
}

/// Polynomial ease of the given exponent. `powerN` is degree `N + 1`.
fn power(t: f64, exponent: i32, curve: EaseCurve) -> f64 {
    match curve {
        EaseCurve::In => t.powi(exponent),
        EaseCurve::Out => 1.0 - (1.0 - t).powi(exponent),
        EaseCurve::InOut => {
            if t < 0.5 {
                (2.0 * t).powi(exponent) / 2.0
            } else {
                1.0 - (2.0 * (1.0 - t)).powi(exponent) / 2.0
            }
        }
    }
}

fn sine(t: f64, curve: EaseCurve) -> f64 {
    use std::f64::consts::{FRAC_PI_2, PI};
    match curve {
        EaseCurve::In => 1.0 - (t * FRAC_PI_2).cos(),
        EaseCurve::Out => (t * FRAC_PI_2).sin(),
        EaseCurve::InOut => -((PI * t).cos() - 1.0) / 2.0,
    }
}

impl FromStr for Ease {
    type Err = EaseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || EaseParseError {
            input: s.to_string(),
        };
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("none") || trimmed.eq_ignore_ascii_case("linear") {
            return Ok(Self::None);
        }

        let (family, direction) = trimmed.split_once('.').unwrap_or((trimmed, "out"));
        let curve = match direction {
            "in" => EaseCurve::In,
            "out" => EaseCurve::Out,
            "inOut" | "inout" => EaseCurve::InOut,
            _ => return Err(err()),
        };
        match family {
            "power0" => Ok(Self::None),
            "power1" => Ok(Self::Power1(curve)),
            "power2" => Ok(Self::Power2(curve)),
            "power3" => Ok(Self::Power3(curve)),
            "power4" => Ok(Self::Power4(curve)),
            "sine" => Ok(Self::Sine(curve)),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = EaseParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(value: Ease) -> Self {
        value.name()
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
