#![forbid(unsafe_code)]

//! Trigger position specs.
//!
//! A position says at which scroll offset a trigger starts or ends. Two
//! forms are accepted:
//!
//! | Form | Example | Meaning |
//! |------|---------|---------|
//! | Anchor | `"top 80%"` | Scroll offset at which the element's top meets 80% of the viewport height |
//! | Anchor (one token) | `"center"` | Same edge on element and viewport (`"center center"`) |
//! | Relative | `"+=120%"` | 120% of the viewport height past the other end |
//! | Relative | `"-=40px"` | 40 pixels before the other end |
//!
//! Edges are `top`, `center`, `bottom`, a percentage, or a pixel length
//! (`100px` or a bare number), measured from the top of the element or of
//! the viewport.

use std::fmt;
use std::str::FromStr;

/// Failure to parse a position spec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid trigger position {input:?}: {reason}")]
pub struct PositionParseError {
    pub input: String,
    pub reason: &'static str,
}

/// A point along an element or the viewport, measured from its top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
    /// Percentage of the box height (`80%` is `Percent(80.0)`).
    Percent(f64),
    Pixels(f64),
}

impl Edge {
    /// Offset from the top of a box of height `extent`.
    #[must_use]
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => extent / 2.0,
            Self::Bottom => extent,
            Self::Percent(p) => extent * p / 100.0,
            Self::Pixels(px) => px,
        }
    }

    fn parse(token: &str, input: &str) -> Result<Self, PositionParseError> {
        match token {
            "top" => return Ok(Self::Top),
            "center" => return Ok(Self::Center),
            "bottom" => return Ok(Self::Bottom),
            _ => {}
        }
        let Length(len) = Length::parse(token, input)?;
        Ok(len)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Center => f.write_str("center"),
            Self::Bottom => f.write_str("bottom"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Pixels(px) => write!(f, "{px}px"),
        }
    }
}

/// Numeric length token: a percentage or pixel edge.
struct Length(Edge);

impl Length {
    fn parse(token: &str, input: &str) -> Result<Self, PositionParseError> {
        let err = |reason| PositionParseError {
            input: input.to_string(),
            reason,
        };
        let (number, percent) = if let Some(n) = token.strip_suffix('%') {
            (n, true)
        } else if let Some(n) = token.strip_suffix("px") {
            (n, false)
        } else {
            (token, false)
        };
        let value: f64 = number.parse().map_err(|_| err("expected an edge or a length"))?;
        if !value.is_finite() {
            return Err(err("length must be finite"));
        }
        Ok(Self(if percent {
            Edge::Percent(value)
        } else {
            Edge::Pixels(value)
        }))
    }
}

/// Where a trigger starts or ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerPosition {
    /// `element` edge meets `viewport` edge.
    Anchor { element: Edge, viewport: Edge },
    /// Signed offset from the other end of the trigger. Percentages are of
    /// the viewport height.
    Relative(Edge),
}

impl TriggerPosition {
    /// `"top top"`: the element's top reaches the top of the viewport.
    pub const TOP_TOP: Self = Self::Anchor {
        element: Edge::Top,
        viewport: Edge::Top,
    };

    /// `"top bottom"`: the element's top enters at the bottom of the viewport.
    pub const TOP_BOTTOM: Self = Self::Anchor {
        element: Edge::Top,
        viewport: Edge::Bottom,
    };

    /// `"bottom top"`: the element's bottom leaves at the top of the viewport.
    pub const BOTTOM_TOP: Self = Self::Anchor {
        element: Edge::Bottom,
        viewport: Edge::Top,
    };

    /// Resolve to a document scroll offset.
    ///
    /// `element_top` is the element's top in (pin-spaced) document pixels.
    /// `origin` is what a [`Relative`](Self::Relative) position is measured
    /// from: the resolved start when resolving an end, and the element's
    /// `"top top"` offset when resolving a start.
    #[must_use]
    pub fn resolve(
        self,
        element_top: f64,
        element_height: f64,
        viewport_height: f64,
        origin: f64,
    ) -> f64 {
        match self {
            Self::Anchor { element, viewport } => {
                element_top + element.resolve(element_height) - viewport.resolve(viewport_height)
            }
            Self::Relative(Edge::Percent(p)) => origin + viewport_height * p / 100.0,
            Self::Relative(edge) => origin + edge.resolve(viewport_height),
        }
    }
}

impl FromStr for TriggerPosition {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| PositionParseError {
            input: s.to_string(),
            reason,
        };
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(err("empty position"));
        }

        for (prefix, sign) in [("+=", 1.0), ("-=", -1.0)] {
            if let Some(rest) = trimmed.strip_prefix(prefix) {
                let Length(edge) = Length::parse(rest.trim(), s)?;
                let signed = match edge {
                    Edge::Percent(p) => Edge::Percent(p * sign),
                    Edge::Pixels(px) => Edge::Pixels(px * sign),
                    _ => return Err(err("relative offsets take a length")),
                };
                return Ok(Self::Relative(signed));
            }
        }

        let mut tokens = trimmed.split_whitespace();
        let first = tokens.next().ok_or_else(|| err("empty position"))?;
        let second = tokens.next();
        if tokens.next().is_some() {
            return Err(err("expected at most two edges"));
        }
        let element = Edge::parse(first, s)?;
        let viewport = match second {
            Some(token) => Edge::parse(token, s)?,
            None => element,
        };
        Ok(Self::Anchor { element, viewport })
    }
}

impl fmt::Display for TriggerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anchor { element, viewport } => write!(f, "{element} {viewport}"),
            Self::Relative(Edge::Percent(p)) if *p < 0.0 => write!(f, "-={}%", -p),
            Self::Relative(Edge::Pixels(px)) if *px < 0.0 => write!(f, "-={}px", -px),
            Self::Relative(edge) => write!(f, "+={edge}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> TriggerPosition {
        s.parse().unwrap()
    }

    #[test]
    fn parses_named_anchor() {
        assert_eq!(parse("top top"), TriggerPosition::TOP_TOP);
        assert_eq!(parse("  top   bottom "), TriggerPosition::TOP_BOTTOM);
        assert_eq!(parse("bottom top"), TriggerPosition::BOTTOM_TOP);
    }

    #[test]
    fn single_token_repeats_edge() {
        assert_eq!(
            parse("center"),
            TriggerPosition::Anchor {
                element: Edge::Center,
                viewport: Edge::Center
            }
        );
    }

    #[test]
    fn parses_percent_viewport_edge() {
        assert_eq!(
            parse("top 80%"),
            TriggerPosition::Anchor {
                element: Edge::Top,
                viewport: Edge::Percent(80.0)
            }
        );
    }

    #[test]
    fn parses_relative_forms() {
        assert_eq!(parse("+=120%"), TriggerPosition::Relative(Edge::Percent(120.0)));
        assert_eq!(parse("+=300"), TriggerPosition::Relative(Edge::Pixels(300.0)));
        assert_eq!(parse("-=40px"), TriggerPosition::Relative(Edge::Pixels(-40.0)));
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<TriggerPosition>().is_err());
        assert!("top middle".parse::<TriggerPosition>().is_err());
        assert!("top top top".parse::<TriggerPosition>().is_err());
        assert!("+=wide".parse::<TriggerPosition>().is_err());
        let err = "sideways".parse::<TriggerPosition>().unwrap_err();
        assert_eq!(err.input, "sideways");
    }

    #[test]
    fn resolves_anchor_against_viewport() {
        // Element at 2000px, 600 tall; viewport 800. "top 80%" → 2000 - 640.
        let pos = parse("top 80%");
        assert_eq!(pos.resolve(2000.0, 600.0, 800.0, 0.0), 1360.0);
        assert_eq!(TriggerPosition::TOP_TOP.resolve(2000.0, 600.0, 800.0, 0.0), 2000.0);
        assert_eq!(TriggerPosition::BOTTOM_TOP.resolve(2000.0, 600.0, 800.0, 0.0), 2600.0);
    }

    #[test]
    fn resolves_relative_from_origin() {
        let pos = parse("+=120%");
        assert_eq!(pos.resolve(0.0, 800.0, 800.0, 500.0), 1460.0);
        assert_eq!(parse("-=100px").resolve(0.0, 0.0, 800.0, 500.0), 400.0);
    }

    #[test]
    fn display_round_trips() {
        for s in ["top top", "top 80%", "center center", "+=120%", "-=40px"] {
            assert_eq!(parse(s).to_string(), s);
        }
    }
}
