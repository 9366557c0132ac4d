#![forbid(unsafe_code)]

//! Pixel and fraction geometry for pinned page sections.
//!
//! A [`PinnedRegion`] is a section that holds the viewport in place over a
//! fixed pixel interval of the document scroll range. A [`NormalizedRange`]
//! is the same interval expressed as fractions of the maximum scroll offset.
//!
//! # Invariants
//!
//! 1. `PinnedRegion::end_offset >= PinnedRegion::start_offset` after
//!    construction (a reversed pair collapses to a zero-extent pin).
//! 2. For `max_scroll > 0`, every normalized range satisfies
//!    `0 <= start <= center <= end <= 1`.
//! 3. A set of normalized ranges is always produced from a single
//!    `max_scroll` snapshot.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One pinned section of the page, in document pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinnedRegion {
    start_offset: f64,
    end_offset: f64,
}

impl PinnedRegion {
    /// Create a region spanning `start_offset..=end_offset`.
    ///
    /// An `end_offset` below `start_offset` (or NaN) is treated as a pin with
    /// no extent of its own, so `end_offset == start_offset`.
    #[must_use]
    pub fn new(start_offset: f64, end_offset: f64) -> Self {
        let end_offset = if end_offset >= start_offset {
            end_offset
        } else {
            start_offset
        };
        Self {
            start_offset,
            end_offset,
        }
    }

    /// A pinned but unscrubbed section: it occupies a single scroll offset.
    #[must_use]
    pub fn point(offset: f64) -> Self {
        Self::new(offset, offset)
    }

    #[must_use]
    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    #[must_use]
    pub fn end_offset(&self) -> f64 {
        self.end_offset
    }

    /// Pixel length of the pinned interval.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.end_offset - self.start_offset
    }

    /// Midpoint of the pinned interval, in pixels.
    #[must_use]
    pub fn center(&self) -> f64 {
        self.start_offset + self.extent() / 2.0
    }

    /// Express this region as fractions of `max_scroll`.
    ///
    /// Returns `None` when `max_scroll` is not a positive finite number or
    /// either offset is not finite. Offsets beyond the scroll range are
    /// clamped into `[0, 1]`.
    #[must_use]
    pub fn normalize(&self, max_scroll: f64) -> Option<NormalizedRange> {
        if !(max_scroll.is_finite() && max_scroll > 0.0) {
            return None;
        }
        if !(self.start_offset.is_finite() && self.end_offset.is_finite()) {
            return None;
        }
        let start = (self.start_offset / max_scroll).clamp(0.0, 1.0);
        let end = (self.end_offset / max_scroll).clamp(start, 1.0);
        let center = ((self.start_offset + self.extent() * 0.5) / max_scroll).clamp(start, end);
        Some(NormalizedRange { start, end, center })
    }
}

/// A pinned region as fractions of the maximum scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalizedRange {
    pub start: f64,
    pub end: f64,
    pub center: f64,
}

impl NormalizedRange {
    /// Build a range directly from fractions.
    ///
    /// Used where ranges are already known in fraction space (tests, replayed
    /// layouts). `end` is raised to `start` if it falls below it, and the
    /// center is the midpoint.
    #[must_use]
    pub fn from_fractions(start: f64, end: f64) -> Self {
        let end = if end >= start { end } else { start };
        Self {
            start,
            end,
            center: start + (end - start) * 0.5,
        }
    }

    /// Whether `value` lies within this range widened by `buffer` on both
    /// sides. Both edges are inclusive.
    #[must_use]
    #[inline]
    pub fn contains_buffered(&self, value: f64, buffer: f64) -> bool {
        value >= self.start - buffer && value <= self.end + buffer
    }
}
