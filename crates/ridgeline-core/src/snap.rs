#![forbid(unsafe_code)]

//! Nearest-center snapping over pinned ranges.
//!
//! Given the scroll position as a fraction of the maximum scroll offset,
//! [`snap_to`] decides whether the viewport should settle on the center of a
//! pinned section or be left where the user put it.
//!
//! # Rules
//!
//! - No ranges, or `value` outside every `[start - buffer, end + buffer]`:
//!   the value is returned unchanged (free scroll through flowing content).
//! - Otherwise the center closest to `value` across **all** ranges wins, not
//!   only the range that contains `value`.
//! - Ties keep the earliest range in ascending-`start` order. This falls out
//!   of a strict `<` comparison in the scan and is not a promised contract
//!   for equidistant, distinct centers.
//!
//! The scan is linear. Pages carry a handful of pinned sections, so there is
//! nothing to index.

use smallvec::SmallVec;

use crate::geometry::{NormalizedRange, PinnedRegion};

/// Tolerance added to both edges of every pinned range, as a fraction of
/// the maximum scroll offset.
pub const SNAP_BUFFER: f64 = 0.02;

/// Inline capacity for pinned ranges; pages rarely pin more than this.
const INLINE_RANGES: usize = 16;

/// Map `value` to its snap target.
///
/// `ranges` must be sorted by ascending `start` for the tie-break to be
/// meaningful; [`SnapRanges`] guarantees this.
#[must_use]
pub fn snap_to(value: f64, ranges: &[NormalizedRange], buffer: f64) -> f64 {
    match nearest_pinned(value, ranges, buffer) {
        Some(index) => ranges[index].center,
        None => value,
    }
}

/// Index of the range whose center should receive `value`, or `None` when
/// `value` is in free-scroll territory.
#[must_use]
pub fn nearest_pinned(value: f64, ranges: &[NormalizedRange], buffer: f64) -> Option<usize> {
    let first = ranges.first()?;
    if !ranges.iter().any(|r| r.contains_buffered(value, buffer)) {
        return None;
    }

    let mut best = 0;
    let mut best_distance = (first.center - value).abs();
    for (i, r) in ranges.iter().enumerate().skip(1) {
        let distance = (r.center - value).abs();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    Some(best)
}

/// Outcome of one snap evaluation, for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapDecision {
    /// Outside every buffered range; scroll stays where it is.
    Free { value: f64 },
    /// Inside at least one buffered range; settle on `target`.
    Snapped {
        value: f64,
        /// Index into the sorted ranges.
        index: usize,
        target: f64,
    },
}

impl SnapDecision {
    /// The scroll fraction the viewport should end at.
    #[must_use]
    pub fn target(&self) -> f64 {
        match *self {
            Self::Free { value } => value,
            Self::Snapped { target, .. } => target,
        }
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        matches!(self, Self::Free { .. })
    }
}

/// An ordered set of pinned ranges sharing one `max_scroll` snapshot.
///
/// This is the mapping installed as the snap policy of a scroll observer.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapRanges {
    ranges: SmallVec<[NormalizedRange; INLINE_RANGES]>,
    buffer: f64,
}

impl SnapRanges {
    /// Normalize `regions` against `max_scroll` and sort them by start.
    ///
    /// Returns `None` when there is nothing to snap to: `max_scroll` is zero,
    /// negative or not finite, or no region survives normalization. Callers
    /// treat `None` as "leave scrolling free".
    #[must_use]
    pub fn from_regions(regions: &[PinnedRegion], max_scroll: f64, buffer: f64) -> Option<Self> {
        let mut ranges: SmallVec<[NormalizedRange; INLINE_RANGES]> = regions
            .iter()
            .filter_map(|r| r.normalize(max_scroll))
            .collect();
        if ranges.is_empty() {
            return None;
        }
        // Stable, so regions sharing a start keep their registration order.
        ranges.sort_by(|a, b| a.start.total_cmp(&b.start));
        Some(Self {
            ranges,
            buffer: buffer.max(0.0),
        })
    }

    /// Build directly from fraction-space ranges (sorted here).
    ///
    /// Returns `None` for an empty input.
    #[must_use]
    pub fn from_ranges(ranges: impl IntoIterator<Item = NormalizedRange>, buffer: f64) -> Option<Self> {
        let mut ranges: SmallVec<[NormalizedRange; INLINE_RANGES]> = ranges.into_iter().collect();
        if ranges.is_empty() {
            return None;
        }
        ranges.sort_by(|a, b| a.start.total_cmp(&b.start));
        Some(Self {
            ranges,
            buffer: buffer.max(0.0),
        })
    }

    /// Snap target for `value`. See the module docs for the rules.
    #[must_use]
    #[inline]
    pub fn snap_to(&self, value: f64) -> f64 {
        snap_to(value, &self.ranges, self.buffer)
    }

    /// Full decision for `value`, including which range won.
    #[must_use]
    pub fn decide(&self, value: f64) -> SnapDecision {
        match nearest_pinned(value, &self.ranges, self.buffer) {
            Some(index) => SnapDecision::Snapped {
                value,
                index,
                target: self.ranges[index].center,
            },
            None => SnapDecision::Free { value },
        }
    }

    /// Whether `value` falls inside any buffered pinned range.
    #[must_use]
    pub fn in_pinned(&self, value: f64) -> bool {
        self.ranges
            .iter()
            .any(|r| r.contains_buffered(value, self.buffer))
    }

    #[must_use]
    pub fn ranges(&self) -> &[NormalizedRange] {
        &self.ranges
    }

    #[must_use]
    pub fn buffer(&self) -> f64 {
        self.buffer
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-3;

    fn scenario() -> SnapRanges {
        let regions = [
            PinnedRegion::new(0.0, 800.0),
            PinnedRegion::point(1000.0),
            PinnedRegion::new(1400.0, 2200.0),
        ];
        SnapRanges::from_regions(&regions, 2400.0, SNAP_BUFFER).unwrap()
    }

    #[test]
    fn empty_ranges_pass_through() {
        for v in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(snap_to(v, &[], SNAP_BUFFER), v);
        }
    }

    #[test]
    fn outside_all_buffers_is_identity() {
        let ranges = [NormalizedRange::from_fractions(0.4, 0.5)];
        assert_eq!(snap_to(0.2, &ranges, SNAP_BUFFER), 0.2);
        assert_eq!(snap_to(0.9, &ranges, SNAP_BUFFER), 0.9);
    }

    #[test]
    fn nearest_center_wins_over_containing_range() {
        let ranges = [
            NormalizedRange::from_fractions(0.0, 0.2),
            NormalizedRange::from_fractions(0.25, 0.75),
            NormalizedRange::from_fractions(0.8, 1.0),
        ];
        assert_eq!(snap_to(0.52, &ranges, SNAP_BUFFER), 0.5);
    }

    #[test]
    fn center_of_another_range_can_win() {
        // 0.59 sits inside the wide range, but the point pin at 0.6 is closer.
        let ranges = [
            NormalizedRange::from_fractions(0.0, 0.6),
            NormalizedRange::from_fractions(0.6, 0.6),
        ];
        assert_eq!(snap_to(0.59, &ranges, SNAP_BUFFER), 0.6);
    }

    #[test]
    fn buffered_lower_edge() {
        let ranges = [NormalizedRange::from_fractions(0.40, 0.40)];
        assert_eq!(snap_to(0.385, &ranges, 0.02), 0.40);
        assert_eq!(snap_to(0.37, &ranges, 0.02), 0.37);
    }

    #[test]
    fn equal_centers_return_first() {
        let ranges = [
            NormalizedRange::from_fractions(0.25, 0.75),
            NormalizedRange::from_fractions(0.5, 0.5),
        ];
        assert_eq!(nearest_pinned(0.5, &ranges, SNAP_BUFFER), Some(0));
        assert_eq!(snap_to(0.5, &ranges, SNAP_BUFFER), 0.5);
    }

    #[test]
    fn equidistant_centers_keep_earliest() {
        let ranges = [
            NormalizedRange::from_fractions(0.25, 0.25),
            NormalizedRange::from_fractions(0.75, 0.75),
            NormalizedRange::from_fractions(0.0, 1.0),
        ];
        let sorted = SnapRanges::from_ranges(ranges, SNAP_BUFFER).unwrap();
        // Sorted order: [0.0..1.0] (c=0.5), 0.25, 0.75. Value 0.5 hits c=0.5 exactly.
        assert_eq!(sorted.snap_to(0.5), 0.5);
        // Value 0.375: 0.25 and 0.5 are both 0.125 away; 0.5 comes first.
        assert_eq!(sorted.decide(0.375).target(), 0.5);
    }

    #[test]
    fn scenario_targets() {
        let snap = scenario();
        assert!((snap.snap_to(0.2) - 0.167).abs() < EPS);
        assert!((snap.snap_to(0.43) - 0.417).abs() < EPS);
        assert_eq!(snap.snap_to(0.95), 0.95);
    }

    #[test]
    fn gap_past_point_pin_buffer_is_free() {
        // R2 sits at 1000/2400; its buffered interval ends near 0.4367, so
        // 0.45 lies in flowing content between R2 and R3.
        let snap = scenario();
        assert_eq!(snap.snap_to(0.45), 0.45);
    }

    #[test]
    fn idempotent_on_scenario() {
        let snap = scenario();
        for i in 0..=100 {
            let x = f64::from(i) / 100.0;
            let once = snap.snap_to(x);
            assert_eq!(snap.snap_to(once), once, "x={x}");
        }
    }

    #[test]
    fn from_regions_sorts_by_start() {
        let regions = [PinnedRegion::new(1400.0, 2200.0), PinnedRegion::new(0.0, 800.0)];
        let snap = SnapRanges::from_regions(&regions, 2400.0, SNAP_BUFFER).unwrap();
        assert_eq!(snap.ranges()[0].start, 0.0);
        assert!(snap.ranges()[1].start > 0.5);
    }

    #[test]
    fn pixel_and_fraction_constructors_agree() {
        let from_pixels = SnapRanges::from_regions(
            &[PinnedRegion::new(800.0, 1200.0), PinnedRegion::new(0.0, 800.0)],
            1600.0,
            SNAP_BUFFER,
        )
        .unwrap();
        let from_fractions = SnapRanges::from_ranges(
            [
                NormalizedRange::from_fractions(0.0, 0.5),
                NormalizedRange::from_fractions(0.5, 0.75),
            ],
            SNAP_BUFFER,
        )
        .unwrap();
        assert_eq!(from_pixels, from_fractions);
    }

    #[test]
    fn from_regions_none_without_scroll_or_regions() {
        assert!(SnapRanges::from_regions(&[], 2400.0, SNAP_BUFFER).is_none());
        assert!(
            SnapRanges::from_regions(&[PinnedRegion::point(0.0)], 0.0, SNAP_BUFFER).is_none()
        );
    }

    #[test]
    fn decide_reports_index() {
        let snap = scenario();
        match snap.decide(0.43) {
            SnapDecision::Snapped { index, .. } => assert_eq!(index, 1),
            other => panic!("expected snap, got {other:?}"),
        }
        assert!(snap.decide(0.95).is_free());
        assert!(!snap.in_pinned(0.95));
        assert!(snap.in_pinned(0.93));
    }
}
