#![forbid(unsafe_code)]

//! Scroll trigger definitions and their resolved pixel form.

use std::fmt;

use bitflags::bitflags;
use ridgeline_core::PinnedRegion;

use crate::position::{PositionParseError, TriggerPosition};

/// Opaque handle for a registered trigger. Ids are never reused within one
/// observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(pub(crate) u64);

impl TriggerId {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Behavior switches for a trigger.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TriggerFlags: u8 {
        /// Hold the element in the viewport between start and end, pushing
        /// later content down by the same distance.
        const PIN  = 0b0001;
        /// Fire `Enter` once, then unregister.
        const ONCE = 0b0010;
    }
}

/// How trigger progress follows the scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scrub {
    /// Progress tracks the scroll position exactly.
    Immediate,
    /// Progress catches up with the scroll position over this many seconds.
    Smoothed(f64),
}

/// An element's box in document pixels, before any pin spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBox {
    pub top: f64,
    pub height: f64,
}

impl ElementBox {
    #[must_use]
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Everything needed to register a trigger (builder pattern).
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerSpec {
    pub(crate) element: ElementBox,
    pub(crate) start: TriggerPosition,
    pub(crate) end: TriggerPosition,
    pub(crate) flags: TriggerFlags,
    pub(crate) scrub: Option<Scrub>,
    pub(crate) label: Option<String>,
}

impl TriggerSpec {
    /// A trigger on `element` with the default `"top bottom"` start and
    /// `"bottom top"` end.
    #[must_use]
    pub fn new(element: ElementBox) -> Self {
        Self {
            element,
            start: TriggerPosition::TOP_BOTTOM,
            end: TriggerPosition::BOTTOM_TOP,
            flags: TriggerFlags::empty(),
            scrub: None,
            label: None,
        }
    }

    #[must_use]
    pub fn start(mut self, start: TriggerPosition) -> Self {
        self.start = start;
        self
    }

    #[must_use]
    pub fn end(mut self, end: TriggerPosition) -> Self {
        self.end = end;
        self
    }

    /// Parse and set the start position, e.g. `"top 80%"`.
    pub fn start_at(self, spec: &str) -> Result<Self, PositionParseError> {
        Ok(self.start(spec.parse()?))
    }

    /// Parse and set the end position, e.g. `"+=120%"`.
    pub fn end_at(self, spec: &str) -> Result<Self, PositionParseError> {
        Ok(self.end(spec.parse()?))
    }

    #[must_use]
    pub fn pin(mut self, pin: bool) -> Self {
        self.flags.set(TriggerFlags::PIN, pin);
        self
    }

    #[must_use]
    pub fn once(mut self, once: bool) -> Self {
        self.flags.set(TriggerFlags::ONCE, once);
        self
    }

    #[must_use]
    pub fn scrub(mut self, scrub: Scrub) -> Self {
        self.scrub = Some(scrub);
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn element(&self) -> ElementBox {
        self.element
    }

    #[must_use]
    pub fn flags(&self) -> TriggerFlags {
        self.flags
    }

    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.flags.contains(TriggerFlags::PIN)
    }

    #[must_use]
    pub fn label_str(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn scrub_mode(&self) -> Option<Scrub> {
        self.scrub
    }
}

/// A trigger's start and end in document scroll pixels after layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTrigger {
    pub start: f64,
    pub end: f64,
    /// The element's top after pin spacing from earlier pins.
    pub element_top: f64,
}

impl ResolvedTrigger {
    /// Pixel distance the page is held for when this trigger pins.
    #[must_use]
    pub fn pin_spacing(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Raw progress at scroll offset `y`, clamped to `[0, 1]`.
    ///
    /// A zero-length trigger jumps from 0 to 1 at its start.
    #[must_use]
    pub fn progress(&self, y: f64) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if y >= self.start { 1.0 } else { 0.0 };
        }
        ((y - self.start) / span).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn region(&self) -> PinnedRegion {
        PinnedRegion::new(self.start, self.end)
    }

    pub(crate) fn zone(&self, y: f64) -> Zone {
        if y < self.start {
            Zone::Before
        } else if y > self.end {
            Zone::After
        } else {
            Zone::Active
        }
    }
}

/// Where the scroll position sits relative to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Zone {
    Before,
    Active,
    After,
}

/// Crossing a trigger boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerEventKind {
    /// Scrolling forward past the start.
    Enter,
    /// Scrolling forward past the end.
    Leave,
    /// Scrolling backward past the end.
    EnterBack,
    /// Scrolling backward past the start.
    LeaveBack,
}

impl TriggerEventKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Leave => "leave",
            Self::EnterBack => "enter-back",
            Self::LeaveBack => "leave-back",
        }
    }
}

impl fmt::Display for TriggerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One boundary crossing, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    pub id: TriggerId,
    pub kind: TriggerEventKind,
    pub label: Option<String>,
}

/// Events for moving from zone `from` to zone `to`.
pub(crate) fn crossings(from: Zone, to: Zone) -> &'static [TriggerEventKind] {
    use TriggerEventKind::{Enter, EnterBack, Leave, LeaveBack};
    match (from, to) {
        (Zone::Before, Zone::Active) => &[Enter],
        (Zone::Before, Zone::After) => &[Enter, Leave],
        (Zone::Active, Zone::After) => &[Leave],
        (Zone::Active, Zone::Before) => &[LeaveBack],
        (Zone::After, Zone::Active) => &[EnterBack],
        (Zone::After, Zone::Before) => &[EnterBack, LeaveBack],
        _ => &[],
    }
}
