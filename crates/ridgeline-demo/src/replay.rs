//! Replaying gestures against a laid-out page.

use std::fmt::Write as _;

use ridgeline::{
    InstallOutcome, Page, ReadinessEvent, SnapConfig, SnapDecision, TriggerEvent, TriggerId,
};
use serde::Serialize;
use web_time::{Duration, Instant};

use crate::error::Result;
use crate::layout::PageLayout;

/// Frame step used to run snap transitions to completion.
const FRAME: Duration = Duration::from_millis(16);
/// Frames after which a transition is reported as unsettled.
const MAX_FRAMES: usize = 1000;

/// How the page learns that snapping may be installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Activation {
    /// The host sends both readiness events.
    #[default]
    Events,
    /// The host stays silent; the timer fallback installs.
    Fallback,
}

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub viewport: Option<f64>,
    pub gestures: Vec<f64>,
    pub activation: Activation,
    /// Wait for fallback deadlines on the wall clock instead of jumping.
    pub realtime: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub viewport: f64,
    pub content_height: f64,
    pub pin_spacing: f64,
    pub max_scroll: f64,
    pub activation: String,
    pub sections: Vec<SectionReport>,
    pub gestures: Vec<GestureReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionReport {
    pub name: String,
    pub start: f64,
    pub end: f64,
    pub pinned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureReport {
    pub release_y: f64,
    pub release_fraction: f64,
    /// Pinned section snapped to, or `None` for free scroll.
    pub snapped_to: Option<String>,
    pub target_fraction: f64,
    pub duration_ms: Option<u64>,
    pub settled_y: f64,
    pub header_compact: bool,
    pub events: Vec<EventReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventReport {
    pub section: String,
    pub kind: String,
}

impl From<&TriggerEvent> for EventReport {
    fn from(e: &TriggerEvent) -> Self {
        Self {
            section: e.label.clone().unwrap_or_else(|| e.id.to_string()),
            kind: e.kind.to_string(),
        }
    }
}

pub fn replay(layout: &PageLayout, config: SnapConfig, opts: &ReplayOptions) -> Result<Report> {
    let viewport = opts.viewport.unwrap_or(layout.viewport);
    let content_height = layout.content_height();
    let specs = layout.trigger_specs()?;

    let t0 = Instant::now();
    let mut page = Page::mount_at(config, t0);
    if opts.activation == Activation::Events {
        page.notify(ReadinessEvent::EngineLoaded);
    }

    let ids: Vec<(TriggerId, String)> = specs
        .into_iter()
        .zip(&layout.sections)
        .map(|(spec, section)| (page.register(spec), section.name.clone()))
        .collect();
    page.refresh(viewport, content_height);

    let outcome = match opts.activation {
        Activation::Events => page.notify(ReadinessEvent::RegistrationComplete),
        Activation::Fallback => run_fallback(&mut page, t0, opts.realtime),
    };
    tracing::info!(target: "ridgeline.demo", outcome = outcome.as_str(), "activation finished");

    let sections = section_reports(&page, &ids);
    let mut pinned: Vec<&SectionReport> = sections.iter().filter(|s| s.pinned).collect();
    pinned.sort_by(|a, b| a.start.total_cmp(&b.start));
    let pinned_names: Vec<String> = pinned.into_iter().map(|s| s.name.clone()).collect();

    let gestures = opts
        .gestures
        .iter()
        .map(|&y| run_gesture(&mut page, y, &pinned_names))
        .collect();

    Ok(Report {
        viewport,
        content_height,
        pin_spacing: page.observer().pin_spacing(),
        max_scroll: page.observer().max_scroll(),
        activation: outcome.to_string(),
        sections,
        gestures,
    })
}

fn run_fallback(page: &mut Page, t0: Instant, realtime: bool) -> InstallOutcome {
    let token = page.cancellation_token();
    let mut last = InstallOutcome::RegistrationPending;
    while let Some(deadline) = page.next_deadline() {
        let now = if realtime {
            if token.wait_until(deadline) {
                return InstallOutcome::TornDown;
            }
            Instant::now().max(deadline)
        } else {
            deadline
        };
        tracing::debug!(
            target: "ridgeline.demo",
            elapsed_ms = now.saturating_duration_since(t0).as_millis() as u64,
            "fallback poll"
        );
        if let Some(outcome) = page.poll(now) {
            last = outcome;
        }
    }
    last
}

fn section_reports(page: &Page, ids: &[(TriggerId, String)]) -> Vec<SectionReport> {
    let obs = page.observer();
    ids.iter()
        .filter_map(|(id, name)| {
            let r = obs.resolved(*id)?;
            let pinned = obs.spec(*id).is_some_and(|s| s.is_pinned());
            Some(SectionReport {
                name: name.clone(),
                start: r.start,
                end: r.end,
                pinned,
            })
        })
        .collect()
}

fn run_gesture(page: &mut Page, y: f64, pinned_names: &[String]) -> GestureReport {
    let mut events: Vec<EventReport> = page.scroll_to(y).iter().map(EventReport::from).collect();
    let release_y = page.observer().scroll_y();
    let release_fraction = page.observer().scroll_fraction();

    let decision = page.end_gesture();
    let duration_ms = page
        .observer()
        .transition()
        .map(|t| t.duration().as_millis() as u64);

    let mut frames = 0;
    while page.observer().is_snapping() && frames < MAX_FRAMES {
        events.extend(page.tick(FRAME).iter().map(EventReport::from));
        frames += 1;
    }

    let snapped_to = match decision {
        SnapDecision::Snapped { index, .. } => pinned_names.get(index).cloned(),
        SnapDecision::Free { .. } => None,
    };
    GestureReport {
        release_y,
        release_fraction,
        snapped_to,
        target_fraction: decision.target(),
        duration_ms,
        settled_y: page.observer().scroll_y(),
        header_compact: page.is_scrolled(),
        events,
    }
}

/// Human-readable summary.
#[must_use]
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "viewport {:.0}px  content {:.0}px  pin spacing {:.0}px  max scroll {:.0}px",
        report.viewport, report.content_height, report.pin_spacing, report.max_scroll
    );
    let _ = writeln!(out, "activation: {}", report.activation);
    for s in &report.sections {
        let pin = if s.pinned { " [pinned]" } else { "" };
        let _ = writeln!(out, "  {:<16} {:>7.0} .. {:>7.0}{pin}", s.name, s.start, s.end);
    }
    for g in &report.gestures {
        let target = match &g.snapped_to {
            Some(name) => format!("snap to {name} ({:.3})", g.target_fraction),
            None => "free".to_string(),
        };
        let timing = g
            .duration_ms
            .map_or_else(String::new, |ms| format!(" in {ms}ms"));
        let _ = writeln!(
            out,
            "gesture y={:.0} ({:.3}) -> {target}{timing}, settled at y={:.0}",
            g.release_y, g.release_fraction, g.settled_y
        );
        for e in &g.events {
            let _ = writeln!(out, "    {} {}", e.section, e.kind);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PageLayout {
        PageLayout::from_toml_str(include_str!("../layouts/karakoram.toml")).unwrap()
    }

    fn opts(gestures: &[f64]) -> ReplayOptions {
        ReplayOptions {
            gestures: gestures.to_vec(),
            ..ReplayOptions::default()
        }
    }

    #[test]
    fn karakoram_layout_geometry() {
        let report = replay(&layout(), SnapConfig::default(), &opts(&[])).unwrap();
        assert_eq!(report.pin_spacing, 2840.0);
        assert_eq!(report.max_scroll, 7440.0);
        assert_eq!(report.activation, "installed (3 regions)");
        let split = report.sections.iter().find(|s| s.name == "split").unwrap();
        assert_eq!((split.start, split.end), (3520.0, 4440.0));
    }

    #[test]
    fn gestures_snap_or_flow() {
        let report =
            replay(&layout(), SnapConfig::default(), &opts(&[900.0, 1400.0, 2000.0, 6000.0]))
                .unwrap();
        let g = &report.gestures;
        assert_eq!(g[0].snapped_to.as_deref(), Some("hero"));
        assert!((g[0].settled_y - 480.0).abs() < 1e-6);
        assert_eq!(g[1].snapped_to, None);
        assert_eq!(g[1].settled_y, 1400.0);
        assert_eq!(g[2].snapped_to.as_deref(), Some("summit-mission"));
        assert!((g[2].settled_y - 2240.0).abs() < 1e-6);
        assert_eq!(g[3].snapped_to, None);
        assert!(g[3].header_compact);
    }

    #[test]
    fn fallback_activation_matches_events() {
        let fallback = ReplayOptions {
            activation: Activation::Fallback,
            ..opts(&[900.0])
        };
        let a = replay(&layout(), SnapConfig::default(), &fallback).unwrap();
        let b = replay(&layout(), SnapConfig::default(), &opts(&[900.0])).unwrap();
        assert_eq!(a.gestures, b.gestures);
        assert_eq!(a.activation, b.activation);
    }

    #[test]
    fn text_report_lists_gestures() {
        let report = replay(&layout(), SnapConfig::default(), &opts(&[900.0])).unwrap();
        let text = render_text(&report);
        assert!(text.contains("activation: installed (3 regions)"));
        assert!(text.contains("-> snap to hero"));
        assert!(text.contains("split"));
    }
}
