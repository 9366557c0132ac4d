//! Page layouts loaded from TOML.
//!
//! ```toml
//! viewport = 800.0
//!
//! [[section]]
//! name = "hero"
//! top = 0.0
//! height = 800.0
//! start = "top top"
//! end = "+=120%"
//! pin = true
//! scrub = 0.5
//! ```

use std::collections::HashSet;
use std::path::Path;

use ridgeline::{ElementBox, Scrub, SnapConfig, TriggerSpec};
use serde::{Deserialize, Serialize};

use crate::error::{DemoError, Result};

fn default_viewport() -> f64 {
    800.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    #[serde(default = "default_viewport")]
    pub viewport: f64,
    /// Document height before pin spacing. Defaults to the lowest section
    /// bottom.
    #[serde(default)]
    pub content_height: Option<f64>,
    /// Snap tunables; `--config` replaces them.
    #[serde(default)]
    pub config: SnapConfig,
    #[serde(rename = "section", default)]
    pub sections: Vec<SectionLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionLayout {
    pub name: String,
    pub top: f64,
    pub height: f64,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub pin: bool,
    #[serde(default)]
    pub once: bool,
    #[serde(default)]
    pub scrub: Option<ScrubSetting>,
}

/// `scrub = true` follows scroll exactly; `scrub = 0.4` lags 0.4 s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrubSetting {
    Flag(bool),
    Seconds(f64),
}

impl ScrubSetting {
    #[must_use]
    pub fn to_scrub(self) -> Option<Scrub> {
        match self {
            Self::Flag(false) => None,
            Self::Flag(true) => Some(Scrub::Immediate),
            Self::Seconds(s) if s > 0.0 => Some(Scrub::Smoothed(s)),
            Self::Seconds(_) => Some(Scrub::Immediate),
        }
    }
}

impl PageLayout {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let layout: Self = toml::from_str(s)?;
        layout.check()?;
        Ok(layout)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    fn check(&self) -> Result<()> {
        if !(self.viewport.is_finite() && self.viewport > 0.0) {
            return Err(DemoError::invalid(format!(
                "viewport must be positive, got {}",
                self.viewport
            )));
        }
        let mut seen = HashSet::new();
        for s in &self.sections {
            if !seen.insert(s.name.as_str()) {
                return Err(DemoError::invalid(format!("duplicate section {:?}", s.name)));
            }
            if !(s.top.is_finite() && s.height.is_finite() && s.height >= 0.0) {
                return Err(DemoError::invalid(format!(
                    "section {:?} needs a finite top and non-negative height",
                    s.name
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.content_height.unwrap_or_else(|| {
            self.sections
                .iter()
                .map(|s| s.top + s.height)
                .fold(0.0, f64::max)
        })
    }

    /// One labelled trigger per section, in file order.
    pub fn trigger_specs(&self) -> Result<Vec<TriggerSpec>> {
        self.sections.iter().map(SectionLayout::trigger_spec).collect()
    }
}

impl SectionLayout {
    pub fn trigger_spec(&self) -> Result<TriggerSpec> {
        let position_error = |source| DemoError::Position {
            section: self.name.clone(),
            source,
        };
        let mut spec = TriggerSpec::new(ElementBox::new(self.top, self.height))
            .pin(self.pin)
            .once(self.once)
            .label(self.name.clone());
        if let Some(start) = &self.start {
            spec = spec.start_at(start).map_err(position_error)?;
        }
        if let Some(end) = &self.end {
            spec = spec.end_at(end).map_err(position_error)?;
        }
        if let Some(scrub) = self.scrub.and_then(ScrubSetting::to_scrub) {
            spec = spec.scrub(scrub);
        }
        Ok(spec)
    }
}
