// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PagebinderError, Result};
use crate::types::LayoutOptions;

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Layout used when the caller does not override it.
    pub default_layout: LayoutOptions,
    /// JPEG quality (1-100) for rendered pages.
    pub jpeg_quality: u8,
    /// TrueType font for page numbers. System locations are searched when unset.
    pub caption_font: Option<PathBuf>,
    /// Caption font size in pixels.
    pub caption_size_px: f32,
    /// Distance from the bottom edge of the page to the caption baseline.
    pub caption_baseline_offset_px: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_layout: LayoutOptions::default(),
            jpeg_quality: 90,
            caption_font: None,
            caption_size_px: 20.0,
            caption_baseline_offset_px: 30,
        }
    }
}

impl AppConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Write settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject values no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(PagebinderError::Configuration(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        if !(self.caption_size_px.is_finite() && self.caption_size_px > 0.0) {
            return Err(PagebinderError::Configuration(format!(
                "caption_size_px must be positive, got {}",
                self.caption_size_px
            )));
        }
        Ok(())
    }
}
