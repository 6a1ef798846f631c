// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Merge command-line overrides onto the persisted settings.

use std::path::PathBuf;

use pagebinder_core::{AppConfig, FitMode, LayoutOptions, Orientation, PageSize};

/// Settings the user may override for a single run. `None` keeps the value
/// from the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub page_size: Option<PageSize>,
    pub orientation: Option<Orientation>,
    pub margin_mm: Option<f64>,
    pub fit_mode: Option<FitMode>,
    pub file_name: Option<String>,
    pub no_page_numbers: bool,
    pub caption_font: Option<PathBuf>,
    pub jpeg_quality: Option<u8>,
}

impl Overrides {
    /// Apply the rendering overrides to `config` and return the layout for
    /// this run.
    pub fn apply(&self, config: &mut AppConfig) -> LayoutOptions {
        if let Some(font) = &self.caption_font {
            config.caption_font = Some(font.clone());
        }
        if let Some(quality) = self.jpeg_quality {
            config.jpeg_quality = quality;
        }

        let mut layout = config.default_layout.clone();
        if let Some(page_size) = self.page_size {
            layout.page_size = page_size;
        }
        if let Some(orientation) = self.orientation {
            layout.orientation = orientation;
        }
        if let Some(margin) = self.margin_mm {
            layout.margin_mm = margin;
        }
        if let Some(fit) = self.fit_mode {
            layout.fit_mode = fit;
        }
        if let Some(name) = &self.file_name {
            layout.file_name = Some(name.clone());
        }
        if self.no_page_numbers {
            layout.page_numbers = false;
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overrides_keeps_the_settings_layout() {
        let mut config = AppConfig::default();
        config.default_layout.page_size = PageSize::Letter;
        let before = config.clone();

        let layout = Overrides::default().apply(&mut config);

        assert_eq!(layout, before.default_layout);
        assert_eq!(config, before);
    }

    #[test]
    fn every_override_lands() {
        let mut config = AppConfig::default();
        let overrides = Overrides {
            page_size: Some(PageSize::Legal),
            orientation: Some(Orientation::Landscape),
            margin_mm: Some(0.0),
            fit_mode: Some(FitMode::Fill),
            file_name: Some("album".into()),
            no_page_numbers: true,
            caption_font: Some("/fonts/Sans.ttf".into()),
            jpeg_quality: Some(70),
        };

        let layout = overrides.apply(&mut config);

        assert_eq!(layout.page_size, PageSize::Legal);
        assert_eq!(layout.orientation, Orientation::Landscape);
        assert_eq!(layout.margin_mm, 0.0);
        assert_eq!(layout.fit_mode, FitMode::Fill);
        assert_eq!(layout.file_name.as_deref(), Some("album"));
        assert!(!layout.page_numbers);
        assert_eq!(config.caption_font, Some(PathBuf::from("/fonts/Sans.ttf")));
        assert_eq!(config.jpeg_quality, 70);
    }
}
