// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page geometry: page pixel size, content area and image placement.
//
// Everything is expressed in CSS-style device pixels at 96 DPI. Page sizes come
// from a fixed lookup table; margins arrive in millimetres and are converted
// exactly (no rounding) so placement stays centred to sub-pixel precision.

use pagebinder_core::error::{PagebinderError, Result};
use pagebinder_core::{FitMode, LayoutOptions, Orientation, PageSize};
use tracing::debug;

/// Device pixels per inch assumed for every page.
pub const PIXELS_PER_INCH: f64 = 96.0;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Convert millimetres to device pixels at 96 DPI.
pub fn mm_to_px(mm: f64) -> f64 {
    mm * PIXELS_PER_INCH / MM_PER_INCH
}

/// Page and content-area dimensions for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width in whole pixels.
    pub page_width: u32,
    /// Page height in whole pixels.
    pub page_height: u32,
    /// Margin on every side, in pixels.
    pub margin: f64,
    /// Page width minus both margins.
    pub content_width: f64,
    /// Page height minus both margins.
    pub content_height: f64,
}

/// Where an image lands on the page, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Resolve page and content-area dimensions.
///
/// Fails with a configuration error if the margin is negative, non-finite, or
/// so large that no content area remains.
pub fn resolve_page(
    page_size: PageSize,
    orientation: Orientation,
    margin_mm: f64,
) -> Result<PageGeometry> {
    if !margin_mm.is_finite() || margin_mm < 0.0 {
        return Err(PagebinderError::Configuration(format!(
            "margin must be a non-negative number of millimetres, got {margin_mm}"
        )));
    }

    let (mut page_width, mut page_height) = page_size.pixel_dimensions();
    if orientation == Orientation::Landscape {
        std::mem::swap(&mut page_width, &mut page_height);
    }

    let margin = mm_to_px(margin_mm);
    let smaller = page_width.min(page_height) as f64;
    if margin * 2.0 >= smaller {
        return Err(PagebinderError::Configuration(format!(
            "margin of {margin_mm} mm leaves no content area on a {page_size} page"
        )));
    }

    let geometry = PageGeometry {
        page_width,
        page_height,
        margin,
        content_width: page_width as f64 - 2.0 * margin,
        content_height: page_height as f64 - 2.0 * margin,
    };
    debug!(?geometry, "Page geometry resolved");
    Ok(geometry)
}

/// Resolve page geometry straight from a layout snapshot.
pub fn resolve_options(options: &LayoutOptions) -> Result<PageGeometry> {
    resolve_page(options.page_size, options.orientation, options.margin_mm)
}

/// Size and centre an image of `image_width` x `image_height` pixels within the
/// content area according to `fit_mode`.
///
/// Image dimensions must be non-zero; the decoder rejects empty images before
/// they reach this point.
pub fn resolve_placement(
    fit_mode: FitMode,
    page: &PageGeometry,
    image_width: u32,
    image_height: u32,
) -> Placement {
    let (content_w, content_h) = (page.content_width, page.content_height);
    let (img_w, img_h) = (image_width as f64, image_height as f64);

    let (width, height) = match fit_mode {
        FitMode::Fit => scale_to_fit(content_w, content_h, img_w, img_h),
        FitMode::Fill => (content_w, content_h),
        FitMode::Original => {
            if img_w > content_w || img_h > content_h {
                scale_to_fit(content_w, content_h, img_w, img_h)
            } else {
                (img_w, img_h)
            }
        }
    };

    Placement {
        x: page.margin + (content_w - width) / 2.0,
        y: page.margin + (content_h - height) / 2.0,
        width,
        height,
    }
}

fn scale_to_fit(content_w: f64, content_h: f64, img_w: f64, img_h: f64) -> (f64, f64) {
    let ratio = (content_w / img_w).min(content_h / img_h);
    (img_w * ratio, img_h * ratio)
}
