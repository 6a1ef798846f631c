// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page renderer: composites one decoded image onto a white page surface and
// optionally stamps a "Page n of N" caption, using `image` and `imageproc`.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use pagebinder_core::AppConfig;
use pagebinder_core::error::{PagebinderError, Result};
use tracing::{debug, info, instrument, warn};

use crate::layout::{PageGeometry, Placement};
use crate::pipeline::{PageNumber, PageRasterizer};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Well-known locations of a plain sans-serif TrueType font.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// The single font used for page-number captions.
pub struct CaptionFont {
    font: FontVec,
    source: Option<PathBuf>,
}

impl CaptionFont {
    /// Parse a TrueType/OpenType font from memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data)
            .map_err(|err| PagebinderError::Font(format!("invalid font data: {}", err)))?;
        Ok(Self { font, source: None })
    }

    /// Load a font file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|err| {
            PagebinderError::Font(format!("cannot read {}: {}", path.display(), err))
        })?;
        let mut font = Self::from_bytes(data)?;
        font.source = Some(path.to_path_buf());
        Ok(font)
    }

    /// Search the usual system font locations.
    pub fn discover() -> Option<Self> {
        SYSTEM_FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .filter(|path| path.is_file())
            .find_map(|path| match Self::load(path) {
                Ok(font) => Some(font),
                Err(err) => {
                    warn!(%err, "Skipping unusable system font");
                    None
                }
            })
    }

    /// Where the font was loaded from, if it came from a file.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct CaptionStyle {
    font: CaptionFont,
    scale: PxScale,
    baseline_offset: u32,
}

/// Renders pages onto an in-memory RGBA surface.
///
/// Construct with [`RasterRenderer::new`] for caption-less output or
/// [`RasterRenderer::with_caption`] when page numbers may be requested.
#[derive(Debug, Default)]
pub struct RasterRenderer {
    caption: Option<CaptionStyle>,
}

impl RasterRenderer {
    /// A renderer that cannot draw page numbers.
    pub fn new() -> Self {
        Self { caption: None }
    }

    /// A renderer that draws captions at `size_px`, with the baseline
    /// `baseline_offset` pixels above the bottom edge.
    pub fn with_caption(font: CaptionFont, size_px: f32, baseline_offset: u32) -> Self {
        Self {
            caption: Some(CaptionStyle {
                font,
                scale: PxScale::from(size_px),
                baseline_offset,
            }),
        }
    }

    /// Build a renderer from application settings.
    ///
    /// An explicitly configured font must load. Without one the system font
    /// locations are searched, and a renderer without caption support is
    /// returned when nothing is found.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let font = match &config.caption_font {
            Some(path) => Some(CaptionFont::load(path)?),
            None => CaptionFont::discover(),
        };
        match font {
            Some(font) => {
                info!(source = ?font.source(), "Caption font loaded");
                Ok(Self::with_caption(
                    font,
                    config.caption_size_px,
                    config.caption_baseline_offset_px,
                ))
            }
            None => {
                warn!("No caption font found; page numbers are unavailable");
                Ok(Self::new())
            }
        }
    }

    fn draw_caption(&self, canvas: &mut RgbaImage, page_number: PageNumber) -> Result<()> {
        let style = self.caption.as_ref().ok_or_else(|| {
            PagebinderError::Render("page numbers requested but no caption font is loaded".into())
        })?;

        let text = page_number.caption();
        let (text_width, _) = text_size(style.scale, &style.font.font, &text);
        let ascent = style.font.font.as_scaled(style.scale).ascent();

        let x = (canvas.width() as i32 - text_width as i32) / 2;
        let baseline = canvas.height() as f32 - style.baseline_offset as f32;
        let top = (baseline - ascent).round() as i32;

        draw_text_mut(canvas, BLACK, x, top, style.scale, &style.font.font, &text);
        debug!(%text, x, top, "Caption drawn");
        Ok(())
    }
}

impl PageRasterizer for RasterRenderer {
    fn supports_captions(&self) -> bool {
        self.caption.is_some()
    }

    #[instrument(skip(self, image, page), fields(page_width = page.page_width, page_height = page.page_height))]
    fn render_page(
        &self,
        image: &DynamicImage,
        placement: &Placement,
        page: &PageGeometry,
        page_number: Option<PageNumber>,
    ) -> Result<RgbImage> {
        let mut canvas = RgbaImage::from_pixel(page.page_width, page.page_height, WHITE);

        let (width, height) = placement_size(placement);
        let resampled = if (width, height) == (image.width(), image.height()) {
            image.to_rgba8()
        } else {
            image
                .resize_exact(width, height, FilterType::Lanczos3)
                .to_rgba8()
        };
        let x = placement.x.round() as i64;
        let y = placement.y.round() as i64;
        imageops::overlay(&mut canvas, &resampled, x, y);

        if let Some(page_number) = page_number {
            self.draw_caption(&mut canvas, page_number)?;
        }

        Ok(DynamicImage::ImageRgba8(canvas).to_rgb8())
    }
}

/// Whole-pixel size of a placement, never smaller than one pixel per axis.
fn placement_size(placement: &Placement) -> (u32, u32) {
    let width = placement.width.round().max(1.0) as u32;
    let height = placement.height.round().max(1.0) as u32;
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{resolve_page, resolve_placement};
    use image::Rgb;
    use pagebinder_core::{FitMode, Orientation, PageSize};

    fn red_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255])))
    }

    fn is_reddish(px: &Rgb<u8>) -> bool {
        px[0] > 200 && px[1] < 60 && px[2] < 60
    }

    fn is_white(px: &Rgb<u8>) -> bool {
        px.0 == [255, 255, 255]
    }

    #[test]
    fn page_is_white_with_image_in_placement() {
        let page = resolve_page(PageSize::A4, Orientation::Portrait, 10.0).unwrap();
        let image = red_image(800, 600);
        let placement = resolve_placement(FitMode::Fit, &page, 800, 600);

        let rendered = RasterRenderer::new()
            .render_page(&image, &placement, &page, None)
            .unwrap();

        assert_eq!(rendered.dimensions(), (794, 1123));
        assert!(is_white(rendered.get_pixel(0, 0)));
        assert!(is_white(rendered.get_pixel(793, 1122)));
        let cx = (placement.x + placement.width / 2.0) as u32;
        let cy = (placement.y + placement.height / 2.0) as u32;
        assert!(is_reddish(rendered.get_pixel(cx, cy)));
        // Just above the placed image is still background.
        assert!(is_white(rendered.get_pixel(cx, placement.y as u32 - 2)));
    }

    #[test]
    fn transparent_pixels_show_the_white_background() {
        let page = resolve_page(PageSize::Letter, Orientation::Landscape, 0.0).unwrap();
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0])));
        let placement = resolve_placement(FitMode::Fill, &page, 10, 10);

        let rendered = RasterRenderer::new()
            .render_page(&image, &placement, &page, None)
            .unwrap();
        assert!(rendered.pixels().all(is_white));
    }

    #[test]
    fn caption_without_font_is_a_render_error() {
        let page = resolve_page(PageSize::A4, Orientation::Portrait, 10.0).unwrap();
        let placement = resolve_placement(FitMode::Fit, &page, 4, 4);
        let number = PageNumber { number: 1, total: 1 };

        let renderer = RasterRenderer::new();
        assert!(!renderer.supports_captions());
        let err = renderer
            .render_page(&red_image(4, 4), &placement, &page, Some(number))
            .unwrap_err();
        assert!(matches!(err, PagebinderError::Render(_)));
    }

    fn fixture_font() -> CaptionFont {
        CaptionFont::load(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/DejaVuSans.ttf"
        ))
        .unwrap()
    }

    #[test]
    fn caption_is_drawn_centred_on_its_baseline() {
        let renderer = RasterRenderer::with_caption(fixture_font(), 20.0, 30);
        assert!(renderer.supports_captions());
        let page = resolve_page(PageSize::A4, Orientation::Portrait, 10.0).unwrap();
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, WHITE));
        let placement = resolve_placement(FitMode::Original, &page, 2, 2);

        let rendered = renderer
            .render_page(&image, &placement, &page, Some(PageNumber { number: 2, total: 3 }))
            .unwrap();

        let dark = |px: &Rgb<u8>| px[0] < 128 && px[1] < 128 && px[2] < 128;
        let (mut min_x, mut max_x) = (u32::MAX, 0);
        let (mut min_y, mut max_y) = (u32::MAX, 0);
        let mut darkest = 255;
        for (x, y, px) in rendered.enumerate_pixels() {
            if dark(px) {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
                darkest = darkest.min(px[0]);
            }
        }

        assert!(max_x > min_x, "caption pixels expected");
        let centre = (min_x + max_x) as i32 / 2;
        assert!((centre - 397).abs() <= 6, "caption centred, got {centre}");

        // Baseline sits 30 px above the bottom edge. Cap height of a 20 px face
        // is roughly 15 px, and descenders ("g") reach a few pixels below.
        let baseline = 1123 - 30;
        assert!(
            (baseline - 20..baseline - 8).contains(&min_y),
            "caption top at {min_y}"
        );
        assert!(
            (baseline..baseline + 8).contains(&max_y),
            "caption bottom at {max_y}"
        );
        assert!(darkest < 40, "caption is drawn in black, darkest {darkest}");
    }

    #[test]
    fn garbage_font_bytes_are_rejected() {
        let err = CaptionFont::from_bytes(vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, PagebinderError::Font(_)));
    }

    #[test]
    fn missing_configured_font_fails() {
        let config = AppConfig {
            caption_font: Some(PathBuf::from("/definitely/not/here.ttf")),
            ..AppConfig::default()
        };
        assert!(matches!(
            RasterRenderer::from_config(&config),
            Err(PagebinderError::Font(_))
        ));
    }
}
