// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generation pipeline: decode, lay out, render, encode and assemble.
//
// The pipeline is a pure function of (ordered images, layout options) apart
// from the three collaborator seams below. Images are processed strictly one
// at a time, so peak memory stays at one decoded image plus one page surface
// plus the payloads accumulated so far.

use std::fmt;

use image::{DynamicImage, RgbImage};
use pagebinder_core::error::{PagebinderError, Result};
use pagebinder_core::{AppConfig, GeneratedDocument, ImageEntry, LayoutOptions, PagePayload};
use tracing::{debug, info, instrument};

use crate::image::processor::{JpegPageEncoder, RasterDecoder};
use crate::image::render::RasterRenderer;
use crate::layout::{PageGeometry, Placement, resolve_options, resolve_placement};
use crate::pdf::writer::PdfAssembler;

/// File name used when more than one image is converted.
pub const MULTI_IMAGE_FILE_NAME: &str = "converted_images.pdf";

/// Turns raw image bytes into pixels.
pub trait ImageDecoder {
    /// Decode one entry. Failures must be `PagebinderError::Decode` carrying
    /// the entry's id and name.
    fn decode(&self, entry: &ImageEntry) -> Result<DynamicImage>;
}

/// Draws one page onto a pixel surface.
pub trait PageRasterizer {
    /// Whether `render_page` can honour a page number.
    fn supports_captions(&self) -> bool;

    fn render_page(
        &self,
        image: &DynamicImage,
        placement: &Placement,
        page: &PageGeometry,
        page_number: Option<PageNumber>,
    ) -> Result<RgbImage>;
}

/// Compresses a rendered page into a JPEG payload.
pub trait PageEncoder {
    fn encode(&self, page: &RgbImage) -> Result<Vec<u8>>;
}

impl<T: ImageDecoder + ?Sized> ImageDecoder for &T {
    fn decode(&self, entry: &ImageEntry) -> Result<DynamicImage> {
        (**self).decode(entry)
    }
}

impl<T: PageRasterizer + ?Sized> PageRasterizer for &T {
    fn supports_captions(&self) -> bool {
        (**self).supports_captions()
    }

    fn render_page(
        &self,
        image: &DynamicImage,
        placement: &Placement,
        page: &PageGeometry,
        page_number: Option<PageNumber>,
    ) -> Result<RgbImage> {
        (**self).render_page(image, placement, page, page_number)
    }
}

impl<T: PageEncoder + ?Sized> PageEncoder for &T {
    fn encode(&self, page: &RgbImage) -> Result<Vec<u8>> {
        (**self).encode(page)
    }
}

/// 1-based position of a page within the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumber {
    pub number: usize,
    pub total: usize,
}

impl PageNumber {
    /// The caption stamped on the page.
    pub fn caption(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {} of {}", self.number, self.total)
    }
}

/// Sequences decode → geometry → render → encode over every image, then
/// assembles the PDF once.
pub struct Pipeline<D = RasterDecoder, R = RasterRenderer, E = JpegPageEncoder> {
    decoder: D,
    renderer: R,
    encoder: E,
    assembler: PdfAssembler,
}

impl Pipeline {
    /// Standard pipeline: `image` decoding, raster rendering, JPEG encoding.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            RasterDecoder,
            RasterRenderer::from_config(config)?,
            JpegPageEncoder::new(config.jpeg_quality),
        ))
    }
}

impl<D, R, E> Pipeline<D, R, E>
where
    D: ImageDecoder,
    R: PageRasterizer,
    E: PageEncoder,
{
    pub fn new(decoder: D, renderer: R, encoder: E) -> Self {
        Self {
            decoder,
            renderer,
            encoder,
            assembler: PdfAssembler::new(),
        }
    }

    /// Use a customised assembler (e.g. one that embeds a title).
    pub fn with_assembler(mut self, assembler: PdfAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Convert `images`, in order, into one PDF.
    ///
    /// Configuration problems are reported before any image is decoded. The
    /// first image that fails to decode aborts the whole run.
    #[instrument(skip_all, fields(images = images.len(), page_size = %options.page_size))]
    pub fn generate(
        &self,
        images: &[ImageEntry],
        options: &LayoutOptions,
    ) -> Result<GeneratedDocument> {
        if images.is_empty() {
            return Err(PagebinderError::Configuration(
                "no images to convert; add at least one image".into(),
            ));
        }
        let page = resolve_options(options)?;
        if options.page_numbers && !self.renderer.supports_captions() {
            return Err(PagebinderError::Configuration(
                "page numbers requested but no caption font is available".into(),
            ));
        }

        info!(
            orientation = ?options.orientation,
            fit = ?options.fit_mode,
            margin_mm = options.margin_mm,
            page_numbers = options.page_numbers,
            "Generating PDF"
        );

        let total = images.len();
        let mut payloads = Vec::with_capacity(total);
        for (index, entry) in images.iter().enumerate() {
            let payload = self.render_entry(entry, index, total, &page, options)?;
            payloads.push(payload);
        }

        let bytes = self.assembler.assemble(&payloads)?;
        let file_name = suggested_file_name(images, options.file_name.as_deref());
        info!(bytes = bytes.len(), %file_name, "PDF generated");

        Ok(GeneratedDocument {
            bytes,
            file_name,
            page_count: payloads.len(),
        })
    }

    fn render_entry(
        &self,
        entry: &ImageEntry,
        index: usize,
        total: usize,
        page: &PageGeometry,
        options: &LayoutOptions,
    ) -> Result<PagePayload> {
        let image = self.decoder.decode(entry)?;
        let placement = resolve_placement(options.fit_mode, page, image.width(), image.height());
        let page_number = options.page_numbers.then_some(PageNumber {
            number: index + 1,
            total,
        });

        let surface = self
            .renderer
            .render_page(&image, &placement, page, page_number)?;
        drop(image);
        let jpeg = self.encoder.encode(&surface)?;

        debug!(
            page = index + 1,
            name = %entry.name,
            x = placement.x,
            y = placement.y,
            width = placement.width,
            height = placement.height,
            payload_bytes = jpeg.len(),
            "Page rendered"
        );

        Ok(PagePayload {
            jpeg,
            width: surface.width(),
            height: surface.height(),
        })
    }
}

/// Output file name for a run.
///
/// An explicit name wins (".pdf" appended when missing). Otherwise a single
/// image lends its stem, and several images share a generic name.
pub fn suggested_file_name(images: &[ImageEntry], explicit: Option<&str>) -> String {
    if let Some(name) = explicit.map(str::trim).filter(|n| !n.is_empty()) {
        return if name.to_ascii_lowercase().ends_with(".pdf") {
            name.to_string()
        } else {
            format!("{name}.pdf")
        };
    }
    match images {
        [single] => format!("{}.pdf", strip_extension(&single.name)),
        _ => MULTI_IMAGE_FILE_NAME.to_string(),
    }
}

/// Drop the last ".ext" of a file name, keeping dot-files intact.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}
