// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image codecs: decode user images into pixel buffers and encode rendered
// pages as baseline JPEG payloads. Operates on in-memory images using the
// `image` crate.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use pagebinder_core::ImageEntry;
use pagebinder_core::error::{PagebinderError, Result};
use tracing::{debug, instrument};

use crate::pipeline::{ImageDecoder, PageEncoder};

/// JPEG quality used for page payloads unless configured otherwise.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Decodes JPEG, PNG, GIF and WebP bytes with the `image` crate.
///
/// The format is sniffed from the bytes rather than trusted from the declared
/// media type; GIFs contribute their first frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    #[instrument(skip_all, fields(name = %entry.name, data_len = entry.bytes.len()))]
    fn decode(&self, entry: &ImageEntry) -> Result<DynamicImage> {
        let image = image::load_from_memory(&entry.bytes).map_err(|err| PagebinderError::Decode {
            id: entry.id,
            name: entry.name.clone(),
            detail: err.to_string(),
        })?;

        if image.width() == 0 || image.height() == 0 {
            return Err(PagebinderError::Decode {
                id: entry.id,
                name: entry.name.clone(),
                detail: "image has no pixels".into(),
            });
        }

        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded from bytes"
        );
        Ok(image)
    }
}

/// Encodes rendered pages as baseline JPEG at a fixed quality.
#[derive(Debug, Clone, Copy)]
pub struct JpegPageEncoder {
    quality: u8,
}

impl JpegPageEncoder {
    /// Create an encoder; `quality` is clamped to 1-100.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegPageEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl PageEncoder for JpegPageEncoder {
    #[instrument(skip_all, fields(width = page.width(), height = page.height(), quality = self.quality))]
    fn encode(&self, page: &RgbImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
        page.write_with_encoder(encoder)
            .map_err(|err| PagebinderError::Encode(format!("JPEG encoding failed: {}", err)))?;
        debug!(bytes = buffer.len(), "Page encoded");
        Ok(buffer)
    }
}
