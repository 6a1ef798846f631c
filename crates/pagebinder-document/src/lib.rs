// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagebinder-document — Document generation for Pagebinder.
//
// Provides page geometry (page sizes, margins, fit modes), image decoding and
// page rendering, a hand-built PDF assembler with an exact cross-reference
// table, a lopdf-based reader for checking output, and the pipeline that ties
// them together.

pub mod image;
pub mod layout;
pub mod pdf;
pub mod pipeline;

// Re-export the primary structs so callers can use `pagebinder_document::Pipeline` etc.
pub use crate::image::processor::{JpegPageEncoder, RasterDecoder};
pub use crate::image::render::{CaptionFont, RasterRenderer};
pub use layout::{PageGeometry, Placement};
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfAssembler;
pub use pipeline::{ImageDecoder, PageEncoder, PageNumber, PageRasterizer, Pipeline};
