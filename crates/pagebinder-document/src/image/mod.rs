// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image handling for page rendering.

pub mod processor;
pub mod render;

pub use processor::{JpegPageEncoder, RasterDecoder};
pub use render::{CaptionFont, RasterRenderer};
