// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page layout: page sizes, margins and image placement.

pub mod geometry;

pub use geometry::{PageGeometry, Placement, resolve_options, resolve_page, resolve_placement};
