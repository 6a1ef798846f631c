// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagebinder.

use thiserror::Error;

use crate::types::ImageId;

/// Top-level error type for all Pagebinder operations.
#[derive(Debug, Error)]
pub enum PagebinderError {
    // -- Run setup --
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("caption font unavailable: {0}")]
    Font(String),

    // -- Per-image work --
    #[error("failed to decode image '{name}' ({id}): {detail}")]
    Decode {
        id: ImageId,
        name: String,
        detail: String,
    },

    #[error("page rendering failed: {0}")]
    Render(String),

    #[error("page encoding failed: {0}")]
    Encode(String),

    // -- Document --
    #[error("internal PDF assembly error: {0}")]
    Assembly(String),

    #[error("PDF could not be read: {0}")]
    PdfRead(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagebinderError>;
