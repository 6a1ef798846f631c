// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image intake: turn command-line paths into an ordered image list.
//
// Files are accepted by extension against the media-type allow-list.
// Anything else is skipped with a warning, so a shell glob that also matches
// a stray text file still produces a document.

use std::path::Path;

use pagebinder_core::error::{PagebinderError, Result};
use pagebinder_core::{ImageEntry, ImageList, MediaType, format_file_size};
use tracing::{debug, warn};

/// Media type for `path`, judged by its extension.
pub fn media_type_for(path: &Path) -> Option<MediaType> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(MediaType::from_extension)
}

/// Read every supported file in `paths`, keeping command-line order.
///
/// Fails when a supported file cannot be read, or when nothing supported
/// remains after filtering.
pub fn collect_images<P: AsRef<Path>>(paths: &[P]) -> Result<ImageList> {
    let mut images = ImageList::new();

    for path in paths {
        let path = path.as_ref();
        let Some(media_type) = media_type_for(path) else {
            warn!(path = %path.display(), "Skipping unsupported file");
            continue;
        };

        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let entry = ImageEntry::new(name, media_type, bytes);
        debug!(
            name = %entry.name,
            media_type = media_type.mime_type(),
            size = %format_file_size(entry.size()),
            "Image accepted"
        );
        images.push(entry);
    }

    if images.is_empty() {
        return Err(PagebinderError::Configuration(
            "no supported images given (expected JPG, PNG, GIF or WEBP files)".into(),
        ));
    }
    Ok(images)
}
