// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Pagebinder image-to-PDF engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PagebinderError;

/// MIME type of every document Pagebinder produces.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Unique identifier for an image in the input list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Image formats accepted at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl MediaType {
    /// Every media type the intake allow-list accepts.
    pub const ALL: [MediaType; 4] = [Self::Jpeg, Self::Png, Self::Gif, Self::Webp];

    /// MIME type string as reported by a file picker.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// Match a MIME type against the allow-list.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let lower = mime.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.mime_type() == lower)
    }

    /// Infer the media type from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }
}

/// One user-supplied image, as handed over by the intake collaborator.
#[derive(Clone)]
pub struct ImageEntry {
    pub id: ImageId,
    /// Display name, usually the original file name.
    pub name: String,
    pub media_type: MediaType,
    /// Raw, still-encoded image bytes.
    pub bytes: Vec<u8>,
}

impl ImageEntry {
    pub fn new(name: impl Into<String>, media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self {
            id: ImageId::new(),
            name: name.into(),
            media_type,
            bytes,
        }
    }

    /// Size of the raw image bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for ImageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Ordered, user-editable list of images awaiting conversion.
#[derive(Debug, Clone, Default)]
pub struct ImageList {
    entries: Vec<ImageEntry>,
}

impl ImageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end of the list.
    pub fn push(&mut self, entry: ImageEntry) {
        self.entries.push(entry);
    }

    /// Remove the entry with the given id. Returns it if it was present.
    pub fn remove(&mut self, id: ImageId) -> Option<ImageEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Move the entry at `from` so that it ends up at index `to`.
    ///
    /// Out-of-range indices leave the list untouched and return `false`.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        if from >= self.entries.len() || to >= self.entries.len() {
            return false;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        true
    }

    /// Drop every entry (session reset).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[ImageEntry] {
        &self.entries
    }
}

impl FromIterator<ImageEntry> for ImageList {
    fn from_iter<I: IntoIterator<Item = ImageEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Supported page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    A4,
    Letter,
    Legal,
}

impl PageSize {
    /// Portrait page dimensions in device pixels at 96 DPI (width, height).
    pub fn pixel_dimensions(&self) -> (u32, u32) {
        match self {
            Self::A4 => (794, 1123),
            Self::Letter => (816, 1056),
            Self::Legal => (816, 1344),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::A4 => "A4",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
        };
        f.write_str(name)
    }
}

impl FromStr for PageSize {
    type Err = PagebinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            other => Err(PagebinderError::Configuration(format!(
                "unknown page size '{other}' (expected A4, Letter or Legal)"
            ))),
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = PagebinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            other => Err(PagebinderError::Configuration(format!(
                "unknown orientation '{other}' (expected portrait or landscape)"
            ))),
        }
    }
}

/// How an image is sized within the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale uniformly until one axis touches the content area.
    Fit,
    /// Stretch to exactly the content area, ignoring aspect ratio.
    Fill,
    /// Native pixel size, shrunk like `Fit` only when it does not fit.
    Original,
}

impl FromStr for FitMode {
    type Err = PagebinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" => Ok(Self::Fit),
            "fill" => Ok(Self::Fill),
            "original" => Ok(Self::Original),
            other => Err(PagebinderError::Configuration(format!(
                "unknown fit mode '{other}' (expected fit, fill or original)"
            ))),
        }
    }
}

/// Layout settings for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub page_size: PageSize,
    pub orientation: Orientation,
    /// Margin on every side, in millimetres.
    pub margin_mm: f64,
    pub fit_mode: FitMode,
    /// Explicit output file name. Derived from the input when absent.
    pub file_name: Option<String>,
    /// Draw "Page n of N" at the bottom of every page.
    pub page_numbers: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            margin_mm: 10.0,
            fit_mode: FitMode::Fit,
            file_name: None,
            page_numbers: true,
        }
    }
}

/// A fully rendered page, encoded as a baseline JPEG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePayload {
    pub jpeg: Vec<u8>,
    /// Page width in pixels.
    pub width: u32,
    /// Page height in pixels.
    pub height: u32,
}

/// Finished output of a generation run.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    /// Suggested file name for download.
    pub file_name: String,
    pub page_count: usize,
}

impl GeneratedDocument {
    pub fn media_type(&self) -> &'static str {
        PDF_MEDIA_TYPE
    }
}

/// Format a byte count for listings ("512 B", "1.5 KB", "2.0 MB").
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
