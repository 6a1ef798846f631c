// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open and inspect generated PDF documents using the `lopdf`
// crate. Used to check output independently of the assembler.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use pagebinder_core::error::{PagebinderError, Result};
use tracing::{debug, info, instrument};

/// Page size in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub width_pt: f64,
    pub height_pt: f64,
}

/// Reads an existing PDF and reports its structure.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            PagebinderError::PdfRead(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            PagebinderError::PdfRead(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// `/Count` declared by the root page tree node.
    pub fn declared_page_count(&self) -> Result<i64> {
        let catalog = self
            .document
            .catalog()
            .map_err(|err| PagebinderError::PdfRead(format!("no catalog: {}", err)))?;
        let pages = self.resolve_dict(catalog.get(b"Pages").map_err(read_err)?)?;
        pages.get(b"Count").and_then(Object::as_i64).map_err(read_err)
    }

    /// MediaBox of every page, in page order.
    pub fn page_boxes(&self) -> Result<Vec<PageBox>> {
        self.page_ids()
            .into_iter()
            .map(|id| {
                let page = self.document.get_dictionary(id).map_err(read_err)?;
                let media_box = page
                    .get(b"MediaBox")
                    .and_then(Object::as_array)
                    .map_err(read_err)?;
                if media_box.len() != 4 {
                    return Err(PagebinderError::PdfRead(format!(
                        "page {:?} has a malformed MediaBox",
                        id
                    )));
                }
                Ok(PageBox {
                    width_pt: number(&media_box[2])? - number(&media_box[0])?,
                    height_pt: number(&media_box[3])? - number(&media_box[1])?,
                })
            })
            .collect()
    }

    /// Pixel size of every image XObject on each page, in page order.
    pub fn page_images(&self) -> Result<Vec<Vec<(i64, i64)>>> {
        self.page_ids()
            .into_iter()
            .map(|id| {
                let page = self.document.get_dictionary(id).map_err(read_err)?;
                let resources = self.resolve_dict(page.get(b"Resources").map_err(read_err)?)?;
                let xobjects = match resources.get(b"XObject") {
                    Ok(obj) => self.resolve_dict(obj)?,
                    Err(_) => return Ok(Vec::new()),
                };
                xobjects
                    .iter()
                    .map(|(_, reference)| {
                        let stream = self
                            .document
                            .get_object(reference.as_reference().map_err(read_err)?)
                            .and_then(Object::as_stream)
                            .map_err(read_err)?;
                        let width = stream.dict.get(b"Width").and_then(Object::as_i64);
                        let height = stream.dict.get(b"Height").and_then(Object::as_i64);
                        Ok((width.map_err(read_err)?, height.map_err(read_err)?))
                    })
                    .collect()
            })
            .collect()
    }

    /// Title from the document information dictionary, if any.
    pub fn title(&self) -> Option<String> {
        let info = self.document.trailer.get(b"Info").ok()?;
        let info = self.resolve_dict(info).ok()?;
        match info.get(b"Title").ok()? {
            Object::String(bytes, _) => Some(decode_text_string(bytes)),
            _ => None,
        }
    }

    // -- Helpers --------------------------------------------------------------

    fn page_ids(&self) -> Vec<ObjectId> {
        // lopdf pages are keyed by 1-indexed page number, already in order.
        self.document.get_pages().into_values().collect()
    }

    fn resolve_dict<'a>(&'a self, object: &'a Object) -> Result<&'a Dictionary> {
        match object {
            Object::Reference(id) => self.document.get_dictionary(*id).map_err(read_err),
            Object::Dictionary(dict) => Ok(dict),
            other => Err(PagebinderError::PdfRead(format!(
                "expected a dictionary, found {:?}",
                other.enum_variant()
            ))),
        }
    }
}

fn read_err(err: lopdf::Error) -> PagebinderError {
    PagebinderError::PdfRead(err.to_string())
}

fn number(object: &Object) -> Result<f64> {
    match object {
        Object::Integer(value) => Ok(*value as f64),
        Object::Real(value) => Ok(f64::from(*value)),
        other => Err(PagebinderError::PdfRead(format!(
            "expected a number, found {:?}",
            other.enum_variant()
        ))),
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, or single-byte).
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}
