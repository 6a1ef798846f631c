// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF assembler: hand-builds a PDF 1.4 file around pre-encoded JPEG pages.
//
// Object layout for n pages:
//
//   1            Catalog
//   2            Pages (Kids = 3, 6, 9, ...)
//   3 + 3i       Page i
//   4 + 3i       Content stream of page i
//   5 + 3i       Image XObject of page i (DCTDecode, payload verbatim)
//   3 + 3n       Info (only when a title is set)
//
// The cross-reference table is built from the running length of the output
// buffer, then every recorded offset is checked against the emitted bytes
// before the document is returned.

use pagebinder_core::PagePayload;
use pagebinder_core::error::{PagebinderError, Result};
use tracing::{debug, info, instrument};

/// Version header plus a binary marker comment so transfer tools treat the
/// file as binary.
const HEADER: &[u8] = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n";

const CATALOG_ID: u32 = 1;
const PAGES_ID: u32 = 2;
const FIRST_PAGE_ID: u32 = 3;
const OBJECTS_PER_PAGE: u32 = 3;

const PRODUCER: &str = "Pagebinder";

/// Id of the Page object for the zero-based page `index`.
pub fn page_object_id(index: usize) -> u32 {
    FIRST_PAGE_ID + index as u32 * OBJECTS_PER_PAGE
}

/// Builds the final PDF byte stream from rendered page payloads.
#[derive(Debug, Clone, Default)]
pub struct PdfAssembler {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

/// One numbered object before serialisation.
struct PdfObject {
    id: u32,
    body: Vec<u8>,
    references: Vec<u32>,
}

/// Objects in emission order, ids dense from 1.
#[derive(Default)]
struct DocumentModel {
    objects: Vec<PdfObject>,
}

impl DocumentModel {
    fn next_id(&self) -> u32 {
        self.objects.len() as u32 + 1
    }

    fn push(&mut self, id: u32, body: Vec<u8>, references: Vec<u32>) -> Result<()> {
        if id != self.next_id() {
            return Err(PagebinderError::Assembly(format!(
                "object {} emitted out of order (expected {})",
                id,
                self.next_id()
            )));
        }
        self.objects.push(PdfObject {
            id,
            body,
            references,
        });
        Ok(())
    }

    fn check_references(&self) -> Result<()> {
        let count = self.objects.len() as u32;
        for object in &self.objects {
            if let Some(dangling) = object
                .references
                .iter()
                .find(|&&id| id == 0 || id > count)
            {
                return Err(PagebinderError::Assembly(format!(
                    "object {} references missing object {}",
                    object.id, dangling
                )));
            }
        }
        Ok(())
    }
}

impl PdfAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembler that records `title` in the document information dictionary.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }

    /// Assemble `pages`, in order, into a complete PDF.
    ///
    /// Deterministic: identical input produces identical bytes.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn assemble(&self, pages: &[PagePayload]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(PagebinderError::Assembly(
                "cannot assemble a document without pages".into(),
            ));
        }

        let model = self.build_model(pages)?;
        model.check_references()?;
        let output = serialize(&model, self.title.is_some())?;

        info!(
            objects = model.objects.len(),
            bytes = output.len(),
            "PDF assembled"
        );
        Ok(output)
    }

    fn build_model(&self, pages: &[PagePayload]) -> Result<DocumentModel> {
        let mut model = DocumentModel::default();

        model.push(
            CATALOG_ID,
            format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>").into_bytes(),
            vec![PAGES_ID],
        )?;

        let kids: Vec<u32> = (0..pages.len()).map(page_object_id).collect();
        let kids_list = kids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");
        model.push(
            PAGES_ID,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids_list,
                pages.len()
            )
            .into_bytes(),
            kids,
        )?;

        for (index, page) in pages.iter().enumerate() {
            if page.width == 0 || page.height == 0 || page.jpeg.is_empty() {
                return Err(PagebinderError::Assembly(format!(
                    "page {} is empty ({}x{} px, {} payload bytes)",
                    index + 1,
                    page.width,
                    page.height,
                    page.jpeg.len()
                )));
            }

            let page_id = page_object_id(index);
            let content_id = page_id + 1;
            let image_id = page_id + 2;
            let width_pt = px_to_pt(page.width);
            let height_pt = px_to_pt(page.height);

            model.push(
                page_id,
                format!(
                    "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {width_pt} {height_pt}] \
                     /Contents {content_id} 0 R /Resources << /XObject << /Im{index} {image_id} 0 R >> >> >>"
                )
                .into_bytes(),
                vec![PAGES_ID, content_id, image_id],
            )?;

            let program = format!("q\n{width_pt} 0 0 {height_pt} 0 0 cm\n/Im{index} Do\nQ");
            model.push(content_id, stream_object(String::new(), program.as_bytes()), Vec::new())?;

            let image_dict = format!(
                " /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB \
                 /BitsPerComponent 8 /Filter /DCTDecode",
                page.width, page.height
            );
            model.push(image_id, stream_object(image_dict, &page.jpeg), Vec::new())?;

            debug!(page = index + 1, page_id, width_pt = %width_pt, height_pt = %height_pt, "Page objects built");
        }

        if let Some(title) = &self.title {
            let info_id = model.next_id();
            model.push(
                info_id,
                format!(
                    "<< /Title {} /Producer {} >>",
                    pdf_text_string(title),
                    pdf_text_string(PRODUCER)
                )
                .into_bytes(),
                Vec::new(),
            )?;
        }

        Ok(model)
    }
}

/// Write the model, xref and trailer, then verify every xref offset.
fn serialize(model: &DocumentModel, has_info: bool) -> Result<Vec<u8>> {
    let payload_bytes: usize = model.objects.iter().map(|o| o.body.len() + 32).sum();
    let mut out: Vec<u8> = Vec::with_capacity(HEADER.len() + payload_bytes + 20 * (model.objects.len() + 1) + 128);
    out.extend_from_slice(HEADER);

    let mut offsets = Vec::with_capacity(model.objects.len());
    for object in &model.objects {
        offsets.push(out.len());
        out.extend_from_slice(object_header(object.id).as_bytes());
        out.push(b'\n');
        out.extend_from_slice(&object.body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let count = model.objects.len();
    let xref_start = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", count + 1);
    for offset in &offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    out.extend_from_slice(xref.as_bytes());

    let mut trailer = format!("trailer\n<< /Size {} /Root {CATALOG_ID} 0 R", count + 1);
    if has_info {
        trailer.push_str(&format!(" /Info {count} 0 R"));
    }
    trailer.push_str(&format!(" >>\nstartxref\n{xref_start}\n%%EOF\n"));
    out.extend_from_slice(trailer.as_bytes());

    for (object, &offset) in model.objects.iter().zip(&offsets) {
        let header = object_header(object.id);
        if !out[offset..].starts_with(header.as_bytes()) {
            return Err(PagebinderError::Assembly(format!(
                "xref offset {} does not point at object {}",
                offset, object.id
            )));
        }
    }

    Ok(out)
}

fn object_header(id: u32) -> String {
    format!("{id} 0 obj")
}

/// A stream object body: `<<{extra} /Length n >>`, then the raw data.
fn stream_object(extra_dict: String, data: &[u8]) -> Vec<u8> {
    let mut body = format!("<<{extra_dict} /Length {} >>\nstream\n", data.len()).into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(b"\nendstream");
    body
}

/// Pixels at 96 DPI to PDF points (1 px = 0.75 pt), formatted exactly.
pub fn px_to_pt(px: u32) -> String {
    let hundredths = u64::from(px) * 75;
    let (whole, frac) = (hundredths / 100, hundredths % 100);
    if frac == 0 {
        whole.to_string()
    } else if frac % 10 == 0 {
        format!("{}.{}", whole, frac / 10)
    } else {
        format!("{whole}.{frac:02}")
    }
}

/// Encode text as a PDF string: an escaped literal for ASCII, UTF-16BE hex
/// otherwise.
fn pdf_text_string(text: &str) -> String {
    if text.is_ascii() {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('(');
        for ch in text.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '(' => out.push_str("\\("),
                ')' => out.push_str("\\)"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                c => out.push(c),
            }
        }
        out.push(')');
        out
    } else {
        let mut out = String::from("<FEFF");
        for unit in text.encode_utf16() {
            out.push_str(&format!("{unit:04X}"));
        }
        out.push('>');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_page(seed: u8, width: u32, height: u32) -> PagePayload {
        // The assembler embeds payloads verbatim; any bytes will do here,
        // including ones that look like PDF syntax.
        let mut jpeg = vec![0xFF, 0xD8, seed, b'\n', b'e', b'n', b'd', b'o', b'b', b'j'];
        jpeg.extend((0..200u8).map(|b| b.wrapping_mul(seed)));
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        PagePayload { jpeg, width, height }
    }

    /// Walk startxref → xref table and return the offsets of objects 1..n.
    fn parse_xref(pdf: &[u8]) -> Vec<usize> {
        let text = String::from_utf8_lossy(pdf);
        let marker = text.rfind("startxref\n").expect("startxref");
        let xref_start: usize = text[marker + 10..]
            .lines()
            .next()
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        let section = &pdf[xref_start..];
        assert!(section.starts_with(b"xref\n"));

        let section = String::from_utf8_lossy(section);
        let mut lines = section.split('\n').skip(1);
        let subsection = lines.next().unwrap();
        let count: usize = subsection.split(' ').nth(1).unwrap().parse().unwrap();
        assert!(subsection.starts_with("0 "));

        let entries: Vec<&str> = lines.take(count).collect();
        assert_eq!(entries[0], "0000000000 65535 f ");
        entries[1..]
            .iter()
            .map(|entry| {
                assert_eq!(entry.len(), 19, "xref entries are 20 bytes with the newline");
                assert!(entry.ends_with(" 00000 n "));
                entry[..10].parse().unwrap()
            })
            .collect()
    }

    #[test]
    fn starts_with_header_and_ends_with_eof() {
        let pdf = PdfAssembler::new().assemble(&[fake_page(1, 794, 1123)]).unwrap();
        assert!(pdf.starts_with(b"%PDF-1.4\n"));
        assert!(pdf.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn xref_offsets_point_at_object_headers() {
        let pages = [
            fake_page(1, 794, 1123),
            fake_page(2, 1123, 794),
            fake_page(3, 816, 1344),
        ];
        let pdf = PdfAssembler::new().assemble(&pages).unwrap();
        let offsets = parse_xref(&pdf);
        assert_eq!(offsets.len(), 2 + 3 * pages.len());
        for (index, offset) in offsets.iter().enumerate() {
            let header = format!("{} 0 obj\n", index + 1);
            assert!(
                pdf[*offset..].starts_with(header.as_bytes()),
                "object {} not at offset {}",
                index + 1,
                offset
            );
        }
    }

    #[test]
    fn startxref_points_at_xref_keyword() {
        let pdf = PdfAssembler::new().assemble(&[fake_page(9, 10, 10)]).unwrap();
        let xref_at = pdf.windows(6).rposition(|w| w == b"\nxref\n").unwrap() + 1;
        let tail = format!("startxref\n{xref_at}\n%%EOF\n");
        assert!(pdf.ends_with(tail.as_bytes()));
    }

    #[test]
    fn page_tree_lists_every_page() {
        let pages: Vec<_> = (0..4).map(|i| fake_page(i, 100, 100)).collect();
        let pdf = PdfAssembler::new().assemble(&pages).unwrap();
        let text = String::from_utf8_lossy(&pdf);

        assert!(text.contains("<< /Type /Pages /Kids [3 0 R 6 0 R 9 0 R 12 0 R] /Count 4 >>"));
        assert_eq!(text.matches("/Type /Page ").count(), 4);
        assert_eq!(text.matches("/Subtype /Image").count(), 4);
        assert!(text.contains("trailer\n<< /Size 15 /Root 1 0 R >>"));
    }

    #[test]
    fn page_objects_carry_points_and_references() {
        let pdf = PdfAssembler::new()
            .assemble(&[fake_page(1, 794, 1123), fake_page(2, 794, 1123)])
            .unwrap();
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains(
            "6 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595.5 842.25] \
             /Contents 7 0 R /Resources << /XObject << /Im1 8 0 R >> >> >>\nendobj"
        ));
        assert!(text.contains("q\n595.5 0 0 842.25 0 0 cm\n/Im1 Do\nQ"));
        assert!(text.contains(
            "/Width 794 /Height 1123 /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode"
        ));
    }

    #[test]
    fn stream_lengths_are_exact() {
        let page = fake_page(5, 816, 1056);
        let pdf = PdfAssembler::new().assemble(std::slice::from_ref(&page)).unwrap();

        let program = b"q\n612 0 0 792 0 0 cm\n/Im0 Do\nQ";
        let content = format!("<< /Length {} >>\nstream\n", program.len());
        let at = find(&pdf, content.as_bytes()).unwrap() + content.len();
        assert_eq!(&pdf[at..at + program.len()], program);
        assert_eq!(&pdf[at + program.len()..at + program.len() + 10], b"\nendstream");

        let image = format!("/Length {} >>\nstream\n", page.jpeg.len());
        let at = find(&pdf, image.as_bytes()).unwrap() + image.len();
        assert_eq!(&pdf[at..at + page.jpeg.len()], &page.jpeg[..]);
        assert_eq!(&pdf[at + page.jpeg.len()..][..10], b"\nendstream");
    }

    #[test]
    fn assembly_is_deterministic() {
        let pages = [fake_page(7, 794, 1123), fake_page(8, 794, 1123)];
        let assembler = PdfAssembler::with_title("Holiday");
        assert_eq!(
            assembler.assemble(&pages).unwrap(),
            assembler.assemble(&pages).unwrap()
        );
    }

    #[test]
    fn title_adds_info_dictionary() {
        let pdf = PdfAssembler::with_title("Q3 (draft)")
            .assemble(&[fake_page(1, 10, 10)])
            .unwrap();
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("6 0 obj\n<< /Title (Q3 \\(draft\\)) /Producer (Pagebinder) >>"));
        assert!(text.contains("<< /Size 7 /Root 1 0 R /Info 6 0 R >>"));
        assert_eq!(parse_xref(&pdf).len(), 6);
    }

    #[test]
    fn empty_input_is_an_assembly_error() {
        let err = PdfAssembler::new().assemble(&[]).unwrap_err();
        assert!(matches!(err, PagebinderError::Assembly(_)));
    }

    #[test]
    fn zero_sized_page_is_rejected() {
        let err = PdfAssembler::new()
            .assemble(&[fake_page(1, 0, 10)])
            .unwrap_err();
        assert!(matches!(err, PagebinderError::Assembly(_)));
    }

    #[test]
    fn dangling_reference_is_detected() {
        let mut model = DocumentModel::default();
        model.push(1, b"<< >>".to_vec(), vec![2]).unwrap();
        assert!(matches!(
            model.check_references(),
            Err(PagebinderError::Assembly(_))
        ));
        assert!(model.push(3, Vec::new(), Vec::new()).is_err());
    }

    #[test]
    fn points_are_formatted_exactly() {
        assert_eq!(px_to_pt(794), "595.5");
        assert_eq!(px_to_pt(1123), "842.25");
        assert_eq!(px_to_pt(816), "612");
        assert_eq!(px_to_pt(1), "0.75");
        assert_eq!(px_to_pt(1344), "1008");
    }

    #[test]
    fn non_ascii_titles_use_utf16() {
        assert_eq!(pdf_text_string("é"), "<FEFF00E9>");
        assert_eq!(pdf_text_string("a\\b"), "(a\\\\b)");
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }
}
