//! PDF emission: paginates a [`ReportDocument`] onto A4 pages.
//!
//! Uses the three built-in Helvetica faces, draws rendered attachment pages
//! as JPEG XObjects, and flows a simple top-down cursor with automatic page
//! breaks. Content streams are left uncompressed.

use dossier_core::{defaults, Error, RenderedPage, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::layout::{ReportDocument, ReportElement};

const PAGE_WIDTH: f32 = defaults::REPORT_PAGE_WIDTH;
const PAGE_HEIGHT: f32 = defaults::REPORT_PAGE_HEIGHT;
const MARGIN: f32 = defaults::REPORT_MARGIN;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const IMAGE_AREA_WIDTH: f32 = defaults::REPORT_IMAGE_AREA_WIDTH;
const IMAGE_AREA_HEIGHT: f32 = defaults::REPORT_IMAGE_AREA_HEIGHT;

// Accent color of headings and header bars, plus the two grays.
const ACCENT: (f32, f32, f32) = (0.77, 0.12, 0.23);
const BAR_GRAY: (f32, f32, f32) = (0.27, 0.27, 0.27);
const TEXT_GRAY: (f32, f32, f32) = (0.53, 0.53, 0.53);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    fn name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
        }
    }
}

/// Serialize `document` into PDF bytes.
pub fn write_report(document: &ReportDocument) -> Result<Vec<u8>> {
    let mut writer = PdfWriter::new();
    for element in document.elements() {
        writer.element(element)?;
    }
    writer.finish()
}

struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    fonts: [ObjectId; 3],
    page_ids: Vec<ObjectId>,
    ops: Vec<Operation>,
    xobjects: Vec<(String, ObjectId)>,
    image_count: usize,
    cursor_y: f32,
}

impl PdfWriter {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let fonts = ["Helvetica", "Helvetica-Bold", "Helvetica-Oblique"].map(|base| {
            doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base,
            })
        });
        Self {
            doc,
            pages_id,
            fonts,
            page_ids: Vec::new(),
            ops: Vec::new(),
            xobjects: Vec::new(),
            image_count: 0,
            cursor_y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn element(&mut self, element: &ReportElement) -> Result<()> {
        match element {
            ReportElement::Spacer(height) => {
                self.cursor_y -= height;
            }
            ReportElement::Title(text) => {
                self.ensure_room(40.0)?;
                self.cursor_y -= 28.0;
                self.text_centered(text, Font::Bold, 28.0, ACCENT);
                self.cursor_y -= 12.0;
            }
            ReportElement::Subtitle(text) => {
                self.ensure_room(22.0)?;
                self.cursor_y -= 14.0;
                self.text_centered(text, Font::Regular, 14.0, TEXT_GRAY);
                self.cursor_y -= 6.0;
            }
            ReportElement::Heading(text) => {
                self.ensure_room(30.0)?;
                self.cursor_y -= 16.0;
                self.text_at(MARGIN, text, Font::Bold, 16.0, ACCENT);
                self.cursor_y -= 12.0;
            }
            ReportElement::Text { content, indent } => {
                self.ensure_room(16.0)?;
                self.cursor_y -= 11.0;
                self.text_at(MARGIN + indent, content, Font::Regular, 11.0, BLACK);
                self.cursor_y -= 4.0;
            }
            ReportElement::StatusLine(text) => {
                self.ensure_room(13.0)?;
                self.cursor_y -= 9.0;
                self.text_at(MARGIN, text, Font::Regular, 9.0, TEXT_GRAY);
                self.cursor_y -= 4.0;
            }
            ReportElement::Note(text) => {
                self.ensure_room(50.0)?;
                self.cursor_y -= 40.0;
                self.text_centered(text, Font::Italic, 10.0, TEXT_GRAY);
                self.cursor_y -= 6.0;
            }
            ReportElement::KeyValueTable(rows) => {
                for (label, value) in rows {
                    self.ensure_room(18.0)?;
                    self.cursor_y -= 11.0;
                    let label_width = Self::text_width(label, 11.0);
                    self.text_at(MARGIN + 130.0 - label_width, label, Font::Bold, 11.0, BLACK);
                    self.text_at(MARGIN + 140.0, value, Font::Regular, 11.0, BLACK);
                    self.cursor_y -= 7.0;
                }
            }
            ReportElement::HeaderBar { left, right } => {
                self.ensure_room(36.0)?;
                let bar_height = 28.0;
                let top = self.cursor_y;
                self.fill_rect(MARGIN, top - bar_height, CONTENT_WIDTH, bar_height, ACCENT);
                let baseline = top - bar_height + 9.0;
                self.text_baseline(MARGIN + 10.0, baseline, left, Font::Bold, 11.0, (1.0, 1.0, 1.0));
                let right_width = Self::text_width(right, 11.0);
                self.text_baseline(
                    MARGIN + CONTENT_WIDTH - 10.0 - right_width,
                    baseline,
                    right,
                    Font::Regular,
                    11.0,
                    (1.0, 1.0, 1.0),
                );
                self.cursor_y = top - bar_height - 8.0;
            }
            ReportElement::ContinuationBar(text) => {
                self.ensure_room(30.0)?;
                let bar_height = 22.0;
                let top = self.cursor_y;
                self.fill_rect(MARGIN, top - bar_height, CONTENT_WIDTH, bar_height, BAR_GRAY);
                let baseline = top - bar_height + 7.0;
                let width = Self::text_width(text, 10.0);
                self.text_baseline(
                    MARGIN + (CONTENT_WIDTH - width) / 2.0,
                    baseline,
                    text,
                    Font::Regular,
                    10.0,
                    (1.0, 1.0, 1.0),
                );
                self.cursor_y = top - bar_height - 8.0;
            }
            ReportElement::Image(page) => self.image(page)?,
            ReportElement::PageBreak => self.page_break()?,
        }
        Ok(())
    }

    /// Place one rendered page image, scaled to the content area (never
    /// upscaled), centered, with a thin border.
    fn image(&mut self, page: &RenderedPage) -> Result<()> {
        let (w, h) = (page.width as f32, page.height as f32);
        let scale = f32::min(1.0, f32::min(IMAGE_AREA_WIDTH / w, IMAGE_AREA_HEIGHT / h));
        let draw_w = w * scale;
        let draw_h = h * scale;
        self.ensure_room(draw_h + 12.0)?;

        let x = (PAGE_WIDTH - draw_w) / 2.0;
        let y = self.cursor_y - draw_h;

        let name = format!("Im{}", self.image_count);
        self.image_count += 1;
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => page.width as i64,
                "Height" => page.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
                "Filter" => "DCTDecode",
            },
            page.jpeg.clone(),
        );
        let id = self.doc.add_object(stream);
        self.xobjects.push((name.clone(), id));

        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                draw_w.into(),
                0f32.into(),
                0f32.into(),
                draw_h.into(),
                x.into(),
                y.into(),
            ],
        ));
        self.ops
            .push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        self.ops.push(Operation::new("Q", vec![]));

        // Border.
        self.ops.push(Operation::new(
            "RG",
            vec![0.2f32.into(), 0.2f32.into(), 0.2f32.into()],
        ));
        self.ops.push(Operation::new("w", vec![1f32.into()]));
        self.ops.push(Operation::new(
            "re",
            vec![
                (x - 3.0).into(),
                (y - 3.0).into(),
                (draw_w + 6.0).into(),
                (draw_h + 6.0).into(),
            ],
        ));
        self.ops.push(Operation::new("S", vec![]));

        self.cursor_y = y - 12.0;
        Ok(())
    }

    fn ensure_room(&mut self, height: f32) -> Result<()> {
        if self.cursor_y - height < MARGIN {
            self.page_break()?;
        }
        Ok(())
    }

    fn page_break(&mut self) -> Result<()> {
        self.finish_page()?;
        self.cursor_y = PAGE_HEIGHT - MARGIN;
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: (f32, f32, f32)) {
        self.ops.push(Operation::new(
            "rg",
            vec![color.0.into(), color.1.into(), color.2.into()],
        ));
        self.ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), w.into(), h.into()],
        ));
        self.ops.push(Operation::new("f", vec![]));
    }

    fn text_centered(&mut self, text: &str, font: Font, size: f32, color: (f32, f32, f32)) {
        let width = Self::text_width(text, size);
        let x = (PAGE_WIDTH - width) / 2.0;
        let baseline = self.cursor_y;
        self.text_baseline(x, baseline, text, font, size, color);
    }

    fn text_at(&mut self, x: f32, text: &str, font: Font, size: f32, color: (f32, f32, f32)) {
        let baseline = self.cursor_y;
        self.text_baseline(x, baseline, text, font, size, color);
    }

    fn text_baseline(
        &mut self,
        x: f32,
        baseline: f32,
        text: &str,
        font: Font,
        size: f32,
        color: (f32, f32, f32),
    ) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "rg",
            vec![color.0.into(), color.1.into(), color.2.into()],
        ));
        self.ops.push(Operation::new(
            "Tf",
            vec![font.name().into(), size.into()],
        ));
        self.ops
            .push(Operation::new("Td", vec![x.into(), baseline.into()]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(text)],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// Approximate Helvetica line width; average glyph advance is close to
    /// half the point size.
    fn text_width(text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }

    fn finish_page(&mut self) -> Result<()> {
        let content = Content {
            operations: std::mem::take(&mut self.ops),
        };
        let encoded = content
            .encode()
            .map_err(|e| Error::Render(format!("content stream encode failed: {}", e)))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));

        let font_dict = dictionary! {
            "F1" => Object::Reference(self.fonts[0]),
            "F2" => Object::Reference(self.fonts[1]),
            "F3" => Object::Reference(self.fonts[2]),
        };
        let mut resources = dictionary! {
            "Font" => Object::Dictionary(font_dict),
        };
        if !self.xobjects.is_empty() {
            let mut xobject_dict = lopdf::Dictionary::new();
            for (name, id) in self.xobjects.drain(..) {
                xobject_dict.set(name, Object::Reference(id));
            }
            resources.set("XObject", Object::Dictionary(xobject_dict));
        }
        let resources_id = self.doc.add_object(resources);

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0f32.into(), 0f32.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        self.finish_page()?;

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let count = self.page_ids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| Error::Render(format!("pdf serialize failed: {}", e)))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_texts(bytes: &[u8]) -> Vec<String> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let content = doc.get_page_content(page_id).unwrap();
                String::from_utf8_lossy(&content).into_owned()
            })
            .collect()
    }

    #[test]
    fn test_empty_document_yields_single_blank_page() {
        let bytes = write_report(&ReportDocument::new()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(page_texts(&bytes).len(), 1);
    }

    #[test]
    fn test_page_break_starts_new_page() {
        let mut doc = ReportDocument::new();
        doc.push(ReportElement::Title("Cover".to_string()));
        doc.push(ReportElement::PageBreak);
        doc.push(ReportElement::Heading("Second".to_string()));

        let pages = page_texts(&write_report(&doc).unwrap());
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Cover"));
        assert!(pages[1].contains("Second"));
    }

    #[test]
    fn test_overflowing_text_flows_onto_next_page() {
        let mut doc = ReportDocument::new();
        for i in 0..80 {
            doc.push(ReportElement::Text {
                content: format!("line {}", i),
                indent: 0.0,
            });
        }
        let pages = page_texts(&write_report(&doc).unwrap());
        assert!(pages.len() >= 2);
        assert!(pages[0].contains("line 0"));
        assert!(pages.last().unwrap().contains("line 79"));
    }

    #[test]
    fn test_image_embedded_as_jpeg_xobject() {
        let mut doc = ReportDocument::new();
        doc.push(ReportElement::Image(RenderedPage {
            jpeg: vec![0xFF, 0xD8, 0xFF, 0xD9],
            width: 1200,
            height: 900,
        }));

        let bytes = write_report(&doc).unwrap();
        let loaded = Document::load_mem(&bytes).unwrap();
        let pages = loaded.get_pages();
        assert_eq!(pages.len(), 1);
        let content = loaded.get_page_content(pages[&1]).unwrap();
        let content = String::from_utf8_lossy(&content);
        assert!(content.contains("/Im0"));
    }

    #[test]
    fn test_header_bar_draws_both_cells() {
        let mut doc = ReportDocument::new();
        doc.push(ReportElement::HeaderBar {
            left: "Attachment 1: site.jpg".to_string(),
            right: "Uploaded: 2026-08-25".to_string(),
        });
        let pages = page_texts(&write_report(&doc).unwrap());
        assert!(pages[0].contains("Attachment 1: site.jpg"));
        assert!(pages[0].contains("Uploaded: 2026-08-25"));
    }
}
