//! PDF page rasterization behind a trait seam.
//!
//! [`PdfiumRasterizer`] is the production implementation; it binds the pdfium
//! native library lazily on each call so the crate loads without it. Tests
//! use [`crate::fixtures::StaticRasterizer`] instead.

use dossier_core::{Error, Result};
use image::RgbImage;
use pdfium_render::prelude::*;
use tracing::debug;

/// A rasterized document: up to `page_cap` rendered pages plus the true page
/// count so callers can report how many were omitted.
#[derive(Debug)]
pub struct RasterizedDocument {
    pub pages: Vec<RgbImage>,
    pub total_pages: usize,
}

/// Renders the leading pages of a PDF to RGB bitmaps.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(&self, data: &[u8], scale: f32, page_cap: usize) -> Result<RasterizedDocument>;
}

/// Pdfium-backed rasterizer. Looks for the pdfium library next to the binary
/// first, then falls back to the system library path.
pub struct PdfiumRasterizer;

impl PdfiumRasterizer {
    pub fn new() -> Self {
        Self
    }

    fn bind() -> Result<Pdfium> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| Error::Render(format!("pdfium library unavailable: {:?}", e)))?;
        Ok(Pdfium::new(bindings))
    }
}

impl Default for PdfiumRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, data: &[u8], scale: f32, page_cap: usize) -> Result<RasterizedDocument> {
        if !data.starts_with(b"%PDF") {
            return Err(Error::Render("data does not start with %PDF".to_string()));
        }

        let pdfium = Self::bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|e| Error::Render(format!("pdf open failed: {:?}", e)))?;

        let total_pages = document.pages().len() as usize;
        let config = PdfRenderConfig::new().scale_page_by_factor(scale);

        let mut pages = Vec::with_capacity(total_pages.min(page_cap));
        for (index, page) in document.pages().iter().enumerate() {
            if index >= page_cap {
                break;
            }
            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| {
                    Error::Render(format!("rasterize page {} failed: {:?}", index + 1, e))
                })?;
            pages.push(bitmap.as_image().to_rgb8());
        }

        debug!(
            total_pages,
            rendered = pages.len(),
            "pdf: document rasterized"
        );
        Ok(RasterizedDocument { pages, total_pages })
    }
}
