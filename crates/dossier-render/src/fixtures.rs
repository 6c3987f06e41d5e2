//! Deterministic rasterizer for tests and offline development.
//!
//! Lives in the production module tree (not behind `cfg(test)`) so
//! integration tests and downstream crates can drive the PDF path without a
//! pdfium library present.

use dossier_core::{Error, Result};
use image::{Rgb, RgbImage};

use crate::pdf::{PageRasterizer, RasterizedDocument};

/// Produces `total_pages` uniform gray pages of a fixed size, subject to the
/// caller's page cap. The PDF bytes are only checked for the `%PDF` magic.
pub struct StaticRasterizer {
    pub page_width: u32,
    pub page_height: u32,
    pub total_pages: usize,
}

impl StaticRasterizer {
    pub fn new(total_pages: usize) -> Self {
        Self {
            page_width: 612,
            page_height: 792,
            total_pages,
        }
    }
}

impl PageRasterizer for StaticRasterizer {
    fn rasterize(&self, data: &[u8], _scale: f32, page_cap: usize) -> Result<RasterizedDocument> {
        if !data.starts_with(b"%PDF") {
            return Err(Error::Render("data does not start with %PDF".to_string()));
        }
        let rendered = self.total_pages.min(page_cap);
        let pages = (0..rendered)
            .map(|_| RgbImage::from_pixel(self.page_width, self.page_height, Rgb([240, 240, 240])))
            .collect();
        Ok(RasterizedDocument {
            pages,
            total_pages: self.total_pages,
        })
    }
}
