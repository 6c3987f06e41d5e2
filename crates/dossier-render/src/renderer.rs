//! The single entry point turning a stored attachment into rendered pages.

use std::sync::Arc;

use dossier_core::{ArchiveConfig, BlobId, RenderedPage, Result};
use dossier_archive::BlobBackend;
use tracing::{debug, info};

use crate::format::AttachmentKind;
use crate::office::convert_office_to_pdf;
use crate::pdf::PageRasterizer;
use crate::raster::{compress_rgb, normalize_image, ImageLimits};

/// Rendering tunables, split out of [`ArchiveConfig`] so the renderer does
/// not carry backend settings.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub image: ImageLimits,
    pub pdf_page: ImageLimits,
    pub pdf_scale: f32,
    pub pdf_page_cap: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image: ImageLimits::attachment_image(),
            pdf_page: ImageLimits::pdf_page(),
            pdf_scale: dossier_core::defaults::PDF_SCALE_FACTOR,
            pdf_page_cap: dossier_core::defaults::PDF_PAGE_CAP,
        }
    }
}

impl From<&ArchiveConfig> for RenderConfig {
    fn from(config: &ArchiveConfig) -> Self {
        Self {
            image: ImageLimits {
                max_width: config.image_max_width,
                max_height: config.image_max_height,
                quality: config.image_jpeg_quality,
            },
            pdf_page: ImageLimits {
                max_width: config.pdf_page_max_width,
                max_height: config.pdf_page_max_height,
                quality: config.pdf_page_jpeg_quality,
            },
            pdf_scale: config.pdf_scale_factor,
            pdf_page_cap: config.pdf_page_cap,
        }
    }
}

/// Result of rendering one attachment.
#[derive(Debug)]
pub struct RenderOutcome {
    pub kind: AttachmentKind,
    pub pages: Vec<RenderedPage>,
    /// True page count of the source document. Equals `pages.len()` unless
    /// the page cap truncated the render.
    pub total_pages: usize,
}

impl RenderOutcome {
    fn empty(kind: AttachmentKind) -> Self {
        Self {
            kind,
            pages: Vec::new(),
            total_pages: 0,
        }
    }

    /// Pages dropped by the page cap.
    pub fn omitted_pages(&self) -> usize {
        self.total_pages.saturating_sub(self.pages.len())
    }
}

/// Renders any supported attachment to normalized JPEG pages.
pub struct DocumentRenderer {
    blobs: Arc<dyn BlobBackend>,
    rasterizer: Arc<dyn PageRasterizer>,
    config: RenderConfig,
}

impl DocumentRenderer {
    pub fn new(
        blobs: Arc<dyn BlobBackend>,
        rasterizer: Arc<dyn PageRasterizer>,
        config: RenderConfig,
    ) -> Self {
        Self {
            blobs,
            rasterizer,
            config,
        }
    }

    /// Render `data` (the attachment's stored bytes) according to the kind
    /// implied by `filename`.
    ///
    /// Unsupported kinds succeed with zero pages; the report layer turns
    /// those, and any `Err` from here, into an in-report placeholder.
    pub async fn render(
        &self,
        blob_id: &BlobId,
        filename: &str,
        data: &[u8],
    ) -> Result<RenderOutcome> {
        let kind = AttachmentKind::from_filename(filename);
        debug!(filename, ?kind, size_bytes = data.len(), "render: start");

        let outcome = match kind {
            AttachmentKind::Image => {
                let page = normalize_image(data, &self.config.image)?;
                RenderOutcome {
                    kind,
                    pages: vec![page],
                    total_pages: 1,
                }
            }
            AttachmentKind::Pdf => {
                let (pages, total_pages) = self.render_pdf(data)?;
                RenderOutcome {
                    kind,
                    pages,
                    total_pages,
                }
            }
            AttachmentKind::Office(office_kind) => {
                let pdf =
                    convert_office_to_pdf(&self.blobs, blob_id, filename, office_kind).await?;
                let (pages, total_pages) = self.render_pdf(&pdf)?;
                RenderOutcome {
                    kind,
                    pages,
                    total_pages,
                }
            }
            AttachmentKind::Unsupported => RenderOutcome::empty(kind),
        };

        info!(
            filename,
            ?kind,
            page_count = outcome.pages.len(),
            total_pages = outcome.total_pages,
            "render: complete"
        );
        Ok(outcome)
    }

    fn render_pdf(&self, data: &[u8]) -> Result<(Vec<RenderedPage>, usize)> {
        let raster = self
            .rasterizer
            .rasterize(data, self.config.pdf_scale, self.config.pdf_page_cap)?;
        let total_pages = raster.total_pages;
        let pages = raster
            .pages
            .into_iter()
            .map(|page| compress_rgb(page, &self.config.pdf_page))
            .collect::<Result<Vec<_>>>()?;
        Ok((pages, total_pages))
    }
}
