//! # dossier-render
//!
//! Turns stored attachments into normalized JPEG pages ready for report
//! layout. Images are flattened and downscaled in-process; PDFs are
//! rasterized page by page behind the [`pdf::PageRasterizer`] seam; office
//! documents take a backend round trip ([`office::convert_office_to_pdf`])
//! and then follow the PDF path. Everything converges on
//! [`renderer::DocumentRenderer::render`].

pub mod fixtures;
pub mod format;
pub mod office;
pub mod pdf;
pub mod raster;
pub mod renderer;

pub use format::AttachmentKind;
pub use office::{convert_office_to_pdf, TempCopy};
pub use pdf::{PageRasterizer, PdfiumRasterizer, RasterizedDocument};
pub use raster::{compress_rgb, normalize_image, ImageLimits};
pub use renderer::{DocumentRenderer, RenderConfig, RenderOutcome};
