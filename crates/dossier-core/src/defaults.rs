//! Centralized default constants for the dossier archive pipeline.
//!
//! **This module is the single source of truth** for all shared default
//! values. The archive, render, and report crates reference these constants
//! instead of defining their own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// IMAGE NORMALIZATION
// =============================================================================

/// Maximum width in pixels for a raster attachment embedded in a report.
pub const IMAGE_MAX_WIDTH: u32 = 1200;

/// Maximum height in pixels for a raster attachment embedded in a report.
pub const IMAGE_MAX_HEIGHT: u32 = 1600;

/// JPEG quality for normalized raster attachments (1-100, lower = smaller).
pub const IMAGE_JPEG_QUALITY: u8 = 75;

// =============================================================================
// PDF RASTERIZATION
// =============================================================================

/// Page scale factor for rasterizing source PDFs. 1.33 is roughly 96 DPI,
/// chosen to bound output size over fidelity.
pub const PDF_SCALE_FACTOR: f32 = 1.33;

/// Maximum number of source PDF pages rendered per attachment. Pages beyond
/// the cap are reported as omitted via a truncation note.
pub const PDF_PAGE_CAP: usize = 20;

/// Maximum width in pixels for a rasterized PDF page.
pub const PDF_PAGE_MAX_WIDTH: u32 = 1000;

/// Maximum height in pixels for a rasterized PDF page.
pub const PDF_PAGE_MAX_HEIGHT: u32 = 1400;

/// JPEG quality for rasterized PDF pages.
pub const PDF_PAGE_JPEG_QUALITY: u8 = 70;

// =============================================================================
// REPORT GEOMETRY (points, A4)
// =============================================================================

/// Report page width in points.
pub const REPORT_PAGE_WIDTH: f32 = 595.0;

/// Report page height in points.
pub const REPORT_PAGE_HEIGHT: f32 = 842.0;

/// Report page margin in points (0.5 inch).
pub const REPORT_MARGIN: f32 = 36.0;

/// Maximum width in points of the attachment image content area.
pub const REPORT_IMAGE_AREA_WIDTH: f32 = 446.0;

/// Maximum height in points of the attachment image content area.
pub const REPORT_IMAGE_AREA_HEIGHT: f32 = 576.0;

// =============================================================================
// FOLDER NAMESPACE
// =============================================================================

/// Prefix for top-level element folders under a project root. The folder for
/// task code `3.1.2` lives at `{project}/Element 3/3.1/3.1.2 ...`.
pub const ELEMENT_FOLDER_PREFIX: &str = "Element ";

/// Name prefix for temporary blobs created during an office conversion round
/// trip. Always deleted before the conversion returns.
pub const TEMP_CONVERT_PREFIX: &str = "_temp_convert_";
