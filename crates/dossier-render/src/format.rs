//! Attachment classification by filename extension.

use dossier_archive::ConvertibleKind;

/// How an attachment enters the rendering pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Raster image, rendered as a single page.
    Image,
    /// PDF, rasterized page by page.
    Pdf,
    /// Office document, converted to PDF via the backend round trip first.
    Office(ConvertibleKind),
    /// Anything else. Renders to zero pages; the report shows a placeholder.
    Unsupported,
}

impl AttachmentKind {
    /// Classify by extension (lowercased, no dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" => AttachmentKind::Image,
            "pdf" => AttachmentKind::Pdf,
            other => match ConvertibleKind::from_extension(other) {
                Some(kind) => AttachmentKind::Office(kind),
                None => AttachmentKind::Unsupported,
            },
        }
    }

    /// Classify a full filename. Files without an extension are unsupported.
    pub fn from_filename(filename: &str) -> Self {
        match extension_of(filename) {
            Some(ext) => Self::from_extension(&ext),
            None => AttachmentKind::Unsupported,
        }
    }
}

/// Lowercased extension of `filename`, without the dot.
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
