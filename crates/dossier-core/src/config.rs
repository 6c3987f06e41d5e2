//! Environment-driven configuration for the archive pipeline.
//!
//! All tunables default to the constants in [`crate::defaults`]; environment
//! variables override them. `ARCHIVE_ROOT_FOLDER_ID` is the only required
//! setting: it names the backend folder under which every project root is
//! resolved.

use std::str::FromStr;

use crate::defaults;
use crate::error::{Error, Result};

/// Runtime configuration for the archive and render pipeline.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Backend handle of the root folder all project folders live under.
    pub root_folder_id: String,

    /// Raster attachment caps (pixels) and JPEG quality.
    pub image_max_width: u32,
    pub image_max_height: u32,
    pub image_jpeg_quality: u8,

    /// PDF rasterization scale, page cap, page caps (pixels), JPEG quality.
    pub pdf_scale_factor: f32,
    pub pdf_page_cap: usize,
    pub pdf_page_max_width: u32,
    pub pdf_page_max_height: u32,
    pub pdf_page_jpeg_quality: u8,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            root_folder_id: String::new(),
            image_max_width: defaults::IMAGE_MAX_WIDTH,
            image_max_height: defaults::IMAGE_MAX_HEIGHT,
            image_jpeg_quality: defaults::IMAGE_JPEG_QUALITY,
            pdf_scale_factor: defaults::PDF_SCALE_FACTOR,
            pdf_page_cap: defaults::PDF_PAGE_CAP,
            pdf_page_max_width: defaults::PDF_PAGE_MAX_WIDTH,
            pdf_page_max_height: defaults::PDF_PAGE_MAX_HEIGHT,
            pdf_page_jpeg_quality: defaults::PDF_PAGE_JPEG_QUALITY,
        }
    }
}

impl ArchiveConfig {
    /// Load configuration from the environment (reading `.env` if present).
    ///
    /// Fails with `Error::Config` when `ARCHIVE_ROOT_FOLDER_ID` is unset or
    /// when an override variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let root_folder_id = std::env::var("ARCHIVE_ROOT_FOLDER_ID")
            .map_err(|_| Error::Config("ARCHIVE_ROOT_FOLDER_ID is not set".to_string()))?;
        if root_folder_id.trim().is_empty() {
            return Err(Error::Config("ARCHIVE_ROOT_FOLDER_ID is empty".to_string()));
        }

        Ok(Self {
            root_folder_id,
            image_max_width: env_or("ARCHIVE_IMAGE_MAX_WIDTH", defaults::IMAGE_MAX_WIDTH)?,
            image_max_height: env_or("ARCHIVE_IMAGE_MAX_HEIGHT", defaults::IMAGE_MAX_HEIGHT)?,
            image_jpeg_quality: env_or("ARCHIVE_IMAGE_JPEG_QUALITY", defaults::IMAGE_JPEG_QUALITY)?,
            pdf_scale_factor: env_or("ARCHIVE_PDF_SCALE_FACTOR", defaults::PDF_SCALE_FACTOR)?,
            pdf_page_cap: env_or("ARCHIVE_PDF_PAGE_CAP", defaults::PDF_PAGE_CAP)?,
            pdf_page_max_width: env_or("ARCHIVE_PDF_PAGE_MAX_WIDTH", defaults::PDF_PAGE_MAX_WIDTH)?,
            pdf_page_max_height: env_or(
                "ARCHIVE_PDF_PAGE_MAX_HEIGHT",
                defaults::PDF_PAGE_MAX_HEIGHT,
            )?,
            pdf_page_jpeg_quality: env_or(
                "ARCHIVE_PDF_PAGE_JPEG_QUALITY",
                defaults::PDF_PAGE_JPEG_QUALITY,
            )?,
        })
    }
}

/// Read an environment variable, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| Error::Config(format!("{} has invalid value '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}
