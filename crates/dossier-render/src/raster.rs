//! Image normalization: alpha flattening, bounded downscaling, JPEG encoding.

use std::io::Cursor;

use dossier_core::{defaults, Error, RenderedPage, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, ColorType, DynamicImage, Rgb, RgbImage};
use tracing::debug;

/// Bounding box and JPEG quality applied when normalizing a raster.
#[derive(Debug, Clone, Copy)]
pub struct ImageLimits {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
}

impl ImageLimits {
    /// Limits for directly uploaded images.
    pub fn attachment_image() -> Self {
        Self {
            max_width: defaults::IMAGE_MAX_WIDTH,
            max_height: defaults::IMAGE_MAX_HEIGHT,
            quality: defaults::IMAGE_JPEG_QUALITY,
        }
    }

    /// Limits for rasterized PDF pages.
    pub fn pdf_page() -> Self {
        Self {
            max_width: defaults::PDF_PAGE_MAX_WIDTH,
            max_height: defaults::PDF_PAGE_MAX_HEIGHT,
            quality: defaults::PDF_PAGE_JPEG_QUALITY,
        }
    }
}

/// Decode `data`, flatten any alpha channel onto white, downscale to fit
/// `limits`, and re-encode as JPEG.
pub fn normalize_image(data: &[u8], limits: &ImageLimits) -> Result<RenderedPage> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| Error::Render(format!("image decode failed: {}", e)))?;
    compress_rgb(flatten_to_rgb(decoded), limits)
}

/// Downscale `rgb` to fit `limits` (aspect ratio preserved, never upscaled)
/// and encode it as JPEG at the configured quality.
pub fn compress_rgb(rgb: RgbImage, limits: &ImageLimits) -> Result<RenderedPage> {
    let (src_w, src_h) = rgb.dimensions();
    let rgb = match fit_within(src_w, src_h, limits.max_width, limits.max_height) {
        Some((w, h)) => {
            debug!(
                from = format!("{}x{}", src_w, src_h),
                to = format!("{}x{}", w, h),
                "raster: downscaling image"
            );
            imageops::resize(&rgb, w, h, imageops::FilterType::Lanczos3)
        }
        None => rgb,
    };

    let (width, height) = rgb.dimensions();
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(Cursor::new(&mut jpeg), limits.quality);
    encoder
        .encode(rgb.as_raw(), width, height, ColorType::Rgb8)
        .map_err(|e| Error::Render(format!("jpeg encode failed: {}", e)))?;

    Ok(RenderedPage {
        jpeg,
        width,
        height,
    })
}

/// Composite transparent pixels over a white background. Opaque inputs are
/// converted straight to RGB.
fn flatten_to_rgb(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    let mut out = RgbImage::from_pixel(rgba.width(), rgba.height(), Rgb([255, 255, 255]));
    for (x, y, px) in rgba.enumerate_pixels() {
        let alpha = px[3] as u32;
        if alpha == 0 {
            continue;
        }
        let dst = out.get_pixel_mut(x, y);
        for channel in 0..3 {
            let src = px[channel] as u32;
            let bg = dst[channel] as u32;
            dst[channel] = ((src * alpha + bg * (255 - alpha)) / 255) as u8;
        }
    }
    out
}

/// Target dimensions for fitting `(w, h)` inside `(max_w, max_h)`, or `None`
/// when the image already fits.
fn fit_within(w: u32, h: u32, max_w: u32, max_h: u32) -> Option<(u32, u32)> {
    if w <= max_w && h <= max_h {
        return None;
    }
    let ratio = f64::min(max_w as f64 / w as f64, max_h as f64 / h as f64);
    let new_w = ((w as f64 * ratio).round() as u32).max(1);
    let new_h = ((h as f64 * ratio).round() as u32).max(1);
    Some((new_w, new_h))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(img: &DynamicImage) -> Vec<u8> {
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_fit_within_leaves_small_images_alone() {
        assert_eq!(fit_within(800, 600, 1200, 1600), None);
        assert_eq!(fit_within(1200, 1600, 1200, 1600), None);
    }

    #[test]
    fn test_fit_within_preserves_aspect_ratio() {
        // Landscape 4000x3000 against the 1200x1600 box: width binds.
        assert_eq!(fit_within(4000, 3000, 1200, 1600), Some((1200, 900)));
        // Portrait 3000x4000: height binds.
        assert_eq!(fit_within(3000, 4000, 1200, 1600), Some((1200, 1600)));
    }

    #[test]
    fn test_normalize_downscales_oversized_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2400, 3200, Rgb([10, 20, 30])));
        let page = normalize_image(&png_bytes(&img), &ImageLimits::attachment_image()).unwrap();
        assert_eq!((page.width, page.height), (1200, 1600));

        let decoded = image::load_from_memory(&page.jpeg).unwrap();
        assert_eq!(decoded.width(), 1200);
        assert_eq!(decoded.height(), 1600);
    }

    #[test]
    fn test_normalize_keeps_small_image_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, Rgb([200, 100, 50])));
        let page = normalize_image(&png_bytes(&img), &ImageLimits::attachment_image()).unwrap();
        assert_eq!((page.width, page.height), (640, 480));
    }

    #[test]
    fn test_transparency_flattens_to_white() {
        let rgba = image::RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 0]));
        let page =
            normalize_image(&png_bytes(&DynamicImage::ImageRgba8(rgba)), &ImageLimits::attachment_image())
                .unwrap();
        let decoded = image::load_from_memory(&page.jpeg).unwrap().to_rgb8();
        let px = decoded.get_pixel(4, 4);
        // JPEG is lossy; flattened background must still be near-white.
        assert!(px[0] > 245 && px[1] > 245 && px[2] > 245);
    }

    #[test]
    fn test_partial_alpha_blends_toward_white() {
        let rgba = image::RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 128]));
        let page =
            normalize_image(&png_bytes(&DynamicImage::ImageRgba8(rgba)), &ImageLimits::attachment_image())
                .unwrap();
        let decoded = image::load_from_memory(&page.jpeg).unwrap().to_rgb8();
        let px = decoded.get_pixel(4, 4);
        // 50% black over white lands near mid-gray.
        assert!(px[0] > 100 && px[0] < 155);
    }

    #[test]
    fn test_garbage_bytes_fail_with_render_error() {
        let err = normalize_image(b"not an image", &ImageLimits::attachment_image()).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }
}
