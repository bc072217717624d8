//! Thumbnail generation from embedded notebook images.
//!
//! Payloads are decoded and resized entirely in memory; the encoded PNG is
//! handed back to the caller, which decides when to write it.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, instrument};

use nbgallery_notebook::RasterPayload;
use nbgallery_shared::{GalleryError, Result, ThumbnailSize};

/// Produces PNG thumbnails that fit a fixed bounding box.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailGenerator {
    max_width: u32,
    max_height: u32,
}

impl ThumbnailGenerator {
    /// Generator for the scaled bounding box of `size`.
    pub fn new(size: ThumbnailSize) -> Self {
        let (max_width, max_height) = size.bounding_box();
        Self {
            max_width,
            max_height,
        }
    }

    /// Decode `payload`, shrink it to fit, and encode it as PNG.
    ///
    /// `source` is the notebook the payload came from and is only used for
    /// error context.
    #[instrument(skip_all, fields(mime = payload.mime, source = %source.display()))]
    pub fn encode(&self, payload: &RasterPayload, source: &Path) -> Result<Vec<u8>> {
        let bytes = decode_base64(&payload.data)
            .map_err(|e| GalleryError::image_decode(source, format!("invalid base64: {e}")))?;

        let img = image::load_from_memory(&bytes)
            .map_err(|e| GalleryError::image_decode(source, e.to_string()))?;

        let thumb = self.shrink(img);

        let mut buf = Cursor::new(Vec::new());
        thumb
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| GalleryError::image_decode(source, format!("PNG encoding failed: {e}")))?;

        debug!(
            width = thumb.width(),
            height = thumb.height(),
            bytes = buf.get_ref().len(),
            "thumbnail encoded"
        );
        Ok(buf.into_inner())
    }

    /// Resize to fit the bounding box; images already inside it are untouched.
    fn shrink(&self, img: DynamicImage) -> DynamicImage {
        let (width, height) = fit_within(
            (img.width(), img.height()),
            (self.max_width, self.max_height),
        );
        if (width, height) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        }
    }
}

/// Largest size with the aspect ratio of `size` that fits inside `bounds`.
///
/// Never upscales and never crops; each side is at least one pixel.
pub fn fit_within(size: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (width, height) = size;
    let (max_width, max_height) = bounds;
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    );
    let fit = |side: u32, max: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max);
    (fit(width, max_width), fit(height, max_height))
}

/// Base64 decode, ignoring the line breaks notebooks embed in payloads.
fn decode_base64(data: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact)
}
