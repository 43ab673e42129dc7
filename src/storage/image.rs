use crate::storage::error::StorageError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

pub const DEFAULT_MAX_WIDTH: u32 = 1920;
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Downscale and re-encode settings applied before upload.
#[derive(Debug, Clone, Copy)]
pub struct PreprocessOptions {
    pub max_width: u32,
    /// JPEG quality, 0-100.
    pub quality: u8,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        PreprocessOptions {
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Result of preprocessing: always JPEG, original filename preserved.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub data: Bytes,
    pub filename: String,
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub modified_at: DateTime<Utc>,
}

/// Decode `data`, clamp its width to `options.max_width` keeping the
/// aspect ratio (never upscaling), and re-encode as JPEG.
///
/// Pure and CPU-bound; the gateway runs it on a blocking thread.
pub fn preprocess(
    data: &[u8],
    filename: &str,
    options: PreprocessOptions,
) -> Result<ProcessedImage, StorageError> {
    let img = image::load_from_memory(data).map_err(|e| StorageError::Decode(e.to_string()))?;

    let (width, height) = (img.width(), img.height());
    let img = if width > options.max_width {
        let target_height = scaled_height(width, height, options.max_width);
        img.resize_exact(options.max_width, target_height, FilterType::Lanczos3)
    } else {
        img
    };

    let (out_width, out_height) = (img.width(), img.height());

    // JPEG has no alpha channel
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, options.quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| StorageError::Encode(e.to_string()))?;

    Ok(ProcessedImage {
        data: Bytes::from(buf),
        filename: filename.to_string(),
        content_type: "image/jpeg",
        width: out_width,
        height: out_height,
        modified_at: Utc::now(),
    })
}

/// round(height * max_width / width), floored at 1 pixel.
pub fn scaled_height(width: u32, height: u32, max_width: u32) -> u32 {
    let scaled = (height as u64 * max_width as u64 + width as u64 / 2) / width as u64;
    (scaled as u32).max(1)
}
