//! Reference image compression.
//!
//! Uploaded images are downscaled so the longest side is at most
//! [`MAX_DIMENSION`] pixels, re-encoded as JPEG at [`JPEG_QUALITY`], and
//! stored inline as a `data:` URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

/// Longest allowed edge of a stored image, in pixels.
pub const MAX_DIMENSION: u32 = 800;

/// JPEG quality factor (1-100) used for every stored image.
pub const JPEG_QUALITY: u8 = 70;

/// Prefix of every stored image.
pub const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Image compression task failed: {0}")]
    Task(String),
}

/// A compressed image ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub width: u32,
    pub height: u32,
    pub data_url: String,
}

/// Scale `(width, height)` down so neither side exceeds `max`, preserving the
/// aspect ratio. Dimensions already within bounds are returned unchanged.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let (long, short) = if width >= height {
        (width, height)
    } else {
        (height, width)
    };
    let scaled_short = ((u64::from(short) * u64::from(max) + u64::from(long) / 2) / u64::from(long))
        .max(1) as u32;
    if width >= height {
        (max, scaled_short)
    } else {
        (scaled_short, max)
    }
}

/// Decode, downscale and re-encode an uploaded image.
///
/// CPU-bound; call [`compress_async`] from async code.
pub fn compress(bytes: &[u8]) -> Result<CompressedImage, ImageError> {
    let decoded = image::load_from_memory(bytes).map_err(ImageError::Decode)?;
    let (width, height) = fit_within(decoded.width(), decoded.height(), MAX_DIMENSION);
    let resized = if (width, height) == (decoded.width(), decoded.height()) {
        decoded
    } else {
        decoded.resize_exact(width, height, FilterType::Triangle)
    };

    let rgb = resized.to_rgb8();
    let mut encoded = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY))
        .map_err(ImageError::Encode)?;

    Ok(CompressedImage {
        width,
        height,
        data_url: format!("{DATA_URL_PREFIX}{}", STANDARD.encode(&encoded)),
    })
}

/// Run [`compress`] on the blocking thread pool.
pub async fn compress_async(bytes: Vec<u8>) -> Result<CompressedImage, ImageError> {
    tokio::task::spawn_blocking(move || compress(&bytes))
        .await
        .map_err(|e| ImageError::Task(e.to_string()))?
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    use super::*;

    /// Encode a solid-colour PNG of the given size.
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 120, 40]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    fn decode_data_url(data_url: &str) -> DynamicImage {
        let payload = data_url.strip_prefix(DATA_URL_PREFIX).unwrap();
        let bytes = STANDARD.decode(payload).unwrap();
        image::load_from_memory(&bytes).unwrap()
    }

    #[test]
    fn fit_within_keeps_small_images() {
        assert_eq!(fit_within(640, 480, 800), (640, 480));
        assert_eq!(fit_within(800, 800, 800), (800, 800));
    }

    #[test]
    fn fit_within_scales_longest_side() {
        assert_eq!(fit_within(1600, 900, 800), (800, 450));
        assert_eq!(fit_within(900, 1600, 800), (450, 800));
        assert_eq!(fit_within(4000, 1, 800), (800, 1));
    }

    #[test]
    fn compress_downscales_and_produces_jpeg_data_url() {
        let result = compress(&png_bytes(1600, 1200)).unwrap();
        assert_eq!((result.width, result.height), (800, 600));
        assert!(result.data_url.starts_with(DATA_URL_PREFIX));

        let decoded = decode_data_url(&result.data_url);
        assert_eq!((decoded.width(), decoded.height()), (800, 600));
    }

    #[test]
    fn compress_does_not_upscale() {
        let result = compress(&png_bytes(120, 80)).unwrap();
        assert_eq!((result.width, result.height), (120, 80));
    }

    #[test]
    fn compress_rejects_garbage() {
        let err = compress(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }

    #[tokio::test]
    async fn compress_async_matches_sync_dimensions() {
        let result = compress_async(png_bytes(1000, 2000)).await.unwrap();
        assert_eq!((result.width, result.height), (400, 800));
    }
}
