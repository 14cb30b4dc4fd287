use image::codecs::jpeg::JpegEncoder;
use image::{imageops::FilterType, DynamicImage};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task;
use tracing::debug;

use super::EncodedImage;

/// Longest edge allowed for evidence photos
pub const EVIDENCE_MAX_DIMENSION: u32 = 800;

/// Edge of the square avatar crop
pub const AVATAR_SIZE: u32 = 300;

/// JPEG quality factor (0-100)
pub const JPEG_QUALITY: u8 = 70;

const JPEG_MIME: &str = "image/jpeg";

/// How a photo should be bounded before re-encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionProfile {
    /// Report evidence: scale down so the longer edge is at most 800px
    Evidence,
    /// Profile avatar: 300x300 centre crop
    Avatar,
}

#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode JPEG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("image is not a base64 data URL")]
    InvalidDataUrl,

    #[error("image task join error: {0}")]
    Join(String),
}

/// Compress a picked file on the blocking pool.
///
/// `None` means the picker was cancelled; that is a no-op, not an error.
pub async fn compress_file(
    path: Option<PathBuf>,
    profile: CompressionProfile,
) -> Result<Option<EncodedImage>, ImagingError> {
    let Some(path) = path else {
        return Ok(None);
    };

    // Spawn blocking because decode + resize is CPU-intensive
    task::spawn_blocking(move || compress_file_blocking(&path, profile).map(Some))
        .await
        .map_err(|e| ImagingError::Join(e.to_string()))?
}

/// Compress bytes that are already in memory, off the caller's thread
pub async fn compress_in_background(
    bytes: Vec<u8>,
    profile: CompressionProfile,
) -> Result<EncodedImage, ImagingError> {
    task::spawn_blocking(move || compress_bytes(&bytes, profile))
        .await
        .map_err(|e| ImagingError::Join(e.to_string()))?
}

fn compress_file_blocking(
    path: &Path,
    profile: CompressionProfile,
) -> Result<EncodedImage, ImagingError> {
    let bytes = std::fs::read(path).map_err(|source| ImagingError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    compress_bytes(&bytes, profile)
}

/// Decode, bound and re-encode a photo (blocking)
pub fn compress_bytes(
    bytes: &[u8],
    profile: CompressionProfile,
) -> Result<EncodedImage, ImagingError> {
    let img = image::load_from_memory(bytes).map_err(ImagingError::Decode)?;
    let (src_w, src_h) = (img.width(), img.height());

    let bounded = bound(img, profile);

    // JPEG has no alpha channel
    let rgb = bounded.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(ImagingError::Encode)?;

    debug!(
        ?profile,
        src_w,
        src_h,
        out_w = rgb.width(),
        out_h = rgb.height(),
        input_bytes = bytes.len(),
        output_bytes = jpeg.len(),
        "compressed photo"
    );

    Ok(EncodedImage::from_bytes(JPEG_MIME, &jpeg))
}

fn bound(img: DynamicImage, profile: CompressionProfile) -> DynamicImage {
    match profile {
        CompressionProfile::Evidence => {
            // Never upscale: small photos pass through at their own size
            if img.width().max(img.height()) <= EVIDENCE_MAX_DIMENSION {
                img
            } else {
                img.resize(
                    EVIDENCE_MAX_DIMENSION,
                    EVIDENCE_MAX_DIMENSION,
                    FilterType::Lanczos3,
                )
            }
        }
        CompressionProfile::Avatar => {
            img.resize_to_fill(AVATAR_SIZE, AVATAR_SIZE, FilterType::Lanczos3)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let buffer = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(buffer)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn decoded_size(encoded: &EncodedImage) -> (u32, u32) {
        let bytes = encoded.decode().unwrap();
        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_evidence_is_bounded_on_longest_edge() {
        let encoded = compress_bytes(&png_bytes(1600, 1200), CompressionProfile::Evidence).unwrap();
        assert_eq!(encoded.mime_type(), "image/jpeg");
        assert_eq!(decoded_size(&encoded), (800, 600));

        let portrait = compress_bytes(&png_bytes(500, 1000), CompressionProfile::Evidence).unwrap();
        assert_eq!(decoded_size(&portrait), (400, 800));
    }

    #[test]
    fn test_small_evidence_is_not_upscaled() {
        let encoded = compress_bytes(&png_bytes(320, 240), CompressionProfile::Evidence).unwrap();
        assert_eq!(decoded_size(&encoded), (320, 240));
    }

    #[test]
    fn test_avatar_is_square_crop() {
        let encoded = compress_bytes(&png_bytes(900, 400), CompressionProfile::Avatar).unwrap();
        assert_eq!(decoded_size(&encoded), (AVATAR_SIZE, AVATAR_SIZE));
    }

    #[test]
    fn test_garbage_input_is_an_error() {
        let result = compress_bytes(b"definitely not an image", CompressionProfile::Evidence);
        assert!(matches!(result, Err(ImagingError::Decode(_))));
    }

    #[tokio::test]
    async fn test_no_file_is_noop() {
        let result = compress_file(None, CompressionProfile::Evidence).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_missing_file_reports_path() {
        let result = compress_file(
            Some(PathBuf::from("/nonexistent/photo.jpg")),
            CompressionProfile::Evidence,
        )
        .await;
        assert!(matches!(result, Err(ImagingError::Read { .. })));
    }

    #[tokio::test]
    async fn test_background_compression() {
        let encoded = compress_in_background(png_bytes(2000, 1000), CompressionProfile::Evidence)
            .await
            .unwrap();
        assert_eq!(decoded_size(&encoded), (800, 400));
    }
}
