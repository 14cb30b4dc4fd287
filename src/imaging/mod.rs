/// Photo capture and compression module
///
/// This module handles:
/// - Decoding a user-selected photo into a pixel buffer
/// - Bounding its size (800px evidence photos, 300px square avatars)
/// - Re-encoding to JPEG and wrapping it as a data URL (encoded.rs)

pub mod compress;
pub mod encoded;

pub use compress::{
    compress_bytes, compress_file, compress_in_background, CompressionProfile, ImagingError,
    AVATAR_SIZE, EVIDENCE_MAX_DIMENSION, JPEG_QUALITY,
};
pub use encoded::EncodedImage;
