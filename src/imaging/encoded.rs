use base64::{engine::general_purpose::STANDARD, Engine};

use super::ImagingError;

/// A compressed photo carried as a `data:<mime>;base64,<payload>` string.
///
/// This is the form stored on report documents and sent to the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data_url: String,
    /// Byte offset where the base64 payload starts
    payload_start: usize,
}

impl EncodedImage {
    /// Wrap raw encoded bytes (e.g. JPEG output) as a data URL
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        let prefix = format!("data:{mime_type};base64,");
        let payload_start = prefix.len();
        let mut data_url = prefix;
        STANDARD.encode_string(bytes, &mut data_url);
        Self {
            data_url,
            payload_start,
        }
    }

    /// Parse a data URL read back from a stored report
    pub fn from_data_url(data_url: impl Into<String>) -> Result<Self, ImagingError> {
        let data_url = data_url.into();
        let marker = ";base64,";
        let header_end = data_url
            .find(marker)
            .filter(|_| data_url.starts_with("data:"))
            .ok_or(ImagingError::InvalidDataUrl)?;
        let payload_start = header_end + marker.len();
        Ok(Self {
            data_url,
            payload_start,
        })
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn into_data_url(self) -> String {
        self.data_url
    }

    /// MIME type from the data URL header (e.g. `image/jpeg`)
    pub fn mime_type(&self) -> &str {
        let header = &self.data_url["data:".len()..self.payload_start];
        header.trim_end_matches(";base64,")
    }

    /// The base64 payload without the header, as the classifier expects it
    pub fn payload(&self) -> &str {
        &self.data_url[self.payload_start..]
    }

    /// Decode the payload back into encoded image bytes
    pub fn decode(&self) -> Result<Vec<u8>, ImagingError> {
        STANDARD
            .decode(self.payload())
            .map_err(|_| ImagingError::InvalidDataUrl)
    }
}
