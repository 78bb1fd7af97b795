//! Attachment image sniffing
//!
//! Rendering stays out of scope; callers only need to know whether
//! attachment bytes look like a supported raster format before display.

/// Supported attachment formats, detected by signature bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Detect the format of `bytes` from its leading signature.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.len() < 4 {
        return None;
    }
    if bytes.starts_with(&PNG_MAGIC) {
        Some(ImageFormat::Png)
    } else if bytes.starts_with(&JPEG_MAGIC) {
        Some(ImageFormat::Jpeg)
    } else {
        None
    }
}

/// Whether `bytes` (if present) carry a recognised image signature.
pub fn is_valid_image(bytes: Option<&[u8]>) -> bool {
    bytes.is_some_and(|b| detect_format(b).is_some())
}
