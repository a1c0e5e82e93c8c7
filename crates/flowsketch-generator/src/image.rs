//! Diagram image intake.
//!
//! Size and type policy runs here, before anything touches the network:
//! accepted types are JPEG, PNG, GIF and WebP, and anything over the
//! 2 MiB ceiling is refused outright.

use std::path::Path;

use base64::Engine;

use crate::error::GeneratorError;

/// Client-side size ceiling, in bytes.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Accepted image media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl MediaType {
    /// The MIME string sent in the image content block.
    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Gif => "image/gif",
            MediaType::WebP => "image/webp",
        }
    }

    /// Parse a declared MIME string.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(MediaType::Jpeg),
            "image/png" => Some(MediaType::Png),
            "image/gif" => Some(MediaType::Gif),
            "image/webp" => Some(MediaType::WebP),
            _ => None,
        }
    }

    /// Detect the type from magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(MediaType::Jpeg)
        } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(MediaType::Png)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(MediaType::Gif)
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(MediaType::WebP)
        } else {
            None
        }
    }
}

/// A validated workflow diagram image.
#[derive(Debug, Clone)]
pub struct DiagramImage {
    media_type: MediaType,
    data: Vec<u8>,
}

impl DiagramImage {
    /// Accept raw bytes with a known media type, enforcing the ceiling.
    pub fn new(media_type: MediaType, data: Vec<u8>) -> Result<Self, GeneratorError> {
        if data.len() > MAX_IMAGE_BYTES {
            return Err(GeneratorError::ImageTooLarge {
                size: data.len(),
                limit: MAX_IMAGE_BYTES,
            });
        }
        Ok(Self { media_type, data })
    }

    /// Accept bytes with a caller-declared MIME string.
    pub fn from_declared(mime: &str, data: Vec<u8>) -> Result<Self, GeneratorError> {
        if data.len() > MAX_IMAGE_BYTES {
            return Err(GeneratorError::ImageTooLarge {
                size: data.len(),
                limit: MAX_IMAGE_BYTES,
            });
        }
        let media_type = MediaType::from_mime(mime)
            .ok_or_else(|| GeneratorError::UnsupportedImageType(mime.to_string()))?;
        Ok(Self { media_type, data })
    }

    /// Accept bytes, detecting the type from magic bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, GeneratorError> {
        if data.len() > MAX_IMAGE_BYTES {
            return Err(GeneratorError::ImageTooLarge {
                size: data.len(),
                limit: MAX_IMAGE_BYTES,
            });
        }
        let media_type = MediaType::sniff(&data).ok_or_else(|| {
            GeneratorError::UnsupportedImageType("unrecognized image data".to_string())
        })?;
        Ok(Self { media_type, data })
    }

    /// Read and validate a local image file.
    pub fn from_path(path: &Path) -> Result<Self, GeneratorError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Base64 payload for the image content block.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png_bytes(len: usize) -> Vec<u8> {
        let mut data = PNG_MAGIC.to_vec();
        data.resize(len, 0);
        data
    }

    #[test]
    fn test_accepts_file_at_the_ceiling() {
        let image = DiagramImage::from_bytes(png_bytes(MAX_IMAGE_BYTES)).unwrap();
        assert_eq!(image.media_type(), MediaType::Png);
        assert_eq!(image.len(), MAX_IMAGE_BYTES);
    }

    #[test]
    fn test_rejects_file_over_the_ceiling() {
        let err = DiagramImage::from_bytes(png_bytes(MAX_IMAGE_BYTES + 1)).unwrap_err();
        match err {
            GeneratorError::ImageTooLarge { size, limit } => {
                assert_eq!(size, MAX_IMAGE_BYTES + 1);
                assert_eq!(limit, MAX_IMAGE_BYTES);
            }
            other => panic!("expected ImageTooLarge, got {other:?}"),
        }
        assert!(err.is_input_error());
    }

    #[test]
    fn test_rejects_unknown_bytes() {
        let err = DiagramImage::from_bytes(vec![0u8; 64]).unwrap_err();
        assert!(matches!(err, GeneratorError::UnsupportedImageType(_)));
    }

    #[test]
    fn test_sniff_magic_bytes() {
        assert_eq!(MediaType::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(MediaType::Jpeg));
        assert_eq!(MediaType::sniff(&PNG_MAGIC), Some(MediaType::Png));
        assert_eq!(MediaType::sniff(b"GIF89a...."), Some(MediaType::Gif));
        assert_eq!(MediaType::sniff(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some(MediaType::WebP));
        assert_eq!(MediaType::sniff(b"<html>"), None);
        assert_eq!(MediaType::sniff(b""), None);
    }

    #[test]
    fn test_declared_mime_parsing() {
        assert_eq!(MediaType::from_mime("image/jpeg"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_mime("image/jpg"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_mime("IMAGE/PNG"), Some(MediaType::Png));
        assert_eq!(MediaType::from_mime("image/svg+xml"), None);
        assert_eq!(MediaType::from_mime("application/pdf"), None);
    }

    #[test]
    fn test_from_declared_rejects_foreign_type() {
        let err = DiagramImage::from_declared("application/pdf", vec![1, 2, 3]).unwrap_err();
        match err {
            GeneratorError::UnsupportedImageType(mime) => assert_eq!(mime, "application/pdf"),
            other => panic!("expected UnsupportedImageType, got {other:?}"),
        }
    }

    #[test]
    fn test_size_is_checked_before_type() {
        // An oversized PDF reports the size problem first, as the widget did.
        let err =
            DiagramImage::from_declared("application/pdf", vec![0; MAX_IMAGE_BYTES + 1]).unwrap_err();
        assert!(matches!(err, GeneratorError::ImageTooLarge { .. }));
    }

    #[test]
    fn test_from_path_reads_and_sniffs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&png_bytes(128)).unwrap();

        let image = DiagramImage::from_path(file.path()).unwrap();
        assert_eq!(image.media_type(), MediaType::Png);
        assert_eq!(image.media_type().as_mime(), "image/png");
    }

    #[test]
    fn test_base64_roundtrip() {
        let image = DiagramImage::new(MediaType::Jpeg, vec![0xFF, 0xD8, 0xFF]).unwrap();
        assert_eq!(image.to_base64(), "/9j/");
    }
}
