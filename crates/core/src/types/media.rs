//! Image MIME types accepted for staged uploads.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`ImageMimeType`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MimeTypeError {
    /// The input string is empty.
    #[error("mime type cannot be empty")]
    Empty,
    /// Not an image type this panel knows how to upload.
    #[error("unsupported image type: {0}")]
    Unsupported(String),
}

/// An image MIME type that Shopify accepts as product or file media.
///
/// Parsing is lenient about case and ignores parameters, so
/// `"Image/JPEG; charset=binary"` parses as [`ImageMimeType::Jpeg`].
/// `image/jpg` is a common non-standard spelling and is accepted as JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageMimeType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMimeType {
    /// Types accepted when no explicit allow-list is configured.
    pub const DEFAULT_ALLOWED: [Self; 3] = [Self::Jpeg, Self::Png, Self::Gif];

    /// Parse a MIME type string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not a supported image type.
    pub fn parse(s: &str) -> Result<Self, MimeTypeError> {
        let essence = s.split(';').next().unwrap_or(s).trim().to_ascii_lowercase();
        match essence.as_str() {
            "" => Err(MimeTypeError::Empty),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/gif" => Ok(Self::Gif),
            "image/webp" => Ok(Self::Webp),
            _ => Err(MimeTypeError::Unsupported(essence)),
        }
    }

    /// Canonical MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// Detect the image type from the leading magic bytes of `data`.
    ///
    /// Returns `None` when the content does not start like any supported
    /// image format.
    #[must_use]
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match data {
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x89, b'P', b'N', b'G', ..] => Some(Self::Png),
            [b'G', b'I', b'F', b'8', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            _ => None,
        }
    }
}

impl fmt::Display for ImageMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImageMimeType {
    type Err = MimeTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ImageMimeType {
    type Error = MimeTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ImageMimeType> for String {
    fn from(value: ImageMimeType) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        assert_eq!(ImageMimeType::parse("image/png").unwrap(), ImageMimeType::Png);
        assert_eq!(ImageMimeType::parse("image/gif").unwrap(), ImageMimeType::Gif);
        assert_eq!(ImageMimeType::parse("image/webp").unwrap(), ImageMimeType::Webp);
    }

    #[test]
    fn test_parse_jpeg_aliases_and_parameters() {
        assert_eq!(ImageMimeType::parse("image/jpg").unwrap(), ImageMimeType::Jpeg);
        assert_eq!(
            ImageMimeType::parse("Image/JPEG; charset=binary").unwrap(),
            ImageMimeType::Jpeg
        );
    }

    #[test]
    fn test_parse_rejects_non_images() {
        assert_eq!(ImageMimeType::parse(""), Err(MimeTypeError::Empty));
        assert_eq!(
            ImageMimeType::parse("application/pdf"),
            Err(MimeTypeError::Unsupported("application/pdf".to_string()))
        );
        assert!(ImageMimeType::parse("image/svg+xml").is_err());
    }

    #[test]
    fn test_default_allowed_excludes_webp() {
        assert!(!ImageMimeType::DEFAULT_ALLOWED.contains(&ImageMimeType::Webp));
        assert!(ImageMimeType::DEFAULT_ALLOWED.contains(&ImageMimeType::Jpeg));
    }

    #[test]
    fn test_sniff_magic_bytes() {
        assert_eq!(ImageMimeType::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageMimeType::Jpeg));
        assert_eq!(
            ImageMimeType::sniff(b"\x89PNG\r\n\x1a\n"),
            Some(ImageMimeType::Png)
        );
        assert_eq!(ImageMimeType::sniff(b"GIF89a"), Some(ImageMimeType::Gif));
        assert_eq!(
            ImageMimeType::sniff(b"RIFF\0\0\0\0WEBPVP8 "),
            Some(ImageMimeType::Webp)
        );
    }

    #[test]
    fn test_sniff_rejects_other_content() {
        assert_eq!(ImageMimeType::sniff(b"%PDF-1.7"), None);
        assert_eq!(ImageMimeType::sniff(&[0xFF, 0xD8]), None);
        assert_eq!(ImageMimeType::sniff(b""), None);
    }

    #[test]
    fn test_serde_roundtrip_uses_mime_string() {
        let json = serde_json::to_string(&ImageMimeType::Png).unwrap();
        assert_eq!(json, "\"image/png\"");
        let parsed: ImageMimeType = serde_json::from_str("\"image/jpg\"").unwrap();
        assert_eq!(parsed, ImageMimeType::Jpeg);
    }
}
