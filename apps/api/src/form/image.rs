//! Profile image intake: size limit, format sniffing, and inline `data:` URL storage.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Uploads above this size are rejected.
pub const MAX_PROFILE_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Image upload is empty")]
    Empty,

    #[error("Invalid image data URL")]
    InvalidDataUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageFormat {
    /// Detects the format from magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Some(Self::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(Self::WebP)
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
        }
    }

    fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }
}

/// An embeddable image held as a `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileImage {
    format: ImageFormat,
    data_url: String,
}

impl ProfileImage {
    /// Validates raw upload bytes and encodes them inline.
    pub fn from_upload(bytes: &[u8]) -> Result<Self, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > MAX_PROFILE_IMAGE_BYTES {
            return Err(UploadError::TooLarge {
                size: bytes.len(),
                max: MAX_PROFILE_IMAGE_BYTES,
            });
        }
        let format = ImageFormat::sniff(bytes).ok_or(UploadError::UnsupportedFormat)?;
        let data_url = format!(
            "data:{};base64,{}",
            format.mime(),
            BASE64_STANDARD.encode(bytes)
        );
        Ok(Self { format, data_url })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Decodes the payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, UploadError> {
        let (_, payload) = self
            .data_url
            .split_once(',')
            .ok_or(UploadError::InvalidDataUrl)?;
        BASE64_STANDARD
            .decode(payload)
            .map_err(|_| UploadError::InvalidDataUrl)
    }
}

impl TryFrom<String> for ProfileImage {
    type Error = UploadError;

    fn try_from(data_url: String) -> Result<Self, Self::Error> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or(UploadError::InvalidDataUrl)?;
        let (mime, _) = rest
            .split_once(";base64,")
            .ok_or(UploadError::InvalidDataUrl)?;
        let format = ImageFormat::from_mime(mime).ok_or(UploadError::UnsupportedFormat)?;
        Ok(Self { format, data_url })
    }
}

impl From<ProfileImage> for String {
    fn from(image: ProfileImage) -> Self {
        image.data_url
    }
}
