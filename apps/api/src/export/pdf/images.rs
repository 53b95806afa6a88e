//! JPEG pass-through embedding (DCTDecode); the bytes go into the file untouched.

use thiserror::Error;

use crate::export::pdf::objects::{PdfDictionary, PdfObject, PdfStream};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Not a JPEG")]
    NotJpeg,
    #[error("JPEG has no frame header")]
    MissingFrame,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegImage {
    pub width: u32,
    pub height: u32,
    pub components: u8,
    data: Vec<u8>,
}

impl JpegImage {
    pub fn parse(data: Vec<u8>) -> Result<Self, ImageError> {
        let (width, height, components) = frame_header(&data)?;
        Ok(Self {
            width,
            height,
            components,
            data,
        })
    }

    fn color_space(&self) -> &'static str {
        match self.components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        }
    }

    pub fn to_xobject(&self) -> PdfStream {
        let mut dict = PdfDictionary::with_type("XObject");
        dict.insert("Subtype", PdfObject::name("Image"));
        dict.insert("Width", PdfObject::Integer(i64::from(self.width)));
        dict.insert("Height", PdfObject::Integer(i64::from(self.height)));
        dict.insert("BitsPerComponent", PdfObject::Integer(8));
        dict.insert("ColorSpace", PdfObject::name(self.color_space()));
        dict.insert("Filter", PdfObject::name("DCTDecode"));
        if self.components == 4 {
            // Adobe CMYK JPEGs are stored inverted.
            dict.insert(
                "Decode",
                PdfObject::Array(
                    [1, 0, 1, 0, 1, 0, 1, 0]
                        .into_iter()
                        .map(PdfObject::Integer)
                        .collect(),
                ),
            );
        }
        PdfStream {
            dict,
            data: self.data.clone(),
            encoded: true,
        }
    }
}

/// Walks JPEG markers to the first SOF segment and reads (width, height, components).
fn frame_header(data: &[u8]) -> Result<(u32, u32, u8), ImageError> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ImageError::NotJpeg);
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return Err(ImageError::MissingFrame);
        }
        let marker = data[pos + 1];
        pos += 2;

        // Standalone markers carry no length.
        if marker == 0xD8 || marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            continue;
        }
        if marker == 0xFF {
            pos -= 1;
            continue;
        }
        if marker == 0xD9 || marker == 0xDA || pos + 2 > data.len() {
            break;
        }

        let length = usize::from(data[pos]) << 8 | usize::from(data[pos + 1]);
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            if pos + 8 > data.len() {
                break;
            }
            let height = u32::from(data[pos + 3]) << 8 | u32::from(data[pos + 4]);
            let width = u32::from(data[pos + 5]) << 8 | u32::from(data[pos + 6]);
            let components = data[pos + 7];
            if width == 0 || height == 0 {
                break;
            }
            return Ok((width, height, components));
        }
        pos += length;
    }

    Err(ImageError::MissingFrame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::image::tests::tiny_jpeg;

    #[test]
    fn test_parse_dimensions() {
        let image = JpegImage::parse(tiny_jpeg()).unwrap();
        assert_eq!((image.width, image.height, image.components), (4, 2, 3));
    }

    #[test]
    fn test_rejects_non_jpeg() {
        assert_eq!(
            JpegImage::parse(b"\x89PNG\r\n\x1a\n".to_vec()),
            Err(ImageError::NotJpeg)
        );
    }

    #[test]
    fn test_rejects_jpeg_without_frame() {
        assert_eq!(
            JpegImage::parse(vec![0xFF, 0xD8, 0xFF, 0xD9]),
            Err(ImageError::MissingFrame)
        );
    }

    #[test]
    fn test_xobject_passes_bytes_through() {
        let bytes = tiny_jpeg();
        let stream = JpegImage::parse(bytes.clone()).unwrap().to_xobject();
        assert_eq!(stream.data, bytes);
        assert!(stream.encoded);
        assert!(matches!(
            stream.dict.get("Filter"),
            Some(PdfObject::Name(n)) if n == "DCTDecode"
        ));
    }
}
