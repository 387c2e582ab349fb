//! Recipe image decoding and validation.
//!
//! Images arrive either as raw bytes from a multipart upload or as a
//! `data:image/<ext>;base64,<payload>` string inside a JSON body. Both paths
//! end in [`validate_image`], which sniffs the real format from magic bytes
//! rather than trusting the declared extension.

use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, ImageReader};

use crate::error::ImageError;

/// Allowed image formats for recipe images.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum file size for images (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

const DATA_URI_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";

/// A decoded `data:image/...` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Extension declared by the client (`png`, `jpeg`, ...), lowercased.
    pub extension: String,
    pub data: Vec<u8>,
}

/// Decode a `data:image/<ext>;base64,<payload>` string into raw bytes.
pub fn decode_data_uri(input: &str) -> Result<DataUri, ImageError> {
    let rest = input
        .trim()
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or(ImageError::NotADataUri)?;

    let (extension, payload) = rest
        .split_once(BASE64_MARKER)
        .ok_or(ImageError::NotADataUri)?;

    if extension.is_empty() {
        return Err(ImageError::NotADataUri);
    }

    let data = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageError::InvalidBase64(e.to_string()))?;

    Ok(DataUri {
        extension: extension.to_ascii_lowercase(),
        data,
    })
}

/// Validate image data: check size limits, check the format is allowed and
/// detect the content type.
///
/// Returns the content type on success (e.g., "image/jpeg").
pub fn validate_image(data: &[u8]) -> Result<&'static str, ImageError> {
    if data.is_empty() {
        return Err(ImageError::Empty);
    }

    if data.len() > MAX_FILE_SIZE {
        return Err(ImageError::TooLarge {
            size: data.len(),
            max: MAX_FILE_SIZE,
        });
    }

    let format = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|_| ImageError::UnknownFormat)?
        .format()
        .ok_or(ImageError::UnknownFormat)?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(ImageError::UnsupportedFormat(format!("{:?}", format)));
    }

    Ok(format.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(2, 2));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_data_uri() {
        let decoded = decode_data_uri("data:image/PNG;base64,aGVsbG8=").unwrap();
        assert_eq!(decoded.extension, "png");
        assert_eq!(decoded.data, b"hello");
    }

    #[test]
    fn test_decode_rejects_plain_base64() {
        assert_eq!(
            decode_data_uri("aGVsbG8="),
            Err(ImageError::NotADataUri)
        );
        assert_eq!(
            decode_data_uri("data:image/;base64,aGVsbG8="),
            Err(ImageError::NotADataUri)
        );
        assert_eq!(
            decode_data_uri("data:text/plain;base64,aGVsbG8="),
            Err(ImageError::NotADataUri)
        );
    }

    #[test]
    fn test_decode_rejects_bad_payload() {
        assert!(matches!(
            decode_data_uri("data:image/png;base64,!!!"),
            Err(ImageError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_validate_png() {
        assert_eq!(validate_image(&tiny_png()), Ok("image/png"));
    }

    #[test]
    fn test_validate_invalid_format() {
        assert_eq!(
            validate_image(b"not an image"),
            Err(ImageError::UnknownFormat)
        );
        assert_eq!(validate_image(b""), Err(ImageError::Empty));
    }

    #[test]
    fn test_validate_too_large() {
        let mut data = tiny_png();
        data.resize(MAX_FILE_SIZE + 1, 0);
        assert!(matches!(
            validate_image(&data),
            Err(ImageError::TooLarge { .. })
        ));
    }
}
