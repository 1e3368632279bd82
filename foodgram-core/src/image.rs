//! Image reference validation.
//!
//! Recipe images and avatars arrive either as `data:image/...;base64,...`
//! URIs or as references to already stored files. Data URIs are decoded and
//! sniffed so that only real images of an allowed format are accepted.
//! Storing the bytes is left to whatever serves media.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, ImageReader};

/// Allowed image formats for recipe photos and avatars.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum decoded size for images (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Validate image data: check format is allowed and detect content type.
///
/// Returns the content type on success (e.g., "image/jpeg").
pub fn validate_image(data: &[u8]) -> Result<String, String> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    let format = reader
        .format()
        .ok_or_else(|| "Could not detect image format".to_string())?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(format!(
            "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
            format
        ));
    }

    Ok(format.to_mime_type().to_string())
}

/// Decode a base64 `data:image/...` URI, returning the bytes.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, String> {
    let rest = uri
        .strip_prefix("data:image/")
        .ok_or_else(|| "Expected a data:image URI".to_string())?;
    let (_, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| "Image data must be base64 encoded".to_string())?;

    // 4 base64 chars per 3 bytes
    if payload.len() / 4 * 3 > MAX_FILE_SIZE {
        return Err(format!("Image too large (max {} bytes)", MAX_FILE_SIZE));
    }

    STANDARD
        .decode(payload.trim())
        .map_err(|e| format!("Invalid base64 image data: {}", e))
}

/// Check an image reference as sent by a client.
///
/// Data URIs must decode to an allowed image format. Anything else must look
/// like a URL or an absolute media path.
pub fn validate_image_reference(reference: &str) -> Result<(), String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err("Image cannot be empty".to_string());
    }

    if reference.starts_with("data:") {
        let data = decode_data_uri(reference)?;
        if data.len() > MAX_FILE_SIZE {
            return Err(format!(
                "Image too large: {} bytes (max {})",
                data.len(),
                MAX_FILE_SIZE
            ));
        }
        validate_image(&data)?;
        return Ok(());
    }

    if reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with('/')
    {
        return Ok(());
    }

    Err("Upload a valid image".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png_data_uri() -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(PNG_SIGNATURE))
    }

    #[test]
    fn test_validate_invalid_format() {
        let invalid_data = b"not an image";
        let result = validate_image(invalid_data);
        assert!(result.is_err());
    }

    #[test]
    fn test_png_signature_detected() {
        assert_eq!(validate_image(PNG_SIGNATURE).unwrap(), "image/png");
    }

    #[test]
    fn test_data_uri_accepted() {
        assert!(validate_image_reference(&png_data_uri()).is_ok());
    }

    #[test]
    fn test_data_uri_with_text_payload_rejected() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode("hello"));
        assert!(validate_image_reference(&uri).is_err());
    }

    #[test]
    fn test_bad_base64_rejected() {
        assert!(validate_image_reference("data:image/png;base64,@@@").is_err());
        assert!(validate_image_reference("data:image/png,abc").is_err());
        assert!(validate_image_reference("data:text/plain;base64,aGk=").is_err());
    }

    #[test]
    fn test_stored_references() {
        assert!(validate_image_reference("https://cdn.example.com/a.png").is_ok());
        assert!(validate_image_reference("/media/recipes/a.png").is_ok());
        assert!(validate_image_reference("a.png").is_err());
        assert!(validate_image_reference("   ").is_err());
    }
}
