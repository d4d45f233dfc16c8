//! Media host collaborator.
//!
//! The dashboard stores no image bytes itself; logos, covers, and product
//! images are uploaded to an external media host and only the returned
//! `{url, public_id}` pair is persisted. The `public_id` is the deletion
//! key, kept alongside the URL so removal never has to parse URL paths.

mod client;

pub use client::{MediaClient, UploadedMedia};

use thiserror::Error;

/// MIME types accepted for image uploads.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/svg+xml",
    "image/webp",
];

/// Size ceiling for a single image upload (2 MiB).
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Errors from the media host collaborator.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The file's MIME type is not in the allow-list.
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    /// The file exceeds the upload size ceiling.
    #[error("image is {size} bytes, maximum is {max}")]
    TooLarge {
        /// Actual size in bytes.
        size: usize,
        /// Allowed maximum in bytes.
        max: usize,
    },

    /// The HTTP request could not be sent.
    #[error("media request failed: {0}")]
    Request(String),

    /// The response body could not be read or parsed.
    #[error("media response invalid: {0}")]
    Response(String),

    /// The media host reported an error.
    #[error("media host error: {0}")]
    Api(String),
}

/// Check an upload against the MIME allow-list and size ceiling.
///
/// Runs before any bytes leave the process; the media host would reject
/// these anyway, but failing locally gives the seller a field-level error
/// instead of a gateway error.
///
/// # Errors
///
/// Returns [`MediaError::UnsupportedType`] or [`MediaError::TooLarge`].
pub fn validate_upload(content_type: &str, size: usize) -> Result<(), MediaError> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(MediaError::UnsupportedType(content_type.to_owned()));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(MediaError::TooLarge {
            size,
            max: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_upload_accepts_allowed_types() {
        for mime in ALLOWED_IMAGE_TYPES {
            assert!(validate_upload(mime, 1024).is_ok(), "{mime} should pass");
        }
    }

    #[test]
    fn test_validate_upload_rejects_unknown_type() {
        let err = validate_upload("application/pdf", 1024).unwrap_err();
        assert!(matches!(err, MediaError::UnsupportedType(_)));
    }

    #[test]
    fn test_validate_upload_rejects_oversized() {
        assert!(validate_upload("image/png", MAX_IMAGE_BYTES).is_ok());
        let err = validate_upload("image/png", MAX_IMAGE_BYTES + 1).unwrap_err();
        assert!(matches!(err, MediaError::TooLarge { .. }));
    }
}
