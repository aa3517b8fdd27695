//! Request-scoped upload entity and image validation.
//!
//! An [`Upload`] lives for exactly one request: the handler builds it from
//! the multipart body, validation inspects the declared media type and file
//! name, and the byte payload is handed to the extraction engine unmodified.

use crate::error::{RelayError, Result};

/// Extensions accepted when the declared content type is not image-typed.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl Upload {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>, file_name: Option<String>) -> Self {
        Self {
            bytes,
            content_type,
            file_name,
        }
    }

    /// Reject non-image uploads before any engine invocation.
    ///
    /// Accepts when the declared media type starts with `image/` or the file
    /// name carries a known image extension (case-insensitive). Either signal
    /// alone is sufficient.
    pub fn validate_image(&self) -> Result<()> {
        let is_image_type = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"));

        let is_image_ext = self
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .is_some_and(|(_, ext)| {
                IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
            });

        if is_image_type || is_image_ext {
            Ok(())
        } else {
            Err(RelayError::Validation("File must be an image".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: Option<&str>, file_name: Option<&str>) -> Upload {
        Upload::new(
            vec![0u8; 4],
            content_type.map(String::from),
            file_name.map(String::from),
        )
    }

    #[test]
    fn accepts_image_content_type() {
        assert!(upload(Some("image/jpeg"), None).validate_image().is_ok());
        assert!(upload(Some("image/png"), Some("photo")).validate_image().is_ok());
    }

    #[test]
    fn accepts_allowed_extensions_case_insensitive() {
        for name in ["scan.jpg", "scan.JPEG", "scan.PNG", "a.webp", "b.gif", "c.BMP"] {
            assert!(
                upload(None, Some(name)).validate_image().is_ok(),
                "expected '{name}' to validate"
            );
        }
    }

    #[test]
    fn extension_alone_is_sufficient_despite_content_type() {
        // Browsers sometimes send application/octet-stream for images.
        let u = upload(Some("application/octet-stream"), Some("scan.png"));
        assert!(u.validate_image().is_ok());
    }

    #[test]
    fn rejects_non_image_upload() {
        let err = upload(Some("text/plain"), Some("notes.txt"))
            .validate_image()
            .unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
        assert_eq!(err.to_string(), "File must be an image");
    }

    #[test]
    fn rejects_when_type_and_name_absent() {
        assert!(upload(None, None).validate_image().is_err());
    }

    #[test]
    fn rejects_extensionless_file_name() {
        assert!(upload(None, Some("image")).validate_image().is_err());
    }

    #[test]
    fn rejects_unlisted_extension() {
        assert!(upload(None, Some("scan.tiff")).validate_image().is_err());
        assert!(upload(None, Some("archive.tar.gz")).validate_image().is_err());
    }
}
