//! Core data types flowing through the relay.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An uploaded image, owned for the duration of one request.
#[derive(Clone)]
pub struct ImageUpload {
    /// Raw file content
    pub bytes: Vec<u8>,

    /// Content type declared by the client
    pub content_type: String,

    /// Client-side file name, used for logging only
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
            file_name: None,
        }
    }

    /// Attach the client-side file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Size of the upload in bytes.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The declared content type without parameters, lowercased.
    ///
    /// `"Image/JPEG; charset=binary"` becomes `"image/jpeg"`.
    pub fn media_type(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ImageUpload {{ bytes: <{} bytes>, content_type: {:?}, file_name: {:?} }}",
            self.bytes.len(),
            self.content_type,
            self.file_name
        )
    }
}

/// The successful relay result returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Text produced by the upstream model
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_strips_parameters() {
        let upload = ImageUpload::new(vec![1], "Image/JPEG; charset=binary");
        assert_eq!(upload.media_type(), "image/jpeg");
    }

    #[test]
    fn test_debug_hides_bytes() {
        let upload = ImageUpload::new(vec![0xAB; 64], "image/png").with_file_name("cat.png");
        let debug = format!("{upload:?}");
        assert!(debug.contains("<64 bytes>"));
        assert!(debug.contains("cat.png"));
    }

    #[test]
    fn test_description_serializes_single_field() {
        let json = serde_json::to_string(&Description {
            description: "a cat".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"description":"a cat"}"#);
    }
}
