//! Upload validation before any network I/O.

use crate::config::{FormatPolicy, LimitsConfig, UploadConfig};
use crate::error::RelayError;
use crate::types::ImageUpload;

/// Validates uploads before they are encoded and sent upstream.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_bytes: u64,
    max_prompt_bytes: u64,
    upload: UploadConfig,
}

impl UploadValidator {
    /// Create a new validator with the given limits and upload policy.
    pub fn new(limits: &LimitsConfig, upload: UploadConfig) -> Self {
        Self {
            max_bytes: limits.max_upload_bytes(),
            max_prompt_bytes: limits.max_prompt_bytes(),
            upload,
        }
    }

    /// Upload ceiling in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Prompt ceiling in bytes.
    pub fn max_prompt_bytes(&self) -> u64 {
        self.max_prompt_bytes
    }

    /// Check the prompt length against its ceiling.
    pub fn validate_prompt(&self, prompt: &str) -> Result<(), RelayError> {
        let size = prompt.len() as u64;
        if size > self.max_prompt_bytes {
            return Err(RelayError::PromptTooLarge {
                size,
                max: self.max_prompt_bytes,
            });
        }
        Ok(())
    }

    /// Check an upload, returning it back when it may be relayed.
    ///
    /// Checks, in order:
    /// - an upload is present and non-empty
    /// - its size is within the ceiling
    /// - its declared content type passes the format policy
    /// - (optionally) its leading bytes carry an image signature
    pub fn validate(&self, upload: Option<ImageUpload>) -> Result<ImageUpload, RelayError> {
        let upload = match upload {
            Some(upload) if !upload.is_empty() => upload,
            _ => return Err(RelayError::MissingInput),
        };

        if upload.len() > self.max_bytes {
            return Err(RelayError::TooLarge {
                size: upload.len(),
                max: self.max_bytes,
            });
        }

        let media_type = upload.media_type();
        if !self.accepts(&media_type) {
            return Err(self.unsupported(&upload.content_type));
        }

        if self.upload.verify_signature && !has_image_signature(&upload.bytes) {
            return Err(self.unsupported(&upload.content_type));
        }

        Ok(upload)
    }

    fn accepts(&self, media_type: &str) -> bool {
        match self.upload.format_policy {
            FormatPolicy::AllowList => self
                .upload
                .allowed_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(media_type)),
            FormatPolicy::ImagePrefix => {
                media_type.len() > "image/".len() && media_type.starts_with("image/")
            }
        }
    }

    fn unsupported(&self, content_type: &str) -> RelayError {
        let supported = match self.upload.format_policy {
            FormatPolicy::AllowList => self.upload.allowed_types.join(", "),
            FormatPolicy::ImagePrefix => "image/*".to_string(),
        };
        RelayError::UnsupportedFormat {
            content_type: if content_type.trim().is_empty() {
                "<none>".to_string()
            } else {
                content_type.to_string()
            },
            supported,
        }
    }
}

/// Check if the leading bytes match a known image format.
fn has_image_signature(bytes: &[u8]) -> bool {
    match bytes {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => true,
        // PNG: 89 50 4E 47
        [0x89, b'P', b'N', b'G', ..] => true,
        // GIF: GIF8
        [b'G', b'I', b'F', b'8', ..] => true,
        // WebP: RIFF....WEBP
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => true,
        // BMP: BM
        [b'B', b'M', ..] => true,
        // TIFF: II or MM followed by version 42
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => true,
        // HEIC/HEIF/AVIF: ftyp box at offset 4
        [_, _, _, _, b'f', b't', b'y', b'p', _, _, _, _, ..] => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn validator() -> UploadValidator {
        UploadValidator::new(&LimitsConfig::default(), UploadConfig::default())
    }

    fn prefix_validator() -> UploadValidator {
        let upload = UploadConfig {
            format_policy: FormatPolicy::ImagePrefix,
            ..UploadConfig::default()
        };
        UploadValidator::new(&LimitsConfig::default(), upload)
    }

    #[test]
    fn test_absent_upload_is_missing() {
        assert!(matches!(
            validator().validate(None),
            Err(RelayError::MissingInput)
        ));
    }

    #[test]
    fn test_empty_upload_is_missing() {
        let upload = ImageUpload::new(Vec::new(), "image/png");
        assert!(matches!(
            validator().validate(Some(upload)),
            Err(RelayError::MissingInput)
        ));
    }

    #[test]
    fn test_oversized_upload_rejected_regardless_of_type() {
        let max = validator().max_bytes() as usize;
        for content_type in ["image/png", "text/plain", ""] {
            let upload = ImageUpload::new(vec![0u8; max + 1], content_type);
            match validator().validate(Some(upload)) {
                Err(RelayError::TooLarge { size, max: limit }) => {
                    assert_eq!(size, max as u64 + 1);
                    assert_eq!(limit, max as u64);
                }
                other => panic!("expected TooLarge, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_upload_at_ceiling_accepted() {
        let max = validator().max_bytes() as usize;
        let upload = ImageUpload::new(vec![0u8; max], "image/png");
        assert!(validator().validate(Some(upload)).is_ok());
    }

    #[test]
    fn test_prompt_ceiling() {
        let max = validator().max_prompt_bytes() as usize;
        assert_eq!(max, 2048 * 1024);
        assert!(validator().validate_prompt("").is_ok());
        assert!(validator().validate_prompt(&"a".repeat(max)).is_ok());
        assert!(matches!(
            validator().validate_prompt(&"a".repeat(max + 1)),
            Err(RelayError::PromptTooLarge { .. })
        ));
    }

    #[test]
    fn test_allow_list_accepts_png_and_jpeg() {
        for content_type in ["image/png", "image/jpeg", "image/jpg", "IMAGE/PNG"] {
            let upload = ImageUpload::new(PNG_HEADER.to_vec(), content_type);
            assert!(
                validator().validate(Some(upload)).is_ok(),
                "{content_type} should pass"
            );
        }
    }

    #[test]
    fn test_allow_list_rejects_other_types() {
        for content_type in ["text/plain", "image/webp", "application/octet-stream", ""] {
            let upload = ImageUpload::new(PNG_HEADER.to_vec(), content_type);
            assert!(matches!(
                validator().validate(Some(upload)),
                Err(RelayError::UnsupportedFormat { .. })
            ));
        }
    }

    #[test]
    fn test_unsupported_message_lists_allowed_types() {
        let upload = ImageUpload::new(vec![1, 2, 3], "text/plain");
        let err = validator().validate(Some(upload)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("text/plain"));
        assert!(msg.contains("image/png, image/jpeg, image/jpg"));
    }

    #[test]
    fn test_prefix_policy_accepts_any_image_type() {
        let upload = ImageUpload::new(vec![1, 2, 3], "image/webp");
        assert!(prefix_validator().validate(Some(upload)).is_ok());

        let upload = ImageUpload::new(vec![1, 2, 3], "text/plain");
        assert!(matches!(
            prefix_validator().validate(Some(upload)),
            Err(RelayError::UnsupportedFormat { .. })
        ));

        let upload = ImageUpload::new(vec![1, 2, 3], "image/");
        assert!(prefix_validator().validate(Some(upload)).is_err());
    }

    #[test]
    fn test_signature_check_when_enabled() {
        let upload = UploadConfig {
            verify_signature: true,
            ..UploadConfig::default()
        };
        let validator = UploadValidator::new(&LimitsConfig::default(), upload);

        let png = ImageUpload::new(PNG_HEADER.to_vec(), "image/png");
        assert!(validator.validate(Some(png)).is_ok());

        let fake = ImageUpload::new(b"not an image".to_vec(), "image/png");
        assert!(matches!(
            validator.validate(Some(fake)),
            Err(RelayError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_signatures() {
        assert!(has_image_signature(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(has_image_signature(&PNG_HEADER));
        assert!(has_image_signature(b"RIFF\0\0\0\0WEBPVP8 "));
        assert!(has_image_signature(&[b'I', b'I', 0x2A, 0x00]));
        assert!(has_image_signature(b"\0\0\0\x18ftypheic"));
        // Bare "II" without TIFF version bytes should not match
        assert!(!has_image_signature(&[b'I', b'I', 0x00, 0x00]));
        assert!(!has_image_signature(&[0x00; 12]));
        assert!(!has_image_signature(&[]));
    }
}
