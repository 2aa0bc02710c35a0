//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::relay::encode::encoded_len;

use super::{Config, FormatPolicy};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_upload_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_upload_mb must be > 0".into(),
            ));
        }
        if self.limits.max_request_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_request_mb must be > 0".into(),
            ));
        }
        if self.limits.max_prompt_kb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_prompt_kb must be > 0".into(),
            ));
        }
        if self.limits.upstream_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.upstream_timeout_ms must be > 0".into(),
            ));
        }
        let largest_payload = encoded_len(self.limits.max_upload_bytes())
            .saturating_add(self.limits.max_prompt_bytes());
        if largest_payload > self.limits.max_request_bytes() {
            return Err(ConfigError::ValidationError(format!(
                "limits.max_request_mb ({}) cannot hold a base64-encoded upload of \
                 limits.max_upload_mb ({}) plus a prompt of limits.max_prompt_kb ({})",
                self.limits.max_request_mb, self.limits.max_upload_mb, self.limits.max_prompt_kb
            )));
        }
        if self.upstream.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "upstream.endpoint must not be empty".into(),
            ));
        }
        if self.upstream.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "upstream.model must not be empty".into(),
            ));
        }
        if self.upload.format_policy == FormatPolicy::AllowList
            && self.upload.allowed_types.is_empty()
        {
            return Err(ConfigError::ValidationError(
                "upload.allowed_types must not be empty with the allow_list policy".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_upload_limit() {
        let mut config = Config::default();
        config.limits.max_upload_mb = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_upload_mb"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.upstream_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("upstream_timeout_ms"));
    }

    #[test]
    fn test_validate_accounts_for_base64_expansion() {
        let mut config = Config::default();
        // 12 MiB of raw bytes encodes to 16 MiB, plus a 2 MiB prompt allowance
        config.limits.max_upload_mb = 12;
        config.limits.max_request_mb = 17;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base64"));

        config.limits.max_request_mb = 18;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_counts_prompt_allowance() {
        let mut config = Config::default();
        // 10 MiB encodes to ~13.3 MiB; a 7 MiB prompt pushes it past 20 MiB
        config.limits.max_prompt_kb = 7 * 1024;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_prompt_kb"));

        config.limits.max_prompt_kb = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_prompt_kb must be > 0"));
    }

    #[test]
    fn test_validate_rejects_empty_allow_list() {
        let mut config = Config::default();
        config.upload.allowed_types.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("allowed_types"));

        config.upload.format_policy = FormatPolicy::ImagePrefix;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_model() {
        let mut config = Config::default();
        config.upstream.model = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("upstream.model"));
    }
}
