//! Sub-configuration structs with defaults for the hosted relay.

use serde::{Deserialize, Serialize};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Origins allowed by the CORS policy ("*" allows any)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Resource limits to protect the relay and the upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum upload size in megabytes
    pub max_upload_mb: u64,

    /// Maximum prompt length in kilobytes
    pub max_prompt_kb: u64,

    /// Maximum outbound request body in megabytes (after base64 expansion)
    pub max_request_mb: u64,

    /// Upstream call timeout in milliseconds
    pub upstream_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_mb: 10,
            max_prompt_kb: 2048,
            max_request_mb: 20,
            upstream_timeout_ms: 60000,
        }
    }
}

impl LimitsConfig {
    /// Upload ceiling in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(MIB)
    }

    /// Prompt ceiling in bytes.
    pub fn max_prompt_bytes(&self) -> u64 {
        self.max_prompt_kb.saturating_mul(KIB)
    }

    /// Outbound request ceiling in bytes.
    pub fn max_request_bytes(&self) -> u64 {
        self.max_request_mb.saturating_mul(MIB)
    }
}

/// How declared content types are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatPolicy {
    /// Only the types listed in `allowed_types`
    #[default]
    AllowList,

    /// Any `image/*` type
    ImagePrefix,
}

/// Upload acceptance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Content-type policy
    pub format_policy: FormatPolicy,

    /// Accepted content types under `allow_list`
    pub allowed_types: Vec<String>,

    /// Also require a recognized image signature in the leading bytes
    pub verify_signature: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            format_policy: FormatPolicy::AllowList,
            allowed_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
            ],
            verify_signature: false,
        }
    }
}

/// Inference provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Chat-completions endpoint URL
    pub endpoint: String,

    /// Model identifier sent with every request
    pub model: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://router.huggingface.co/v1/chat/completions".to_string(),
            model: "moonshotai/Kimi-K2.5:fireworks-ai".to_string(),
            api_key: "${HUGGINGFACE_API_KEY}".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
