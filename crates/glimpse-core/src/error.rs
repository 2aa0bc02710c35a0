//! Error types for the Glimpse relay.
//!
//! Errors are organized by stage: configuration problems are fatal at
//! startup, while relay errors describe why a single request failed and carry
//! enough context (sizes, content types, upstream status) to act on.

use thiserror::Error;

/// Longest slice of an upstream error body kept for display.
const MAX_BODY_DISPLAY: usize = 512;

/// Top-level error type for Glimpse operations.
#[derive(Error, Debug)]
pub enum GlimpseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Relay pipeline errors
    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// No usable upstream API key
    #[error("Upstream API key not set. Set {hint} or upstream.api_key in the config file.")]
    MissingCredential { hint: String },
}

/// Why a single relay request failed.
///
/// The first four variants are caller mistakes and are detected before any
/// network I/O. The rest originate at or after the upstream call.
#[derive(Error, Debug)]
pub enum RelayError {
    /// No upload was provided, or it was empty
    #[error("No image provided")]
    MissingInput,

    /// Upload exceeds the configured ceiling
    #[error("Image too large ({size} bytes > {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    /// Declared content type is not accepted by the format policy
    #[error("Invalid image format: {content_type}. Supported: {supported}")]
    UnsupportedFormat {
        content_type: String,
        supported: String,
    },

    /// Prompt exceeds the configured ceiling
    #[error("Prompt too long ({size} bytes > {max} bytes)")]
    PromptTooLarge { size: u64, max: u64 },

    /// The upstream call failed
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The upstream replied successfully but not with the expected shape
    #[error("Malformed upstream response: {message}")]
    MalformedUpstreamResponse { message: String },
}

impl RelayError {
    /// Whether the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RelayError::MissingInput
                | RelayError::TooLarge { .. }
                | RelayError::UnsupportedFormat { .. }
                | RelayError::PromptTooLarge { .. }
        )
    }
}

/// Failure kinds of the outbound call.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Connection, TLS or body transfer failure
    #[error("Upstream request failed: {message}")]
    Network { message: String },

    /// No response within the configured timeout
    #[error("Upstream request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Upstream answered with a non-2xx status
    #[error("Upstream HTTP {status}: {}", truncate_body(.body))]
    Status { status: u16, body: String },
}

impl UpstreamError {
    /// HTTP status reported by the upstream, if it got that far.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "<empty body>".to_string();
    }
    match body.char_indices().nth(MAX_BODY_DISPLAY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Convenience type alias for Glimpse results.
pub type Result<T> = std::result::Result<T, GlimpseError>;

/// Convenience type alias for relay-specific results.
pub type RelayResult<T> = std::result::Result<T, RelayError>;
