//! Glimpse Core - image description relay.
//!
//! Glimpse accepts an uploaded image plus an optional prompt, forwards both
//! to a multimodal chat-completions API and returns the model's answer.
//!
//! # Architecture
//!
//! A straight pipeline with no state shared between requests:
//!
//! ```text
//! Upload → Validate → Encode (data URI) → Upstream call → Extract → {description}
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use glimpse_core::{Config, ImageUpload, Relay};
//!
//! #[tokio::main]
//! async fn main() -> glimpse_core::Result<()> {
//!     let config = Config::load()?;
//!     let credential = config.credential(None)?;
//!     let relay = Relay::from_config(&config, credential)?;
//!
//!     let upload = ImageUpload::new(std::fs::read("cat.png")?, "image/png");
//!     let result = relay.describe(Some(upload), Some("What animal is this?")).await?;
//!     println!("{}", result.description);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod relay;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, Credential};
pub use error::{ConfigError, GlimpseError, RelayError, RelayResult, Result, UpstreamError};
pub use relay::{Relay, UpstreamClient, UpstreamResponse};
pub use types::{Description, ImageUpload};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
