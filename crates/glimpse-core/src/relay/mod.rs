//! The image description relay.
//!
//! Each request runs through four stages in order:
//! - **validate**: reject missing, oversized or unsupported uploads
//! - **encode**: build the data URI and the chat-completions request
//! - **client**: one authenticated call to the upstream provider
//! - **extract**: pull `choices[0].message.content` out of the reply
//!
//! Nothing is shared between requests except the immutable [`Relay`].

pub mod client;
pub mod encode;
pub mod extract;
pub mod validate;

pub use client::{HttpUpstreamClient, UpstreamClient, UpstreamResponse};
pub use encode::{ImageInput, InferenceRequest};
pub use extract::extract_description;
pub use validate::UploadValidator;

use crate::config::{Config, Credential};
use crate::error::{RelayError, RelayResult};
use crate::types::{Description, ImageUpload};
use std::sync::Arc;
use std::time::Instant;

/// Runs uploads through validation, encoding, the upstream call and
/// extraction.
#[derive(Clone)]
pub struct Relay {
    validator: UploadValidator,
    model: String,
    client: Arc<dyn UpstreamClient>,
}

impl Relay {
    /// Create a relay that sends requests through `client`.
    pub fn new(config: &Config, client: Arc<dyn UpstreamClient>) -> Self {
        Self {
            validator: UploadValidator::new(&config.limits, config.upload.clone()),
            model: config.upstream.model.clone(),
            client,
        }
    }

    /// Create a relay backed by the HTTPS upstream client.
    pub fn from_config(config: &Config, credential: Credential) -> RelayResult<Self> {
        let client = HttpUpstreamClient::from_config(config, credential)?;
        tracing::debug!(
            endpoint = client.endpoint(),
            model = %config.upstream.model,
            "Relay configured"
        );
        Ok(Self::new(config, Arc::new(client)))
    }

    /// Upload ceiling in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.validator.max_bytes()
    }

    /// Prompt ceiling in bytes.
    pub fn max_prompt_bytes(&self) -> u64 {
        self.validator.max_prompt_bytes()
    }

    /// Describe an uploaded image.
    ///
    /// Validation failures return before any network I/O. The upload is
    /// consumed and its buffers are released when this call returns.
    pub async fn describe(
        &self,
        upload: Option<ImageUpload>,
        prompt: Option<&str>,
    ) -> RelayResult<Description> {
        let upload = self.validator.validate(upload)?;
        let prompt = prompt.unwrap_or_default();
        self.validator.validate_prompt(prompt)?;
        tracing::debug!(
            size = upload.len(),
            content_type = %upload.content_type,
            file_name = upload.file_name.as_deref().unwrap_or("-"),
            "Upload accepted"
        );

        let request = {
            let image = ImageInput::from_upload(&upload);
            drop(upload);
            InferenceRequest::describe(&self.model, prompt, &image)
        };

        let start = Instant::now();
        let result = self.client.send(&request).await;
        let latency_ms = start.elapsed().as_millis() as u64;
        drop(request);

        let response = result
            .and_then(UpstreamResponse::error_for_status)
            .map_err(|e| {
                tracing::warn!(
                    client = self.client.name(),
                    latency_ms,
                    status = e.status_code(),
                    "Upstream call failed: {e}"
                );
                RelayError::from(e)
            })?;

        let description = extract_description(&response.body).inspect_err(|e| {
            tracing::warn!(latency_ms, "{e}");
        })?;

        tracing::info!(
            latency_ms,
            chars = description.description.len(),
            "Image described"
        );
        Ok(description)
    }
}
