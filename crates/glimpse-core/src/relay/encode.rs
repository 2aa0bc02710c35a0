//! Payload encoding: inline data URIs and the chat-completions request body.

use crate::types::ImageUpload;
use base64::Engine;
use serde::Serialize;

/// Base64-encoded image ready to embed in a chat message.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Encode a validated upload.
    pub fn from_upload(upload: &ImageUpload) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(&upload.bytes),
            media_type: upload.media_type(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Length of the padded base64 encoding of `raw_len` bytes.
pub fn encoded_len(raw_len: u64) -> u64 {
    raw_len.div_ceil(3).saturating_mul(4)
}

/// The document sent to the chat-completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ChatContent>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl InferenceRequest {
    /// Build a single-turn, non-streaming request: prompt text first, then
    /// the image as a data URL.
    pub fn describe(model: &str, prompt: &str, image: &ImageInput) -> Self {
        Self {
            model: model.to_string(),
            stream: false,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::Text {
                        text: prompt.to_string(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                ],
            }],
        }
    }
}
