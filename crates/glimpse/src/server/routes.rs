//! Route handlers.

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use glimpse_core::{Description, ImageUpload, RelayError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ApiError;
use super::AppState;

/// Form field carrying the image file.
const IMAGE_FIELD: &str = "image";

/// Form field carrying the prompt.
const PROMPT_FIELD: &str = "prompt";

#[derive(Debug, Default, Deserialize)]
pub struct PromptQuery {
    prompt: Option<String>,
}

/// POST /process-image — describe an uploaded image.
///
/// The prompt comes from the `prompt` form field, falling back to the
/// `prompt` query parameter, then to an empty string.
pub async fn process_image(
    State(state): State<AppState>,
    Query(query): Query<PromptQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Description>, ApiError> {
    let mut multipart = multipart?;
    let max_bytes = state.relay.max_upload_bytes();
    let max_prompt_bytes = state.relay.max_prompt_bytes();

    let mut upload = None;
    let mut prompt = None;
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(IMAGE_FIELD) => upload = Some(read_image(field, max_bytes).await?),
            Some(PROMPT_FIELD) => prompt = Some(read_prompt(field, max_prompt_bytes).await?),
            other => debug!(field = ?other, "Ignoring unknown form field"),
        }
    }

    let prompt = prompt.or(query.prompt);
    let description = state.relay.describe(upload, prompt.as_deref()).await?;
    Ok(Json(description))
}

/// Read the image field, stopping as soon as it passes the upload ceiling.
async fn read_image(mut field: Field<'_>, max_bytes: u64) -> Result<ImageUpload, ApiError> {
    let content_type = field.content_type().unwrap_or_default().to_string();
    let file_name = field.file_name().map(str::to_string);

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        bytes.extend_from_slice(&chunk);
        if bytes.len() as u64 > max_bytes {
            return Err(RelayError::TooLarge {
                size: bytes.len() as u64,
                max: max_bytes,
            }
            .into());
        }
    }

    let upload = ImageUpload::new(bytes, content_type);
    Ok(match file_name {
        Some(name) => upload.with_file_name(name),
        None => upload,
    })
}

/// Read the prompt field as UTF-8, stopping once it passes the prompt ceiling.
async fn read_prompt(mut field: Field<'_>, max_bytes: u64) -> Result<String, ApiError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        bytes.extend_from_slice(&chunk);
        if bytes.len() as u64 > max_bytes {
            return Err(RelayError::PromptTooLarge {
                size: bytes.len() as u64,
                max: max_bytes,
            }
            .into());
        }
    }

    String::from_utf8(bytes).map_err(|_| ApiError::Form {
        status: StatusCode::BAD_REQUEST,
        message: "Prompt is not valid UTF-8".to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health — liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: glimpse_core::VERSION,
    })
}
