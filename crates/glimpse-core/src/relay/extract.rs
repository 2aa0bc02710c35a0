//! Response extraction: decode only `choices[0].message.content`.

use crate::error::RelayError;
use crate::types::Description;
use serde::Deserialize;

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Extract the first choice's message content from a successful body.
pub fn extract_description(body: &str) -> Result<Description, RelayError> {
    let chat_resp: ChatResponse =
        serde_json::from_str(body).map_err(|e| RelayError::MalformedUpstreamResponse {
            message: format!("failed to parse response: {e}"),
        })?;

    let choice = chat_resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| RelayError::MalformedUpstreamResponse {
            message: "empty choices array".to_string(),
        })?;

    let description =
        choice
            .message
            .content
            .ok_or_else(|| RelayError::MalformedUpstreamResponse {
                message: "first choice has no message content".to_string(),
            })?;

    Ok(Description { description })
}
