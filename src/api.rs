// API client module: a small blocking client for an OpenAI-style chat
// completions endpoint, used to ask a vision model about one image.

use crate::config::Config;
use crate::encode::data_uri;
use crate::error::VisionError;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PROMPT: &str = "What's in this image?";

/// Returned in place of the answer when the reply lacks the expected fields.
pub const NO_CONTENT: &str = "No response content";

/// Anything that can answer a question about a base64-encoded image.
pub trait VisionApi {
    fn ask_about_image(&self, base64_payload: &str) -> Result<String, VisionError>;
}

#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Serialize, Debug)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Serialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize, Debug)]
pub struct ImageUrl {
    pub url: String,
}

/// Only the path `choices[0].message.content` is read; every level is
/// optional so a missing piece falls back to [`NO_CONTENT`].
#[derive(Deserialize, Debug, Default)]
struct ChatResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Deserialize, Debug, Default)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize, Debug, Default)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatRequest {
    pub fn for_image(model: &str, max_tokens: u32, base64_payload: &str) -> Self {
        ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: vec![
                    ContentPart::Text {
                        text: PROMPT.into(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: data_uri(base64_payload),
                        },
                    },
                ],
            }],
            max_tokens,
        }
    }
}

/// Blocking client holding the HTTP client, endpoint, key and model.
#[derive(Clone)]
pub struct VisionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl VisionClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, VisionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VisionError::RequestFailure(format!("failed to build HTTP client: {}", e)))?;
        Ok(VisionClient {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        })
    }

    /// Build a client from the runtime config. Fails when no API key is set.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let key = config.require_api_key()?;
        Ok(Self::new(
            config.endpoint.clone(),
            key,
            config.model.clone(),
            config.max_tokens,
            config.timeout,
        )?)
    }
}

impl VisionApi for VisionClient {
    fn ask_about_image(&self, base64_payload: &str) -> Result<String, VisionError> {
        let body = ChatRequest::for_image(&self.model, self.max_tokens, base64_payload);
        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            payload_len = base64_payload.len(),
            "sending vision request"
        );

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;
        let status = res.status();
        let txt = res.text()?;
        if !status.is_success() {
            tracing::warn!(%status, "vision request rejected");
            return Err(VisionError::RequestFailure(format!("{} - {}", status, txt)));
        }
        extract_content(&txt)
    }
}

/// Pull `choices[0].message.content` out of a raw response body.
fn extract_content(body: &str) -> Result<String, VisionError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| VisionError::RequestFailure(format!("invalid response JSON: {}", e)))?;
    let Some(choices) = parsed.choices else {
        tracing::warn!("response has no choices, using placeholder");
        return Ok(NO_CONTENT.into());
    };
    let first = choices
        .into_iter()
        .next()
        .ok_or_else(|| VisionError::RequestFailure("response contained no choices".into()))?;
    match first.message.and_then(|m| m.content) {
        Some(content) => Ok(content),
        None => {
            tracing::warn!("first choice has no message content, using placeholder");
            Ok(NO_CONTENT.into())
        }
    }
}
