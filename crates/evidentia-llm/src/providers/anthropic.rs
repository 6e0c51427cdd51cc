//! Anthropic Messages API client.

use super::util::parse_structured;
use crate::error::{LlmError, LlmResult};
use crate::provider::LlmProvider;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

pub struct AnthropicProvider {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: "https://api.anthropic.com/v1/messages".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    async fn send(&self, system_prompt: &str, content: Vec<ContentBlock>) -> LlmResult<String> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: system_prompt.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content,
            }],
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(transient_from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_error(status.as_u16(), body));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| LlmError::InvalidResponse("no text content in response".to_string()))
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate_structured<T>(&self, system_prompt: &str, user_prompt: &str) -> LlmResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let text = self
            .send(
                system_prompt,
                vec![ContentBlock::text(user_prompt.to_string())],
            )
            .await?;
        parse_structured(&text)
    }

    async fn generate_vision_structured<T>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image_base64: &str,
        media_type: &str,
    ) -> LlmResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let text = self
            .send(
                system_prompt,
                vec![
                    ContentBlock::image(media_type.to_string(), image_base64.to_string()),
                    ContentBlock::text(user_prompt.to_string()),
                ],
            )
            .await?;
        parse_structured(&text)
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}

fn transient_from_reqwest(err: reqwest::Error) -> LlmError {
    LlmError::ProviderTransient {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}

fn classify_http_error(status: u16, body: String) -> LlmError {
    match status {
        400 | 401 | 403 => LlmError::ProviderRefusal(body),
        _ => LlmError::ProviderTransient {
            status: Some(status),
            message: body,
        },
    }
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image")]
    Image { source: ImageSource },
}

impl ContentBlock {
    fn text(text: String) -> Self {
        ContentBlock::Text { text }
    }

    fn image(media_type: String, data: String) -> Self {
        ContentBlock::Image {
            source: ImageSource {
                kind: "base64".to_string(),
                media_type,
                data,
            },
        }
    }
}

#[derive(Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    kind: String,
    media_type: String,
    data: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    text: Option<String>,
}
