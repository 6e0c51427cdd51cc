//! OpenAI (and OpenAI-compatible) chat-completions client.

use super::util::parse_structured;
use crate::error::{LlmError, LlmResult};
use crate::provider::LlmProvider;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const DEFAULT_MAX_TOKENS: u32 = 4096;

pub struct OpenAiProvider {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: "https://api.openai.com/v1".to_string(),
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

    async fn send(&self, system_prompt: &str, user_content: UserContent) -> LlmResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: UserContent::Text(system_prompt.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transient_from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_error(status.as_u16(), body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate_structured<T>(&self, system_prompt: &str, user_prompt: &str) -> LlmResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let text = self
            .send(system_prompt, UserContent::Text(user_prompt.to_string()))
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
        let url = format!("data:{media_type};base64,{image_base64}");
        let content = UserContent::Parts(vec![
            ContentPart::Text {
                text: user_prompt.to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl { url },
            },
        ]);
        let text = self.send(system_prompt, content).await?;
        parse_structured(&text)
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &'static str {
        "openai"
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
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: UserContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum UserContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}
