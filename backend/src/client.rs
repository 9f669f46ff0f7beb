use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_API_BASE: &str = "https://ai.mantelgroup.com.au/v1";
const DEFAULT_MODEL: &str = "global-gemini-2.5-pro";
const COMPLETIONS_PATH: &str = "/chat/completions";

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("AI_API_KEY environment variable is not set")]
    MissingApiKey,
    #[error("AI API transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("AI API request failed: {status} - {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("No response from AI API")]
    NoChoices,
}

/// A single message in the outbound conversation.
#[derive(Serialize, Debug, Clone)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// Subset of the OpenAI-compatible completion response we consume.
#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    #[allow(dead_code)]
    pub id: Option<String>,
    #[allow(dead_code)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
pub struct ChatChoice {
    #[allow(dead_code)]
    pub index: Option<u32>,
    pub message: ChoiceMessage,
    #[allow(dead_code)]
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChoiceMessage {
    #[allow(dead_code)]
    pub role: Option<String>,
    pub content: String,
}

#[derive(Deserialize, Debug)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

/// Completion backend contract, kept as a trait so handlers can be
/// exercised against a stub.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `[system?, user]` and return the first choice's message text.
    async fn generate_content(
        &self,
        user_prompt: &str,
        system_instruction: Option<&str>,
    ) -> ClientResult<String>;

    /// Same contract with an explicit model identifier override.
    async fn generate_content_with_model(
        &self,
        user_prompt: &str,
        model: &str,
        system_instruction: Option<&str>,
    ) -> ClientResult<String>;
}

/// Chat-completion client: one awaited POST per call, no retry, no
/// client-side timeout.
pub struct AiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    /// Read configuration from the environment once, at construction:
    /// - `AI_API_KEY`  — required; absence is fatal
    /// - `AI_API_BASE` — optional endpoint override
    /// - `AI_MODEL`    — optional model override
    pub fn from_env() -> ClientResult<Self> {
        let key = std::env::var("AI_API_KEY").map_err(|_| ClientError::MissingApiKey)?;
        let base =
            std::env::var("AI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let model = std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self::new(key, model, base))
    }

    fn build_messages(user_prompt: &str, system_instruction: Option<&str>) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(instruction) = system_instruction {
            messages.push(ChatMessage {
                role: ROLE_SYSTEM,
                content: instruction.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: ROLE_USER,
            content: user_prompt.to_string(),
        });
        messages
    }

    async fn request(&self, model: &str, messages: &[ChatMessage]) -> ClientResult<String> {
        let url = format!("{}{}", self.base_url, COMPLETIONS_PATH);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ChatCompletionRequest { model, messages })
            .send()
            .await
            .inspect_err(|e| tracing::error!("Error calling AI API: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("AI API returned {status}: {body}");
            return Err(ClientError::Api { status, body });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .inspect_err(|e| tracing::error!("Error decoding AI API response: {e}"))?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "completion usage"
            );
        }

        let Some(choice) = completion.choices.into_iter().next() else {
            tracing::error!("AI API returned an empty choices sequence");
            return Err(ClientError::NoChoices);
        };

        Ok(choice.message.content)
    }
}

#[async_trait]
impl CompletionClient for AiClient {
    async fn generate_content(
        &self,
        user_prompt: &str,
        system_instruction: Option<&str>,
    ) -> ClientResult<String> {
        let messages = Self::build_messages(user_prompt, system_instruction);
        self.request(&self.model, &messages).await
    }

    async fn generate_content_with_model(
        &self,
        user_prompt: &str,
        model: &str,
        system_instruction: Option<&str>,
    ) -> ClientResult<String> {
        let messages = Self::build_messages(user_prompt, system_instruction);
        self.request(model, &messages).await
    }
}
