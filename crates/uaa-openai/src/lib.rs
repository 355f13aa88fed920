//! OpenAI adapter (chat completions).
//!
//! Works with api.openai.com and OpenAI-compatible servers via
//! `OPENAI_API_BASE`. The persona is sent as a system message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use uaa_core::{
    backend::{BackendError, GenerationRequest, ProviderKind, TextBackend},
    config::BackendConfig,
};

#[derive(Clone, Debug)]
pub struct OpenAiClient {
    api_key: String,
    model: String,
    api_base: String,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(cfg: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| BackendError::Request(format!("openai client build: {e}")))?;
        Ok(Self {
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.api_base)
    }
}

#[async_trait]
impl TextBackend for OpenAiClient {
    fn provider(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, req: &GenerationRequest) -> Result<String, BackendError> {
        let body = build_request(&self.model, req);

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout
                } else {
                    BackendError::Request(format!("openai request error: {e}"))
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(BackendError::from_status(status, &text));
        }

        let parsed: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| BackendError::Malformed(format!("openai json error: {e}")))?;

        let text = extract_text(parsed)?;
        tracing::debug!(model = %self.model, chars = text.chars().count(), "openai answered");
        Ok(text)
    }
}

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Option<AssistantMessage>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct AssistantMessage {
    content: Option<String>,
    refusal: Option<String>,
}

fn build_request<'a>(model: &'a str, req: &'a GenerationRequest) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: &req.persona,
            },
            ChatMessage {
                role: "user",
                content: &req.prompt,
            },
        ],
        max_tokens: req.limits.max_output_tokens,
        temperature: req.limits.temperature,
    }
}

fn extract_text(resp: ChatCompletionResponse) -> Result<String, BackendError> {
    let Some(choice) = resp.choices.into_iter().next() else {
        return Err(BackendError::Malformed("no choices".to_string()));
    };

    let Some(message) = choice.message else {
        return Err(BackendError::Malformed("choice without message".to_string()));
    };

    if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
        return Err(BackendError::Blocked(refusal));
    }

    match message.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ if choice.finish_reason.as_deref() == Some("content_filter") => {
            Err(BackendError::Blocked("content_filter".to_string()))
        }
        _ => Err(BackendError::Empty),
    }
}
