//! Gemini adapter (text generation).
//!
//! Uses the `generateContent` endpoint with a single user turn that carries
//! the persona, the question, and an open assistant cue.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use uaa_core::{
    backend::{BackendError, GenerationRequest, ProviderKind, TextBackend},
    config::BackendConfig,
};

#[derive(Clone, Debug)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    api_base: String,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(cfg: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| BackendError::Request(format!("gemini client build: {e}")))?;
        Ok(Self {
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl TextBackend for GeminiClient {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, req: &GenerationRequest) -> Result<String, BackendError> {
        let body = build_request(req);

        // Key goes in a header so it never shows up in reqwest error URLs.
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_err)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(BackendError::from_status(status, &text));
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| BackendError::Malformed(format!("gemini json: {e}")))?;

        let text = extract_text(parsed)?;
        tracing::debug!(model = %self.model, chars = text.chars().count(), "gemini answered");
        Ok(text)
    }
}

fn map_reqwest_err(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Request(format!("gemini request error: {e}"))
    }
}

// ============== Wire types ==============

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Debug)]
struct Content {
    role: &'static str,
    parts: Vec<OutPart>,
}

#[derive(Serialize, Debug)]
struct OutPart {
    text: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<InPart>,
}

#[derive(Deserialize, Debug)]
struct InPart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

fn build_request(req: &GenerationRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![OutPart {
                text: req.render_single_prompt(),
            }],
        }],
        generation_config: GenerationConfig {
            max_output_tokens: req.limits.max_output_tokens,
            temperature: req.limits.temperature,
        },
    }
}

/// Map every response shape to text or a typed error.
fn extract_text(resp: GenerateContentResponse) -> Result<String, BackendError> {
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(BackendError::Blocked(reason));
    }

    let Some(candidate) = resp.candidates.into_iter().next() else {
        return Err(BackendError::Malformed("no candidates".to_string()));
    };

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Ok(text);
    }

    let reason = candidate.finish_reason.unwrap_or_default();
    match reason.as_str() {
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
            Err(BackendError::Blocked(reason.clone()))
        }
        _ => Err(BackendError::Empty),
    }
}
