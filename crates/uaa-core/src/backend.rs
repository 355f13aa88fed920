//! Text-generation backend port.
//!
//! The orchestrator only knows this trait. Gemini and OpenAI-compatible
//! providers live in adapter crates and are picked by configuration.

use async_trait::async_trait;

/// Which provider serves `generate` calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(ProviderKind::Gemini),
            "openai" | "openai-compatible" => Some(ProviderKind::OpenAi),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
        }
    }
}

/// Cost/latency bounds passed with every request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationLimits {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            max_output_tokens: 800,
            temperature: 0.2,
        }
    }
}

/// One educational question, ready for a provider.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub persona: String,
    pub prompt: String,
    pub limits: GenerationLimits,
}

impl GenerationRequest {
    /// Single-payload rendering for providers without role-tagged turns.
    ///
    /// Persona first, then the user turn, then an open assistant turn.
    pub fn render_single_prompt(&self) -> String {
        format!("{}\n\nUser: {}\n\nAssistant:", self.persona, self.prompt)
    }
}

/// Why a `generate` call produced no answer.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("authentication rejected ({status})")]
    Auth { status: u16 },

    #[error("rate limited or quota exhausted")]
    RateLimited,

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("prompt blocked by provider: {0}")]
    Blocked(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("provider returned no text")]
    Empty,
}

impl BackendError {
    /// Classify a non-2xx HTTP status. `body` is cut to keep logs readable.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => BackendError::Auth { status },
            429 => BackendError::RateLimited,
            _ => BackendError::Status {
                status,
                body: body.chars().take(200).collect(),
            },
        }
    }
}

/// A language-model service that turns a persona plus a question into text.
#[async_trait]
pub trait TextBackend: Send + Sync {
    fn provider(&self) -> ProviderKind;

    fn model(&self) -> &str;

    async fn generate(&self, req: &GenerationRequest) -> Result<String, BackendError>;
}
