use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    backend::{GenerationLimits, ProviderKind},
    domain::CreatorProfile,
    errors::Error,
    Result,
};

pub const DEFAULT_SYSTEM_PROMPT_PATH: &str = "prompts/system_prompt.txt";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com";

/// Connection details for the selected language-model provider.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub provider: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

/// Typed, immutable configuration, built once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    // Transport
    pub telegram_bot_token: String,

    // Backend
    pub backend: BackendConfig,
    pub limits: GenerationLimits,

    // Persona
    pub system_prompt_path: PathBuf,
    pub persona: String,

    pub creator: CreatorProfile,

    // Accepted for deployment parity; nothing reads from it.
    pub mongo_uri: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| get(key).and_then(non_empty);

        // Required env vars
        let telegram_bot_token = var("TELEGRAM_TOKEN")
            .or_else(|| var("TELEGRAM_BOT_TOKEN"))
            .ok_or_else(|| {
                Error::Config("TELEGRAM_TOKEN environment variable is required".to_string())
            })?;

        let provider_name = var("LLM_PROVIDER").unwrap_or_else(|| "gemini".to_string());
        let provider = ProviderKind::parse(&provider_name).ok_or_else(|| {
            Error::Config(format!(
                "unknown LLM_PROVIDER '{provider_name}' (expected gemini or openai)"
            ))
        })?;

        let timeout = Duration::from_secs(
            parse_num::<u64>(var("BACKEND_TIMEOUT_SECS"))
                .unwrap_or(60)
                .max(1),
        );

        let backend = match provider {
            ProviderKind::Gemini => BackendConfig {
                provider,
                api_key: var("GEMINI_API_KEY").ok_or_else(|| {
                    Error::Config("GEMINI_API_KEY environment variable is required".to_string())
                })?,
                model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                api_base: var("GEMINI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
                timeout,
            },
            ProviderKind::OpenAi => BackendConfig {
                provider,
                api_key: var("OPENAI_API_KEY").ok_or_else(|| {
                    Error::Config("OPENAI_API_KEY environment variable is required".to_string())
                })?,
                model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                api_base: var("OPENAI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
                timeout,
            },
        };

        let defaults = GenerationLimits::default();
        let limits = GenerationLimits {
            max_output_tokens: parse_num::<u32>(var("MAX_OUTPUT_TOKENS"))
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_output_tokens),
            temperature: parse_num::<f32>(var("LLM_TEMPERATURE"))
                .filter(|t| t.is_finite())
                .map(|t| t.clamp(0.0, 2.0))
                .unwrap_or(defaults.temperature),
        };

        let system_prompt_path = PathBuf::from(
            var("SYSTEM_PROMPT_PATH").unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT_PATH.to_string()),
        );
        let persona = load_persona(&system_prompt_path)?;

        let mongo_uri = var("MONGO_URI");

        Ok(Self {
            telegram_bot_token,
            backend,
            limits,
            system_prompt_path,
            persona,
            creator: CreatorProfile::default(),
            mongo_uri,
        })
    }
}

/// Read the teaching persona. Missing or blank files are fatal.
pub fn load_persona(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "cannot read system prompt {}: {e}",
            path.display()
        ))
    })?;

    let persona = raw.trim();
    if persona.is_empty() {
        return Err(Error::Config(format!(
            "system prompt {} is empty",
            path.display()
        )));
    }
    Ok(persona.to_string())
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        env::set_var(key, unquote(v.trim()));
    }
}

fn unquote(val: &str) -> &str {
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        return &val[1..val.len() - 1];
    }
    val
}

fn parse_num<T: std::str::FromStr>(v: Option<String>) -> Option<T> {
    v.and_then(|s| s.trim().parse::<T>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.trim().to_string())
    }
}
