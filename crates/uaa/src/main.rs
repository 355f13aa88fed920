use std::sync::Arc;

use uaa_core::{
    backend::{ProviderKind, TextBackend},
    config::Config,
    orchestrator::Orchestrator,
};
use uaa_gemini::GeminiClient;
use uaa_openai::OpenAiClient;

fn build_backend(cfg: &Config) -> Result<Arc<dyn TextBackend>, uaa_core::Error> {
    let backend: Arc<dyn TextBackend> = match cfg.backend.provider {
        ProviderKind::Gemini => Arc::new(GeminiClient::new(&cfg.backend)?),
        ProviderKind::OpenAi => Arc::new(OpenAiClient::new(&cfg.backend)?),
    };
    Ok(backend)
}

#[tokio::main]
async fn main() -> Result<(), uaa_core::Error> {
    uaa_core::logging::init("uaa")?;

    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            tracing::error!(error = %e, "refusing to start");
            return Err(e);
        }
    };

    let backend = build_backend(&cfg)?;
    let orchestrator = Arc::new(Orchestrator::new(
        backend,
        cfg.persona.as_str(),
        cfg.creator.clone(),
        cfg.limits,
    ));

    uaa_telegram::router::run_polling(cfg, orchestrator)
        .await
        .map_err(|e| uaa_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
