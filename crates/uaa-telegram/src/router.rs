use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use uaa_core::{config::Config, messaging::port::MessagingPort, orchestrator::Orchestrator};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub messenger: Arc<dyn MessagingPort>,
}

/// Long-poll Telegram until the process is stopped (Ctrl-C).
///
/// The dispatcher runs updates of different chats concurrently; every
/// update is answered inside its own task.
pub async fn run_polling(cfg: Arc<Config>, orchestrator: Arc<Orchestrator>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!(username = %me.username(), "bot started"),
        Err(e) => tracing::warn!(error = %e, "get_me failed; continuing with polling"),
    }
    tracing::info!(
        provider = orchestrator.backend().provider().as_str(),
        model = orchestrator.backend().model(),
        persona = %cfg.system_prompt_path.display(),
        persistence = cfg.mongo_uri.is_some(),
        "assistant ready"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));

    let state = Arc::new(AppState {
        orchestrator,
        messenger,
    });

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
