use std::sync::Arc;

use teloxide::prelude::*;

use uaa_core::{domain::ChatId, replies};

use crate::router::AppState;

use super::reply;

#[derive(Clone, Debug, PartialEq, Eq)]
enum BotCommand {
    Start,
    Help,
    Other(String),
}

fn parse_command(text: &str) -> BotCommand {
    // Telegram may send `/cmd@botname arg1 ...`
    let first = text.split_whitespace().next().unwrap_or("");

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    match cmd.as_str() {
        "start" => BotCommand::Start,
        "help" => BotCommand::Help,
        _ => BotCommand::Other(cmd),
    }
}

pub async fn handle_command(msg: &Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = ChatId(msg.chat.id.0);
    let text = msg.text().unwrap_or("");

    match parse_command(text) {
        BotCommand::Start => reply(&state, chat_id, replies::GREETING).await,
        BotCommand::Help => reply(&state, chat_id, replies::HELP).await,
        BotCommand::Other(name) => {
            tracing::debug!(chat_id = chat_id.0, command = %name, "ignoring unknown command");
        }
    }

    Ok(())
}
