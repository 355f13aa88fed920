//! Telegram update handlers.
//!
//! Only text is handled: commands go to `commands`, everything else to the
//! orchestrator via `text`. Other message kinds are ignored.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use uaa_core::domain::ChatId;

use crate::router::AppState;

mod commands;
mod text;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if text.starts_with('/') {
        return commands::handle_command(&msg, state).await;
    }

    text::handle_text(&msg, state).await
}

/// Send one reply; transport failures are logged, never propagated.
async fn reply(state: &AppState, chat_id: ChatId, text: &str) {
    let limit = state.messenger.capabilities().max_message_len;
    let text = clamp_to_limit(text, limit);
    if let Err(e) = state.messenger.send_text(chat_id, text).await {
        tracing::warn!(chat_id = chat_id.0, error = %e, "failed to send reply");
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters.
fn clamp_to_limit(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => {
            tracing::warn!(max_chars, "reply longer than transport limit, cutting");
            &text[..end]
        }
        None => text,
    }
}
