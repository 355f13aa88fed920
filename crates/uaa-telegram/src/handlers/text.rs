use std::sync::Arc;

use teloxide::prelude::*;

use uaa_core::{
    domain::{ChatId, UserId},
    messaging::types::{ChatAction, TextMessage},
};

use crate::router::AppState;

use super::reply;

pub async fn handle_text(msg: &Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let incoming = TextMessage {
        chat_id: ChatId(msg.chat.id.0),
        user_id: msg.from().map(|u| UserId(u.id.0 as i64)),
        username: msg.from().and_then(|u| u.username.clone()),
        text: text.to_string(),
    };

    answer_text(&state, incoming).await;
    Ok(())
}

/// Classify, answer, and send exactly one reply for `incoming`.
async fn answer_text(state: &AppState, incoming: TextMessage) {
    let chat_id = incoming.chat_id;

    if state.messenger.capabilities().supports_chat_actions {
        // Typing indicator is cosmetic; a failure here must not block the answer.
        if let Err(e) = state
            .messenger
            .send_chat_action(chat_id, ChatAction::Typing)
            .await
        {
            tracing::debug!(chat_id = chat_id.0, error = %e, "failed to send typing action");
        }
    }

    let out = state.orchestrator.handle(&incoming.text).await;
    tracing::info!(
        chat_id = chat_id.0,
        user_id = incoming.user_id.map(|u| u.0),
        username = incoming.username.as_deref().unwrap_or("unknown"),
        intent = %out.intent,
        reply_chars = out.text.chars().count(),
        "message answered"
    );

    reply(state, chat_id, &out.text).await;
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use async_trait::async_trait;

    use uaa_core::{
        backend::{BackendError, GenerationLimits, GenerationRequest, ProviderKind, TextBackend},
        domain::{CreatorProfile, MessageId, MessageRef},
        messaging::{port::MessagingPort, types::MessagingCapabilities},
        orchestrator::Orchestrator,
        replies, Result,
    };

    use super::*;

    #[derive(Default)]
    struct RecordingMessenger {
        sent: Mutex<Vec<(i64, String)>>,
        actions: AtomicUsize,
        fail_actions: bool,
    }

    #[async_trait]
    impl MessagingPort for RecordingMessenger {
        fn capabilities(&self) -> MessagingCapabilities {
            MessagingCapabilities {
                supports_chat_actions: true,
                max_message_len: 4096,
            }
        }

        async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
            let mut sent = self.sent.lock().unwrap();
            sent.push((chat_id.0, text.to_string()));
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(sent.len() as i32),
            })
        }

        async fn send_chat_action(&self, _chat_id: ChatId, _action: ChatAction) -> Result<()> {
            self.actions.fetch_add(1, Ordering::SeqCst);
            if self.fail_actions {
                return Err(uaa_core::Error::External("chat action refused".to_string()));
            }
            Ok(())
        }
    }

    struct FailingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextBackend for FailingBackend {
        fn provider(&self) -> ProviderKind {
            ProviderKind::OpenAi
        }

        fn model(&self) -> &str {
            "failing"
        }

        async fn generate(
            &self,
            _req: &GenerationRequest,
        ) -> std::result::Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(BackendError::Auth { status: 401 })
        }
    }

    fn state() -> (AppState, Arc<RecordingMessenger>, Arc<FailingBackend>) {
        state_with(RecordingMessenger::default())
    }

    fn state_with(
        messenger: RecordingMessenger,
    ) -> (AppState, Arc<RecordingMessenger>, Arc<FailingBackend>) {
        let messenger = Arc::new(messenger);
        let backend = Arc::new(FailingBackend {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = Orchestrator::new(
            backend.clone(),
            "persona",
            CreatorProfile::default(),
            GenerationLimits::default(),
        );
        let state = AppState {
            orchestrator: Arc::new(orchestrator),
            messenger: messenger.clone(),
        };
        (state, messenger, backend)
    }

    fn message(text: &str) -> TextMessage {
        TextMessage {
            chat_id: ChatId(42),
            user_id: Some(UserId(7)),
            username: Some("ada".to_string()),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn each_message_gets_exactly_one_reply() {
        let (state, messenger, backend) = state();

        answer_text(&state, message("who made you")).await;
        answer_text(&state, message("tell me a joke")).await;

        let sent = messenger.sent.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![
                (42, "I was created by OKAFOR EMMANUEL IKE.".to_string()),
                (42, replies::REJECTION.to_string()),
            ]
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(messenger.actions.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn backend_failure_is_sent_as_apology() {
        let (state, messenger, backend) = state();

        answer_text(&state, message("Explain Ohm's law")).await;

        let sent = messenger.sent.lock().unwrap().clone();
        assert_eq!(sent, vec![(42, replies::BACKEND_FAILURE.to_string())]);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_typing_action_still_gets_a_reply() {
        let (state, messenger, _backend) = state_with(RecordingMessenger {
            fail_actions: true,
            ..Default::default()
        });

        answer_text(&state, message("who made you")).await;

        let sent = messenger.sent.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![(42, "I was created by OKAFOR EMMANUEL IKE.".to_string())]
        );
        assert_eq!(messenger.actions.load(Ordering::SeqCst), 1);
    }
}
