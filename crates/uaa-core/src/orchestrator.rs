//! Turns a classified message into exactly one reply.

use std::sync::Arc;

use crate::{
    backend::{BackendError, GenerationLimits, GenerationRequest, TextBackend},
    classifier::classify,
    domain::{CreatorProfile, Intent},
    replies,
};

/// Reply plus the intent that produced it (for logging by the transport).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
}

/// Stateless answer pipeline shared by every message task.
pub struct Orchestrator {
    backend: Arc<dyn TextBackend>,
    persona: Arc<str>,
    creator: CreatorProfile,
    limits: GenerationLimits,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn TextBackend>,
        persona: impl Into<Arc<str>>,
        creator: CreatorProfile,
        limits: GenerationLimits,
    ) -> Self {
        Self {
            backend,
            persona: persona.into(),
            creator,
            limits,
        }
    }

    pub fn backend(&self) -> &dyn TextBackend {
        self.backend.as_ref()
    }

    /// Classify `text` and answer it.
    pub async fn handle(&self, text: &str) -> Reply {
        let intent = classify(text);
        let text = self.respond(text, intent).await;
        Reply { intent, text }
    }

    /// Answer `text` for an already decided `intent`. Never fails: backend
    /// errors are logged and replaced by a fixed apology.
    pub async fn respond(&self, text: &str, intent: Intent) -> String {
        match intent {
            Intent::CreatorIdentity => replies::creator_identity(&self.creator),
            Intent::CreatorContact => replies::creator_contact(&self.creator),
            Intent::Rejected => replies::REJECTION.to_string(),
            Intent::Educational => self.answer(text).await,
        }
    }

    async fn answer(&self, text: &str) -> String {
        let req = GenerationRequest {
            persona: self.persona.to_string(),
            prompt: text.to_string(),
            limits: self.limits,
        };

        let result = self.backend.generate(&req).await.and_then(|raw| {
            if raw.trim().is_empty() {
                Err(BackendError::Empty)
            } else {
                Ok(raw)
            }
        });

        match result {
            Ok(raw) => replies::fit_answer(&raw),
            Err(e) => {
                tracing::error!(
                    intent = %Intent::Educational,
                    provider = self.backend.provider().as_str(),
                    model = self.backend.model(),
                    error = %e,
                    "backend call failed"
                );
                replies::BACKEND_FAILURE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use async_trait::async_trait;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::backend::ProviderKind;

    enum Script {
        Answer(String),
        Timeout,
    }

    struct FakeBackend {
        script: Script,
        calls: AtomicUsize,
        last: Mutex<Option<GenerationRequest>>,
    }

    impl FakeBackend {
        fn answering(text: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                script: Script::Answer(text.into()),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn timing_out() -> Arc<Self> {
            Arc::new(Self {
                script: Script::Timeout,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextBackend for FakeBackend {
        fn provider(&self) -> ProviderKind {
            ProviderKind::Gemini
        }

        fn model(&self) -> &str {
            "fake"
        }

        async fn generate(&self, req: &GenerationRequest) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(req.clone());
            match &self.script {
                Script::Answer(s) => Ok(s.clone()),
                Script::Timeout => Err(BackendError::Timeout),
            }
        }
    }

    fn orchestrator(backend: Arc<FakeBackend>) -> Orchestrator {
        Orchestrator::new(
            backend,
            "You are a patient UNIZIK lecturer.",
            CreatorProfile::default(),
            GenerationLimits::default(),
        )
    }

    #[tokio::test]
    async fn educational_question_calls_backend_once() {
        let backend = FakeBackend::answering("  Entropy measures disorder.\n");
        let o = orchestrator(backend.clone());

        let reply = o.handle("What is the definition of entropy?").await;

        assert_eq!(reply.intent, Intent::Educational);
        assert_eq!(reply.text, "Entropy measures disorder.");
        assert_eq!(backend.calls(), 1);

        let req = backend.last.lock().unwrap().clone().unwrap();
        assert_eq!(req.persona, "You are a patient UNIZIK lecturer.");
        assert_eq!(req.prompt, "What is the definition of entropy?");
        assert_eq!(req.limits.max_output_tokens, 800);
        assert!((req.limits.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn creator_identity_is_answered_locally() {
        let backend = FakeBackend::answering("unused");
        let o = orchestrator(backend.clone());

        let reply = o.handle("who is your creator").await;

        assert_eq!(reply.intent, Intent::CreatorIdentity);
        assert_eq!(reply.text, "I was created by OKAFOR EMMANUEL IKE.");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn contact_and_rejection_never_call_backend() {
        let backend = FakeBackend::answering("unused");
        let o = orchestrator(backend.clone());

        let contact = o.respond("anything", Intent::CreatorContact).await;
        assert!(contact.contains("https://wa.link/i7s2lh"));

        let reply = o.handle("tell me a joke").await;
        assert_eq!(reply.intent, Intent::Rejected);
        assert_eq!(reply.text, replies::REJECTION);

        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn backend_timeout_becomes_apology() {
        let backend = FakeBackend::timing_out();
        let o = orchestrator(backend.clone());

        let reply = o.handle("Explain photosynthesis").await;

        assert_eq!(reply.intent, Intent::Educational);
        assert_eq!(
            reply.text,
            "Sorry — I couldn't reach the AI service right now."
        );
        assert_eq!(backend.calls(), 1);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn backend_failure_is_logged_as_error() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let o = orchestrator(FakeBackend::timing_out());
        let text = o.respond("Explain photosynthesis", Intent::Educational).await;
        assert_eq!(text, replies::BACKEND_FAILURE);

        let out = logs.contents();
        let errors: Vec<&str> = out
            .lines()
            .filter(|l| l.contains("ERROR") && l.contains("backend call failed"))
            .collect();
        assert_eq!(errors.len(), 1, "captured logs: {out}");
        assert!(errors[0].contains("request timed out"));
        assert!(errors[0].contains("intent=educational"));
        assert!(errors[0].contains("gemini"));
    }

    #[tokio::test]
    async fn blank_backend_answer_becomes_apology() {
        let backend = FakeBackend::answering(" \n ");
        let o = orchestrator(backend);

        let text = o.respond("why is the sky blue", Intent::Educational).await;

        assert_eq!(text, replies::BACKEND_FAILURE);
    }

    #[tokio::test]
    async fn long_answers_are_truncated() {
        let backend = FakeBackend::answering("x".repeat(5000));
        let o = orchestrator(backend);

        let text = o.respond("explain", Intent::Educational).await;

        assert_eq!(
            text,
            format!("{}\n\n[answer truncated]", "x".repeat(3990))
        );
    }
}
