use crate::backend::BackendError;

/// Core error type for the assistant.
///
/// Only `Config` is fatal: it is raised while building the process-wide
/// configuration and stops the bot before it connects to Telegram. Everything
/// raised while handling a message is turned into a fixed reply instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
