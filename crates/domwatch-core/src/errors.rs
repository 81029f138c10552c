use std::time::Duration;

/// Core error type for the domain watch bot.
///
/// Adapter crates map their specific errors into this type so the core can
/// turn every failure into a readable chat line.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    /// Text shown to chat users; drops the category prefix where it only adds noise.
    pub fn user_message(&self) -> String {
        match self {
            Error::Config(msg) | Error::External(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
