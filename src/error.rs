use thiserror::Error;

pub type WordSourceResult<T> = Result<T, WordSourceError>;

#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("quote endpoint returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response is missing the 'content' field")]
    MissingContent,
}

impl WordSourceError {
    pub fn network(msg: impl Into<String>) -> Self {
        WordSourceError::Network(msg.into())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("duration cannot be changed while the countdown is running")]
    Running,

    #[error("duration must be at least one second")]
    ZeroDuration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
