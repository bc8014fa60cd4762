use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid service descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Whether the error was caused by the caller's input
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidDescriptor(_) | Self::InvalidSettings(_))
    }
}

impl From<crate::relay::ProducerError> for Error {
    fn from(err: crate::relay::ProducerError) -> Self {
        Self::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
