use thiserror::Error;

/// Top-level error type for Lexaid.
///
/// Covers failures that stop the application from starting or running:
/// bad configuration, unreadable files, or a chat component that could not
/// be constructed. Per-request failures never surface here; the dispatcher
/// turns those into transcript entries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LexaidError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chat error: {0}")]
    Chat(String),
}

impl From<toml::de::Error> for LexaidError {
    fn from(err: toml::de::Error) -> Self {
        LexaidError::Config(err.to_string())
    }
}

/// A specialized `Result` type for Lexaid operations.
pub type Result<T> = std::result::Result<T, LexaidError>;
