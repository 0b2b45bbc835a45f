//! Error types for the session manager.

/// Errors from the chat session manager.
///
/// Input errors (`EmptyInput`, `RequestInFlight`, `SuggestionUnavailable`)
/// cause a submit to be dropped. Remote errors (`Transport`, `Status`,
/// `MalformedResponse`) are turned into the fallback transcript entry.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("question cannot be empty")]
    EmptyInput,
    #[error("a request is already in flight")]
    RequestInFlight,
    #[error("suggested question is not available")]
    SuggestionUnavailable,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl ChatError {
    /// Whether the service could not be reached or answered with a non-2xx
    /// status.
    pub fn is_transport(&self) -> bool {
        matches!(self, ChatError::Transport(_) | ChatError::Status { .. })
    }

    /// Whether the error came from the remote call rather than local input.
    pub fn is_remote(&self) -> bool {
        self.is_transport() || matches!(self, ChatError::MalformedResponse(_))
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::MalformedResponse(err.to_string())
        } else if err.is_timeout() {
            ChatError::Transport(format!("request timeout: {}", err))
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}
