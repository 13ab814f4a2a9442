use thiserror::Error;

/// Error for user text validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserTextError {
    #[error("Message text must not be empty")]
    Empty,

    #[error("Message text too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error returned by the completion API client
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Completion API key is not configured")]
    MissingApiKey,

    #[error("Completion request failed: {0}")]
    RequestFailed(String),

    #[error("Completion API returned unexpected status code: {0}")]
    UnexpectedStatus(u16),

    #[error("Completion API response could not be decoded: {0}")]
    InvalidResponse(String),

    #[error("Completion API returned no choices")]
    EmptyResponse,
}

/// Top-level error for message operations
#[derive(Debug, Clone, Error)]
pub enum MessageError {
    #[error("Invalid message: {0}")]
    InvalidText(#[from] UserTextError),

    #[error("Message not found: {0}")]
    NotFound(String),

    #[error("Completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
