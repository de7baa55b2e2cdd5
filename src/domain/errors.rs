use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unexpected(String),
}

impl RepositoryError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

/// Failure modes of the cover analysis pipeline. Each variant is terminal for
/// the current scan attempt and carries a message suitable for direct display;
/// none is retried automatically.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The provider could not be reached, or its response envelope could not
    /// be parsed at all.
    #[error("could not reach the analysis provider: {0}")]
    Transport(String),

    /// The provider reported an error payload (rate limit, invalid request,
    /// safety block, bad API key). Carries the provider's message verbatim.
    #[error("analysis provider error: {0}")]
    Provider(String),

    /// The response parsed but contained no candidates, or no text in the
    /// first candidate.
    #[error("the analysis provider returned no result; the image may be unclear or blocked")]
    EmptyResult,

    /// Neither a direct parse nor brace-delimited recovery produced a
    /// structured result.
    #[error("the analysis response was not in a recognizable format")]
    MalformedResponse,

    /// A required field was missing or empty after parsing.
    #[error("the analysis is missing a required field: {0}")]
    MissingField(&'static str),

    /// The record store rejected the insert. Not retried: a blind retry risks
    /// a duplicate record, which is worse than surfacing the error.
    #[error("failed to save the scan: {0}")]
    Persistence(String),
}

impl From<RepositoryError> for ScanError {
    fn from(err: RepositoryError) -> Self {
        ScanError::Persistence(err.to_string())
    }
}
