use thiserror::Error;

use crate::ValidationError;

/// Why a submitted request did not produce a summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The request never completed (connect failure, timeout).
    #[error("failed to send request: {message}")]
    Transport { message: String },
    /// The service answered with a non-success status. The body is not read.
    #[error("failed to send request: server responded with status {status}")]
    HttpStatus { status: u16 },
    /// The service answered 2xx but the body was not a summary.
    #[error("could not read the summary response: {message}")]
    MalformedBody { message: String },
}

/// Why a submission was refused before any request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("a summary request is already in progress")]
    Busy,
}
