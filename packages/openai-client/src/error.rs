//! Errors returned by [`OpenAIClient`](crate::OpenAIClient).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpenAIError>;

#[derive(Debug, Error)]
pub enum OpenAIError {
    /// The request never got a response (connect failure, timeout)
    #[error("chat completions request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-2xx answer from the endpoint
    #[error("chat completions endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The body did not match the chat completions shape
    #[error("unreadable chat completions response: {0}")]
    Parse(#[source] reqwest::Error),

    #[error("chat completions response carried no message content")]
    EmptyResponse,
}
