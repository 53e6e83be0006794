use thiserror::Error;

use crate::inference::ProviderError;

/// Failures surfaced by the chat core. None of them end the session.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChatError {
    /// The generative backend has no usable credential. Blocks input.
    #[error("API key not configured")]
    Configuration,

    /// The external call failed or returned nothing usable. Retry by submitting again.
    #[error("{0}")]
    Generation(#[from] ProviderError),

    /// A request is already in flight for this session.
    #[error("a response is already pending")]
    Busy,

    #[error("message is empty")]
    EmptyInput,

    #[error("unknown mentor: {0}")]
    UnknownMentor(String),
}

impl ChatError {
    /// Rejections the UI swallows without telling the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, ChatError::Busy | ChatError::EmptyInput)
    }
}
