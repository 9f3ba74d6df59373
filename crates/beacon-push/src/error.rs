use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("device token is missing")]
    InvalidToken,

    #[error("invalid topic name: {0:?}")]
    InvalidTopic(String),

    #[error("push provider rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("push provider reported token errors: {}", .0.join(", "))]
    TokenErrors(Vec<String>),

    #[error("push provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RelayError {
    /// The caller sent bad input; retrying the same request cannot succeed.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidToken | Self::InvalidTopic(_))
    }
}
