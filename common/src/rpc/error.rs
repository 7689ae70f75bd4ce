use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[cfg(feature = "rpc-client")]
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    // A program refused the transaction during evaluation
    #[error("Transaction rejected: {message}")]
    Rejected { message: String },
    #[error("Cannot decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ClientError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
