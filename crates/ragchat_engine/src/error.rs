use thiserror::Error;

/// Failure of a single backend call. The display text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Non-2xx response; `message` comes from the `{message}` error body.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// The request never produced a response (connect, timeout, body read).
    #[error("{0}")]
    Transport(String),
    /// A 2xx response whose body did not have the expected shape.
    #[error("unexpected response from backend: {0}")]
    Decode(String),
    /// An upload file could not be read locally.
    #[error("cannot read `{name}`: {message}")]
    File { name: String, message: String },
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
