use thiserror::Error;

/// Failure of a single API call
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure of a view operation, as surfaced to whoever drives the view
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The action is disabled; nothing was sent
    #[error("{0}")]
    Validation(String),
    /// Network or server fault; the action can be retried
    #[error("network error: {0}")]
    Transient(String),
    /// The server refused the request as invalid
    #[error("rejected by server: {0}")]
    Rejected(String),
    /// The entity is gone on the server
    #[error("{0}")]
    NotFound(String),
    /// A response names a parent this view does not hold
    #[error("{0}")]
    ReferentialMismatch(String),
    /// The view was torn down before the response arrived
    #[error("view was torn down")]
    Cancelled,
    /// The response belongs to a topic the view no longer shows
    #[error("response belongs to a topic that is no longer shown")]
    Stale,
}

impl ViewError {
    /// Whether retrying the same request may succeed
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<ClientError> for ViewError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(message) => Self::NotFound(message),
            ClientError::Status { status, message } if status < 500 => Self::Rejected(message),
            other => Self::Transient(other.to_string()),
        }
    }
}
