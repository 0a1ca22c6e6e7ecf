// ABOUTME: Error type shared by every collaborator operation.
// ABOUTME: Classifies failures as transient or permanent for poll retries.

/// Failure of an external collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpsError {
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Http {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    #[error("remote function {function} failed: {message}")]
    RemoteFunction { function: String, message: String },

    #[error("{0}")]
    Unsupported(String),

    #[error("{0}")]
    Refused(String),
}

impl OpsError {
    pub fn invalid_response(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        OpsError::InvalidResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Transport failures, throttling and server errors may succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            OpsError::Transport { .. } => true,
            OpsError::Http { status, .. } => *status == 429 || (500..=599).contains(status),
            OpsError::InvalidResponse { .. }
            | OpsError::RemoteFunction { .. }
            | OpsError::Unsupported(_)
            | OpsError::Refused(_) => false,
        }
    }
}
