use reqwest::StatusCode;

/// Errors surfaced by the request pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The endpoint was not a relative path starting with `/`, or it
    /// contained `.`/`..` segments.
    #[error("Invalid endpoint '{0}': expected a relative path starting with '/'")]
    InvalidEndpoint(String),

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// Connection-level failure, no response received.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned error: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The access token was rejected and the refresh call failed as well.
    /// The session has already been cleared when this is returned.
    #[error("Token refresh failed: {0}")]
    RefreshFailed(#[source] Box<ApiError>),

    /// The retried call rejected the freshly refreshed token.
    /// The session has already been cleared when this is returned.
    #[error("Refreshed token was rejected: {0}")]
    RetryRejected(#[source] Box<ApiError>),
}

impl ApiError {
    /// HTTP status carried by this error, if the server responded.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::RetryRejected(inner) => inner.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// True when the session was torn down while producing this error.
    ///
    /// Callers should treat this like [`ApiOutcome::SessionExpired`](super::ApiOutcome).
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::RefreshFailed(_) | ApiError::RetryRejected(_))
    }
}
