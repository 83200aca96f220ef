use thiserror::Error;

/// Coarse classes the panel reacts to differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network unreachable, malformed response, unusable host.
    Transport,
    /// The service reported that nothing exists yet. Not a failure.
    Absent,
    /// Operator input the panel refuses to act on.
    Validation,
    /// The service answered with a non-success status.
    Service,
}

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("invalid host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },
    #[error("invalid polling interval '{value}': must be a positive number of seconds")]
    InvalidInterval { value: String },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("{url} reported no data")]
    NotFound { url: String },
}

impl PanelError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidHost { .. } | Self::Transport { .. } | Self::Decode { .. } => {
                ErrorCategory::Transport
            }
            Self::InvalidInterval { .. } => ErrorCategory::Validation,
            Self::Status { .. } => ErrorCategory::Service,
            Self::NotFound { .. } => ErrorCategory::Absent,
        }
    }
}
