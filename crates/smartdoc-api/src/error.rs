//! Error taxonomy for the request gateway.

use thiserror::Error;

/// The only two failure kinds the request gateway surfaces.
///
/// The fallback policy treats both identically: any rejection of the
/// versioned attempt triggers the legacy attempt. There is no time-based
/// failure trigger; the gateway enforces no timeout of its own.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced an HTTP response (network unreachable,
    /// connection refused, or an unreadable response body).
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The server answered with a non-success status. Carries the status
    /// code and the response body text.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

impl ApiError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// The HTTP status code, if the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    /// Check if this is a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ApiError>`.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
