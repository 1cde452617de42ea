use thiserror::Error;

/// Top-level error type for the `stockroom-api` crate.
///
/// Every failure an HTTP call can produce lands here. `stockroom-core`
/// folds these into its own taxonomy (validation, unauthorized, backend
/// rejection, network).
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The backend answered 401: no session, or the session expired.
    ///
    /// The client never redirects or retries on this; callers decide.
    #[error("Not authenticated: {}", message.as_deref().unwrap_or("session absent or expired"))]
    Unauthorized { message: Option<String> },

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-2xx response other than 401.
    ///
    /// `message` carries the backend's `{"message": ...}` payload when the
    /// body had one.
    #[error("API error (HTTP {status}): {}", message.as_deref().unwrap_or("no details"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the session is absent or expired.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the request never reached the backend or timed out.
    pub fn is_network(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    /// The structured message the backend attached to a rejection, if any.
    ///
    /// A failed login is a 401 that still carries `{"message": ...}`.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Unauthorized { message } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a backend rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_only_for_api_errors() {
        let err = Error::Api {
            status: 400,
            message: Some("Email already registered".into()),
        };
        assert_eq!(err.backend_message(), Some("Email already registered"));
        assert_eq!(err.status(), Some(400));
        assert!(Error::Unauthorized { message: None }.backend_message().is_none());
    }

    #[test]
    fn not_found_detection() {
        let err = Error::Api {
            status: 404,
            message: None,
        };
        assert!(err.is_not_found());
        assert!(!Error::Unauthorized { message: None }.is_not_found());
    }

    #[test]
    fn display_without_message() {
        let err = Error::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "API error (HTTP 500): no details");
    }
}
