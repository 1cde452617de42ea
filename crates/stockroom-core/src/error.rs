// ── Core error types ──
//
// User-facing errors from stockroom-core. Consumers never see raw HTTP
// plumbing: the `From<stockroom_api::Error>` impl folds transport-layer
// failures into four kinds (validation, unauthorized, backend rejection,
// network) plus a few operational ones.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Caught before any request ────────────────────────────────────
    #[error("{message}")]
    Validation { message: String },

    // ── Session ──────────────────────────────────────────────────────
    /// Session absent or expired. Drives the route gate, never a page banner.
    #[error("Not authenticated: {message}")]
    Unauthorized { message: String },

    /// Logged in, but the role doesn't allow this view.
    #[error("Permission denied: {}", message.as_deref().unwrap_or("insufficient permissions"))]
    Forbidden { message: Option<String> },

    // ── Backend ──────────────────────────────────────────────────────
    /// Non-2xx answer. `message` is the backend's own text when it sent one.
    #[error("Rejected by server: {}", message.as_deref().unwrap_or("no details"))]
    Rejected {
        message: Option<String>,
        status: Option<u16>,
    },

    /// The backend refused to create something that already exists.
    #[error("Already exists: {message}")]
    Conflict { message: String },

    #[error("Not found: {}", message.as_deref().unwrap_or("resource"))]
    NotFound { message: Option<String> },

    // ── Network ──────────────────────────────────────────────────────
    #[error("Cannot reach server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns `true` if the session is absent or expired.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Text for an inline error banner.
    ///
    /// Validation errors and backend rejections that carried a message show
    /// that message; everything else shows `fallback`.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation { message } | Self::Conflict { message } => message.clone(),
            Self::Rejected {
                message: Some(message),
                ..
            }
            | Self::Forbidden {
                message: Some(message),
            }
            | Self::NotFound {
                message: Some(message),
            } => message.clone(),
            _ => fallback.to_owned(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<stockroom_api::Error> for CoreError {
    fn from(err: stockroom_api::Error) -> Self {
        match err {
            stockroom_api::Error::Unauthorized { message } => CoreError::Unauthorized {
                message: message.unwrap_or_else(|| "session absent or expired".into()),
            },
            stockroom_api::Error::Api {
                status: 404,
                message,
            } => CoreError::NotFound { message },
            stockroom_api::Error::Api {
                status: 403,
                message,
            } => CoreError::Forbidden { message },
            stockroom_api::Error::Api { status, message } => CoreError::Rejected {
                message,
                status: Some(status),
            },
            stockroom_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() || e.is_request() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Rejected {
                        message: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            stockroom_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            stockroom_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            stockroom_api::Error::Deserialization { message, .. } => {
                CoreError::Internal(format!("unexpected response from server: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_wins_over_fallback() {
        let err = CoreError::from(stockroom_api::Error::Api {
            status: 400,
            message: Some("Insufficient stock".into()),
        });
        assert_eq!(err.display_message("Failed to update stock"), "Insufficient stock");
    }

    #[test]
    fn missing_message_uses_fallback() {
        let err = CoreError::from(stockroom_api::Error::Api {
            status: 500,
            message: None,
        });
        assert_eq!(err.display_message("Save failed"), "Save failed");
        assert_eq!(CoreError::Timeout.display_message("Save failed"), "Save failed");
    }

    #[test]
    fn unauthorized_maps_through() {
        let err = CoreError::from(stockroom_api::Error::Unauthorized { message: None });
        assert!(err.is_unauthorized());
    }

    #[test]
    fn not_found_maps_through() {
        let err = CoreError::from(stockroom_api::Error::Api {
            status: 404,
            message: None,
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn banner_prefers_backend_text_for_missing_and_forbidden() {
        let missing = CoreError::from(stockroom_api::Error::Api {
            status: 404,
            message: Some("Supplier not found with id 9".into()),
        });
        assert_eq!(
            missing.display_message("Failed to save supplier"),
            "Supplier not found with id 9"
        );

        let forbidden = CoreError::from(stockroom_api::Error::Api {
            status: 403,
            message: Some("Only admins can delete products".into()),
        });
        assert_eq!(
            forbidden.display_message("Failed to delete product"),
            "Only admins can delete products"
        );

        let bare = CoreError::from(stockroom_api::Error::Api {
            status: 404,
            message: None,
        });
        assert_eq!(
            bare.display_message("Failed to delete product"),
            "Failed to delete product"
        );
    }
}
