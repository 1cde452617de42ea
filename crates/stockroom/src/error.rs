//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use stockroom_config::ConfigError;
use stockroom_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the inventory server at {url}")]
    #[diagnostic(
        code(stockroom::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Try: stockroom --server http://localhost:7090 whoami"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(stockroom::auth_failed),
        help(
            "Verify the email and password for profile '{profile}'.\n\
             Run: stockroom config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(stockroom::no_credentials),
        help(
            "Configure credentials with: stockroom config init\n\
             Or set STOCKROOM_EMAIL and STOCKROOM_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    #[error("Session expired")]
    #[diagnostic(
        code(stockroom::session_expired),
        help("The server ended the session mid-command. Run the command again.")
    )]
    SessionExpired,

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(stockroom::forbidden),
        help("This view needs an administrator account.")
    )]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(stockroom::not_found),
        help("Run: stockroom {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(stockroom::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(stockroom::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(stockroom::load_failed),
        help("Re-run with -v to see the underlying error.")
    )]
    LoadFailed { message: String },

    #[error("Operation '{operation}' is not supported")]
    #[diagnostic(code(stockroom::unsupported))]
    Unsupported { operation: String },

    #[error("Unexpected server response: {message}")]
    #[diagnostic(code(stockroom::internal))]
    Internal { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(stockroom::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(stockroom::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: stockroom config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(stockroom::no_config),
        help(
            "Create one with: stockroom config init\n\
             Expected at: {path}\n\
             Or pass --server and --email for a one-off command."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(stockroom::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(stockroom::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out")]
    #[diagnostic(
        code(stockroom::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout,

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::SessionExpired => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Forbidden { .. } | Self::Unsupported { .. } => exit_code::PERMISSION,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Rewrite a bare `NotFound` from core into one that names the resource.
    pub fn not_found(resource_type: &str, identifier: impl ToString, list_command: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.to_string(),
            list_command: list_command.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Unauthorized { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            CoreError::Forbidden { message } => CliError::Forbidden {
                message: message.unwrap_or_else(|| "insufficient permissions".into()),
            },

            CoreError::Rejected { message, .. } => CliError::Rejected {
                message: message.unwrap_or_else(|| "Request rejected by server".into()),
            },

            CoreError::Conflict { message } => CliError::Conflict { message },

            CoreError::NotFound { message } => CliError::NotFound {
                resource_type: "resource".into(),
                identifier: message.unwrap_or_default(),
                list_command: "--help".into(),
            },

            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::Timeout => CliError::Timeout,

            CoreError::Unsupported { operation } => CliError::Unsupported { operation },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (CoreError::validation("Select a product"), exit_code::USAGE),
            (
                CoreError::Unauthorized {
                    message: "Invalid credentials".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::Forbidden {
                    message: Some("admins only".into()),
                },
                exit_code::PERMISSION,
            ),
            (
                CoreError::Conflict {
                    message: "Email already registered".into(),
                },
                exit_code::CONFLICT,
            ),
            (
                CoreError::NotFound {
                    message: Some("Product not found".into()),
                },
                exit_code::NOT_FOUND,
            ),
            (CoreError::Timeout, exit_code::TIMEOUT),
            (
                CoreError::Rejected {
                    message: Some("Insufficient stock".into()),
                    status: Some(400),
                },
                exit_code::GENERAL,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn rejection_keeps_backend_message() {
        let err = CliError::from(CoreError::Rejected {
            message: Some("Insufficient stock".into()),
            status: Some(400),
        });
        assert_eq!(err.to_string(), "Insufficient stock");
    }
}
