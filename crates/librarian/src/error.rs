//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use librarian_config::ConfigError;
use librarian_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}: {reason}")]
    #[diagnostic(
        code(librarian::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Try: librarian auth status --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request failed: {message}")]
    #[diagnostic(code(librarian::transport))]
    Transport { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(librarian::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(librarian::auth_failed),
        help("Log in again with: librarian auth login")
    )]
    AuthFailed { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(librarian::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(librarian::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No server configured for profile '{profile}'")]
    #[diagnostic(
        code(librarian::no_server),
        help(
            "Create a profile with: librarian config init\n\
             Or pass --server / --base-host (LIBRARIAN_SERVER / LIBRARIAN_BASE_HOST).\n\
             Config file: {path}"
        )
    )]
    NoServer { profile: String, path: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(librarian::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: librarian config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(librarian::config))]
    Config(ConfigError),

    #[error("Session storage error: {message}")]
    #[diagnostic(code(librarian::storage))]
    Storage { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(librarian::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(librarian::json), help("Check the JSON body and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Transport { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoServer { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Transport { message, .. } => CliError::Transport { message },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Api { message } => CliError::Api { message },
            CoreError::Storage { message } => CliError::Storage { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(
            CliError::from(CoreError::AuthenticationFailed {
                message: "Invalid token".into()
            })
            .exit_code(),
            exit_code::AUTH
        );
        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);
        assert_eq!(
            CliError::from(CoreError::Transport {
                message: "HTTP 502".into(),
                status: Some(502)
            })
            .exit_code(),
            exit_code::CONNECTION
        );
        assert_eq!(
            CliError::from(CoreError::Api {
                message: "x".into()
            })
            .exit_code(),
            exit_code::GENERAL
        );
    }

    #[test]
    fn api_message_is_shown_verbatim() {
        let err = CliError::from(CoreError::Api {
            message: "Invite expired".into(),
        });
        assert_eq!(err.to_string(), "Invite expired");
    }
}
