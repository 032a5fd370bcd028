// ── Core error types ──
//
// User-facing errors from librarian-core. Consumers never see reqwest or
// serde failures directly; the `From<librarian_api::Error>` impl folds
// them into these variants. `Clone` so failures can sit inside reactive
// state next to the data they replace.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    /// No usable envelope came back (bad status, bad body, etc.).
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        /// HTTP status code (if one was received).
        status: Option<u16>,
    },

    // ── Server answers ───────────────────────────────────────────────
    /// The login or validation endpoint rejected the token.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// A generic endpoint answered `ok = false`; the message is verbatim.
    #[error("{message}")]
    Api { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Session storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for failures where no envelope was received.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout | Self::Transport { .. }
        )
    }

    /// Returns `true` if the server rejected the session token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<librarian_api::Error> for CoreError {
    fn from(err: librarian_api::Error) -> Self {
        use librarian_api::Error as ApiError;

        match err {
            ApiError::AuthRejected { message } => CoreError::AuthenticationFailed { message },
            ApiError::Api { message } => CoreError::Api { message },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Transport {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::HttpStatus { status, reason } => CoreError::Transport {
                message: format!("HTTP {status}: {reason}"),
                status: Some(status),
            },
            ApiError::Deserialization { message, body: _ } => CoreError::Transport {
                message: format!("Deserialization error: {message}"),
                status: None,
            },
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::InvalidHeader(msg) => CoreError::Internal(msg),
            ApiError::Serialization(e) => CoreError::Internal(format!("Serialization error: {e}")),
            ApiError::Storage { message } => CoreError::Storage { message },
        }
    }
}
