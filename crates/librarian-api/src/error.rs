use thiserror::Error;

/// Coarse classification of an [`Error`].
///
/// Callers that only care whether the server answered (and said no) or the
/// request never produced a usable envelope can branch on this instead of
/// matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable envelope: network failure, timeout, bad status, bad body.
    Transport,
    /// A generic endpoint answered with `ok = false`.
    Api,
    /// The login or validation endpoint answered with `ok = false`.
    AuthRejected,
    /// The durable session store could not be read or written.
    Storage,
}

/// Top-level error type for the `librarian-api` crate.
///
/// `librarian-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login or token validation rejected by the server.
    #[error("Authentication rejected: {message}")]
    AuthRejected { message: String },

    // ── Envelope ────────────────────────────────────────────────────
    /// Well-formed envelope with `ok = false` from a non-auth endpoint.
    #[error("{message}")]
    Api { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx status without a usable envelope.
    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Header value rejected before sending (e.g. a token with control characters).
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// Body could not be decoded as an envelope, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Request body could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Persistence ─────────────────────────────────────────────────
    /// Session storage backend failure.
    #[error("Session storage error: {message}")]
    Storage { message: String },
}

impl Error {
    /// Classify this error into transport / api / auth / storage.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthRejected { .. } => ErrorKind::AuthRejected,
            Self::Api { .. } => ErrorKind::Api,
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Transport(_)
            | Self::HttpStatus { .. }
            | Self::InvalidUrl(_)
            | Self::InvalidHeader(_)
            | Self::Tls(_)
            | Self::Deserialization { .. }
            | Self::Serialization(_) => ErrorKind::Transport,
        }
    }

    /// Returns `true` if no usable envelope was received.
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// Returns `true` if the server rejected the session token.
    pub fn is_auth_rejected(&self) -> bool {
        self.kind() == ErrorKind::AuthRejected
    }

    /// The server-supplied message, for envelope-level failures.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::AuthRejected { message } | Self::Api { message } => Some(message),
            _ => None,
        }
    }

    /// Returns `true` if the request timed out in the transport.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_errors_carry_server_message_verbatim() {
        let err = Error::Api {
            message: "bad token".into(),
        };
        assert_eq!(err.to_string(), "bad token");
        assert_eq!(err.server_message(), Some("bad token"));
        assert_eq!(err.kind(), ErrorKind::Api);
    }

    #[test]
    fn status_and_body_failures_are_transport() {
        let status = Error::HttpStatus {
            status: 502,
            reason: "Bad Gateway".into(),
        };
        let body = Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        };
        assert!(status.is_transport());
        assert!(body.is_transport());
        assert_eq!(status.server_message(), None);
    }

    #[test]
    fn auth_rejection_is_distinct_from_api_error() {
        let err = Error::AuthRejected {
            message: "Invalid token".into(),
        };
        assert!(err.is_auth_rejected());
        assert!(!err.is_transport());
        assert!(err.to_string().contains("Invalid token"));
    }
}
