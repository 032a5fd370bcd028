// ── Runtime connection configuration ──
//
// These types describe *how* to reach the librarian backend. They never
// touch disk: the CLI (or any other front end) builds a `LibrarianConfig`
// and hands it in together with a session storage backend.

use std::path::PathBuf;
use std::time::Duration;

use librarian_api::{TlsMode, TransportConfig, UrlResolver};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for talking to one librarian backend.
#[derive(Debug, Clone, Default)]
pub struct LibrarianConfig {
    /// Origin the client runs against; same-origin API paths join onto it.
    pub origin: Option<Url>,
    /// Optional base host for API requests. Takes precedence over `origin`.
    pub base_host: Option<String>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout. `None` uses the transport default.
    pub timeout: Option<Duration>,
}

impl LibrarianConfig {
    pub(crate) fn resolver(&self) -> UrlResolver {
        UrlResolver::new(self.base_host.clone())
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };

        let transport = TransportConfig::default().with_tls(tls);
        match self.timeout {
            Some(timeout) => transport.with_timeout(timeout),
            None => transport,
        }
    }
}
