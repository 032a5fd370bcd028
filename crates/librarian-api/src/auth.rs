// Bearer-token authentication
//
// The auth store owns the `Session`. It is restored from durable storage
// once at construction and written back on every mutation. Only `login`,
// `validate` and `logout` change the token; the request client reads it.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::client::{Backend, bearer_header, read_envelope};
use crate::error::Error;
use crate::session::Session;
use crate::storage::{SESSION_KEY, SessionStorage};

/// Login endpoint: `POST {token}`.
pub const LOGIN_PATH: &str = "auth/login";
/// Validation endpoint: `GET` with the bearer token.
pub const VALIDATE_PATH: &str = "auth/test";

/// Process-wide owner of the session token.
///
/// Persistence is synchronous: every session change calls into the
/// [`SessionStorage`] backend on the caller's task before `login`,
/// `validate` or `logout` returns. File and keyring backends block briefly,
/// which is fine for a CLI. Hosts on a busy runtime should wrap those calls
/// in `spawn_blocking` or supply a storage backend that doesn't block.
pub struct AuthStore {
    backend: Backend,
    storage: Arc<dyn SessionStorage>,
    session: watch::Sender<Session>,
}

impl AuthStore {
    /// Create the store, restoring any session persisted under [`SESSION_KEY`].
    ///
    /// Unreadable or corrupt entries are logged and ignored; the store then
    /// starts logged out.
    pub fn restore(backend: Backend, storage: Arc<dyn SessionStorage>) -> Self {
        let session = match storage.load(SESSION_KEY) {
            Ok(Some(raw)) => Session::from_persisted(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "ignoring corrupt persisted session");
                Session::default()
            }),
            Ok(None) => Session::default(),
            Err(e) => {
                warn!(error = %e, "failed to load persisted session");
                Session::default()
            }
        };

        debug!(
            authenticated = session.is_authenticated(),
            "auth store initialized"
        );

        let (session, _) = watch::channel(session);
        Self {
            backend,
            storage,
            session,
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Snapshot of the current session (the token is captured by value).
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_authenticated()
    }

    /// Watch session changes (login, token rotation, logout).
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// Exchange a candidate token for a session.
    ///
    /// On success the candidate becomes the session token. On rejection or
    /// transport failure the current session is left untouched.
    pub async fn login(&self, candidate: SecretString) -> Result<(), Error> {
        let url = self.backend.url(LOGIN_PATH)?;

        debug!("logging in at {}", url);

        let body = json!({ "token": candidate.expose_secret() });
        let resp = self.backend.http().post(url).json(&body).send().await?;

        read_envelope(resp).await?.into_token()?;

        self.commit(Session::new(Some(candidate)));
        debug!("login successful");
        Ok(())
    }

    /// Check the current token with the server.
    ///
    /// A rotated token in the response replaces the session token. Any
    /// failure logs the session out before the error is returned, so callers
    /// must treat an `Err` as "now logged out".
    pub async fn validate(&self) -> Result<(), Error> {
        let session = self.session();

        match self.send_validation(&session).await {
            Ok(Some(rotated)) => {
                debug!("session validated, token rotated");
                self.commit(Session::new(Some(SecretString::from(rotated))));
                Ok(())
            }
            Ok(None) => {
                debug!("session validated");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "session validation failed, logging out");
                self.logout();
                Err(e)
            }
        }
    }

    async fn send_validation(&self, session: &Session) -> Result<Option<String>, Error> {
        let url = self.backend.url(VALIDATE_PATH)?;

        debug!("validating session at {}", url);

        // No token: the request still goes out, the server decides.
        let mut builder = self.backend.http().get(url);
        if let Some(token) = session.token() {
            builder = builder.header(AUTHORIZATION, bearer_header(token)?);
        }

        let resp = builder.send().await?;
        read_envelope(resp).await?.into_token()
    }

    /// Clear the session and its persisted entry. Never fails.
    pub fn logout(&self) {
        self.commit(Session::default());
        debug!("logged out");
    }

    fn commit(&self, session: Session) {
        let persisted = if session.is_authenticated() {
            session.to_persisted().map_err(Error::from).and_then(|raw| {
                self.storage.save(SESSION_KEY, &raw)
            })
        } else {
            self.storage.remove(SESSION_KEY)
        };

        if let Err(e) = persisted {
            warn!(error = %e, "failed to persist session");
        }

        self.session.send_replace(session);
    }
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("backend", &self.backend)
            .field("session", &*self.session.borrow())
            .finish_non_exhaustive()
    }
}
