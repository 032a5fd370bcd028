// ── Librarian context ──
//
// Wires transport, URL resolution, the auth store and the request client
// together once per process. Front ends hold one `Librarian` and derive
// resources and requests from it.

use std::sync::Arc;

use librarian_api::{
    AuthStore, Backend, BackendClient, InviteConfig, InviteOption, InviteToken, RequestOptions,
    Session, SessionStorage,
};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::debug;

use crate::config::LibrarianConfig;
use crate::error::CoreError;
use crate::invites::InviteConfigStore;
use crate::resource::{FetchResource, ResourceConfig};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<LibrarianInner>`; clones share one session.
#[derive(Clone)]
pub struct Librarian {
    inner: Arc<LibrarianInner>,
}

struct LibrarianInner {
    config: LibrarianConfig,
    client: BackendClient,
    invite_config: InviteConfigStore,
}

impl Librarian {
    /// Build the HTTP client and restore any persisted session from
    /// `storage`. Makes no network calls.
    pub fn new(
        config: LibrarianConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> Result<Self, CoreError> {
        let backend = Backend::new(config.origin.clone(), config.resolver(), &config.transport())?;
        let auth = Arc::new(AuthStore::restore(backend, storage));
        let client = BackendClient::new(auth);

        debug!(
            origin = ?config.origin.as_ref().map(url::Url::as_str),
            base_host = ?config.base_host,
            "librarian context created"
        );

        Ok(Self {
            inner: Arc::new(LibrarianInner {
                invite_config: InviteConfigStore::new(client.clone()),
                config,
                client,
            }),
        })
    }

    pub fn config(&self) -> &LibrarianConfig {
        &self.inner.config
    }

    /// The underlying request client.
    pub fn client(&self) -> &BackendClient {
        &self.inner.client
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        self.inner.client.auth()
    }

    // ── Session ──────────────────────────────────────────────────

    pub async fn login(&self, token: SecretString) -> Result<(), CoreError> {
        Ok(self.auth().login(token).await?)
    }

    /// Validate the current token. An `Err` means the session was cleared.
    pub async fn validate(&self) -> Result<(), CoreError> {
        Ok(self.auth().validate().await?)
    }

    pub fn logout(&self) {
        self.auth().logout();
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth().is_authenticated()
    }

    pub fn session(&self) -> Session {
        self.auth().session()
    }

    /// Subscribe to session changes (login, rotation, logout).
    pub fn subscribe_session(&self) -> watch::Receiver<Session> {
        self.auth().subscribe()
    }

    // ── Requests ─────────────────────────────────────────────────

    /// One-off request returning the unwrapped `data` payload.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T, CoreError> {
        Ok(self.inner.client.request(path, options).await?)
    }

    /// Create a reactive resource bound to `path`.
    pub fn resource<T>(
        &self,
        path: impl Into<String>,
        options: RequestOptions,
        config: ResourceConfig,
    ) -> FetchResource<T>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        FetchResource::new(self.inner.client.clone(), path, options, config)
    }

    // ── Invites ──────────────────────────────────────────────────

    /// Shared store of the invite configuration.
    pub fn invite_config_store(&self) -> &InviteConfigStore {
        &self.inner.invite_config
    }

    pub async fn invite_config(&self) -> Result<Arc<InviteConfig>, CoreError> {
        self.inner.invite_config.fetch_invite_config().await
    }

    pub async fn create_invite(&self, option: &InviteOption) -> Result<InviteToken, CoreError> {
        Ok(self.inner.client.create_invite(option).await?)
    }

    pub async fn invite(&self, token: &str) -> Result<InviteToken, CoreError> {
        Ok(self.inner.client.invite(token).await?)
    }
}

impl std::fmt::Debug for Librarian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Librarian")
            .field("config", &self.inner.config)
            .field("client", &self.inner.client)
            .finish_non_exhaustive()
    }
}
