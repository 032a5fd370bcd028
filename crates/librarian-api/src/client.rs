// Backend HTTP client
//
// Wraps `reqwest::Client` with librarian URL resolution, bearer-token
// injection and envelope unwrapping. Typed endpoint helpers (invites) are
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::AuthStore;
use crate::envelope::Envelope;
use crate::error::Error;
use crate::resolve::UrlResolver;
use crate::transport::TransportConfig;

/// Where the backend lives and how to reach it.
///
/// `origin` plays the role of the page origin: same-origin paths are joined
/// onto it. A configured base host in the resolver takes precedence.
#[derive(Debug, Clone)]
pub struct Backend {
    http: reqwest::Client,
    resolver: UrlResolver,
    origin: Option<Url>,
}

impl Backend {
    /// Build a backend handle from a `TransportConfig`.
    pub fn new(
        origin: Option<Url>,
        resolver: UrlResolver,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, origin, resolver))
    }

    /// Build a backend handle around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, origin: Option<Url>, resolver: UrlResolver) -> Self {
        Self {
            http,
            resolver,
            origin,
        }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn resolver(&self) -> &UrlResolver {
        &self.resolver
    }

    pub fn origin(&self) -> Option<&Url> {
        self.origin.as_ref()
    }

    /// Absolute URL for a logical API path.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        self.resolver.endpoint_url(path, self.origin.as_ref())
    }
}

/// `Authorization: Bearer <token>`, marked sensitive so it never shows up in debug output.
pub(crate) fn bearer_header(token: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|_| Error::InvalidHeader("bearer token contains invalid characters".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Read a response into an [`Envelope`].
///
/// Any status may carry a rejection envelope (`ok = false`); a non-2xx
/// response without one is a transport failure, as is a 2xx body that
/// isn't an envelope at all.
pub(crate) async fn read_envelope(resp: reqwest::Response) -> Result<Envelope, Error> {
    let status = resp.status();
    let body = resp.text().await?;
    trace!(status = status.as_u16(), "received response body");

    let envelope = Envelope::parse(&body);

    if !status.is_success() {
        return match envelope {
            Some(envelope) if !envelope.ok => Ok(envelope),
            _ => Err(Error::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown status").into(),
            }),
        };
    }

    envelope.ok_or_else(|| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("response is not an envelope (body preview: {preview:?})"),
            body,
        }
    })
}

// ── Request options ─────────────────────────────────────────────────

/// Per-call request settings: method, extra headers, query and JSON body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Generic typed request client for envelope-wrapped endpoints.
///
/// Every call makes exactly one attempt: no retry, no caching. The session
/// token is read from the [`AuthStore`] when the request is built and is
/// never mutated here, even when the server answers `ok = false`.
#[derive(Clone)]
pub struct BackendClient {
    backend: Backend,
    auth: Arc<AuthStore>,
}

impl BackendClient {
    /// Create a client that shares the auth store's backend handle.
    pub fn new(auth: Arc<AuthStore>) -> Self {
        Self {
            backend: auth.backend().clone(),
            auth,
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    /// Send a request to `path` and unwrap the envelope into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T, Error> {
        let url = self.backend.url(path)?;

        // Captured by value: a concurrent logout does not affect this request.
        let session = self.auth.session();

        let mut headers = options.headers.clone();
        if let Some(token) = session.token() {
            headers.insert(AUTHORIZATION, bearer_header(token)?);
        }

        debug!("{} {}", options.method, url);

        let mut builder = self
            .backend
            .http()
            .request(options.method.clone(), url)
            .headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(ref body) = options.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        read_envelope(resp).await?.into_data()
    }

    /// GET `path` and unwrap the envelope.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.request(path, &RequestOptions::get()).await
    }

    /// POST a JSON body to `path` and unwrap the envelope.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let body = serde_json::to_value(body)?;
        self.request(path, &RequestOptions::post(body)).await
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("backend", &self.backend)
            .field("authenticated", &self.auth.is_authenticated())
            .finish()
    }
}
