// ── Reactive fetch resource ──
//
// A request bound to one path, with its `data` / `error` / `loading`
// state published through a `watch` channel. Passive observers subscribe;
// direct callers of `fetch()` / `reload()` also get the result back.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use librarian_api::{BackendClient, RequestOptions};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::stream::ResourceStream;

/// Creation-time behavior of a [`FetchResource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Issue the first fetch as soon as the resource is created.
    pub immediate: bool,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self { immediate: true }
    }
}

impl ResourceConfig {
    /// Don't fetch until `fetch()` or `reload()` is called.
    pub fn lazy() -> Self {
        Self { immediate: false }
    }
}

/// Observable state of a [`FetchResource`].
///
/// After a successful fetch `data` is set and `error` is cleared. After a
/// failed fetch `error` is set and `data` keeps the last good value, if any.
#[derive(Debug)]
pub struct ResourceState<T> {
    pub data: Option<Arc<T>>,
    pub error: Option<CoreError>,
    /// True while at least one request from this resource is in flight.
    pub loading: bool,
}

impl<T> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            loading: self.loading,
        }
    }
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
        }
    }
}

struct Inner<T> {
    client: BackendClient,
    path: String,
    options: RequestOptions,
    state: watch::Sender<ResourceState<T>>,
    in_flight: AtomicUsize,
}

// Counter updates happen under the channel's write lock so `loading`
// can never be published out of order.
impl<T> Inner<T> {
    fn acquire(&self) {
        self.state.send_modify(|state| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            state.loading = true;
        });
    }

    /// Drop one in-flight request and apply its outcome in the same update.
    fn release(&self, apply: impl FnOnce(&mut ResourceState<T>)) {
        self.state.send_modify(|state| {
            let remaining = self
                .in_flight
                .fetch_sub(1, Ordering::SeqCst)
                .saturating_sub(1);
            state.loading = remaining > 0;
            apply(state);
        });
    }
}

/// One in-flight request. Dropping it unsettled (a cancelled or timed-out
/// `fetch()`) still releases its share of `loading`.
struct InFlight<T> {
    inner: Arc<Inner<T>>,
    armed: bool,
}

impl<T> InFlight<T> {
    fn finish(mut self, apply: impl FnOnce(&mut ResourceState<T>)) {
        self.armed = false;
        self.inner.release(apply);
    }
}

impl<T> Drop for InFlight<T> {
    fn drop(&mut self) {
        if self.armed {
            debug!(path = %self.inner.path, "fetch dropped before completion");
            self.inner.release(|_| {});
        }
    }
}

/// A reactive handle on one backend endpoint.
///
/// Cloning is cheap; clones share state. Overlapping `fetch()` calls run
/// independently and whichever completes last decides `data` / `error`.
pub struct FetchResource<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for FetchResource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> FetchResource<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Create a resource for `path`.
    ///
    /// With `config.immediate` the first fetch is spawned on the current
    /// Tokio runtime and `loading` is already true when this returns. Its
    /// failure is only observable through `error`.
    pub fn new(
        client: BackendClient,
        path: impl Into<String>,
        options: RequestOptions,
        config: ResourceConfig,
    ) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        let resource = Self {
            inner: Arc::new(Inner {
                client,
                path: path.into(),
                options,
                state,
                in_flight: AtomicUsize::new(0),
            }),
        };

        if config.immediate {
            resource.spawn_fetch();
        }

        resource
    }

    fn spawn_fetch(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(path = %self.inner.path, "no async runtime, skipping immediate fetch");
            return;
        };

        let guard = self.begin();
        let this = self.clone();
        runtime.spawn(async move {
            if let Err(e) = this.settle(guard).await {
                warn!(path = %this.inner.path, error = %e, "immediate fetch failed");
            }
        });
    }

    /// Issue the request and publish the outcome.
    ///
    /// The failure is mirrored into `error` and also returned.
    pub async fn fetch(&self) -> Result<Arc<T>, CoreError> {
        let guard = self.begin();
        self.settle(guard).await
    }

    /// Clear `data` and `error`, then fetch.
    pub async fn reload(&self) -> Result<Arc<T>, CoreError> {
        self.inner.state.send_modify(|state| {
            state.data = None;
            state.error = None;
        });
        self.fetch().await
    }

    fn begin(&self) -> InFlight<T> {
        self.inner.acquire();
        InFlight {
            inner: Arc::clone(&self.inner),
            armed: true,
        }
    }

    async fn settle(&self, guard: InFlight<T>) -> Result<Arc<T>, CoreError> {
        debug!(path = %self.inner.path, "fetching resource");

        let result = self
            .inner
            .client
            .request::<T>(&self.inner.path, &self.inner.options)
            .await
            .map(Arc::new)
            .map_err(CoreError::from);

        guard.finish(|state| match &result {
            Ok(data) => {
                state.data = Some(Arc::clone(data));
                state.error = None;
            }
            Err(e) => state.error = Some(e.clone()),
        });

        result
    }
}

impl<T> FetchResource<T> {
    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ResourceState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn data(&self) -> Option<Arc<T>> {
        self.inner.state.borrow().data.clone()
    }

    pub fn error(&self) -> Option<CoreError> {
        self.inner.state.borrow().error.clone()
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.inner.state.subscribe()
    }

    /// Wait until nothing is in flight and return the settled state.
    pub async fn settled(&self) -> ResourceState<T> {
        let mut rx = self.subscribe();
        match rx.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }
}

impl<T> FetchResource<T>
where
    T: Send + Sync + 'static,
{
    /// Convert state changes into a `Stream`.
    pub fn stream(&self) -> ResourceStream<T> {
        ResourceStream::new(self.subscribe())
    }
}
