// ── Reactive resource streams ──
//
// `Stream` adapter over a resource's watch channel, for consumers that
// prefer `StreamExt` combinators over `watch::Receiver::changed()`.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::resource::ResourceState;

/// Yields the current state first, then a new snapshot on every change.
pub struct ResourceStream<T: Send + Sync + 'static> {
    inner: WatchStream<ResourceState<T>>,
}

impl<T: Send + Sync + 'static> ResourceStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<ResourceState<T>>) -> Self {
        Self {
            inner: WatchStream::new(receiver),
        }
    }
}

impl<T: Send + Sync + 'static> Stream for ResourceStream<T> {
    type Item = ResourceState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream is Unpin (it boxes its future), so re-pinning is fine.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
