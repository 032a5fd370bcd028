// ── Invite configuration store ──
//
// Holds the most recently fetched `InviteConfig` (libraries + labels) so
// several consumers can share one copy. A failed refresh keeps the
// previous value.

use std::sync::Arc;

use librarian_api::{BackendClient, InviteConfig};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;

pub struct InviteConfigStore {
    client: BackendClient,
    config: watch::Sender<Option<Arc<InviteConfig>>>,
}

impl InviteConfigStore {
    pub fn new(client: BackendClient) -> Self {
        let (config, _) = watch::channel(None);
        Self { client, config }
    }

    /// The last successfully fetched config.
    pub fn current(&self) -> Option<Arc<InviteConfig>> {
        self.config.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<InviteConfig>>> {
        self.config.subscribe()
    }

    /// Fetch `/api/invite/config` and publish it.
    pub async fn fetch_invite_config(&self) -> Result<Arc<InviteConfig>, CoreError> {
        match self.client.invite_config().await {
            Ok(config) => {
                debug!(
                    libraries = config.libraries.len(),
                    labels = config.labels.len(),
                    "invite config refreshed"
                );
                let config = Arc::new(config);
                self.config.send_replace(Some(Arc::clone(&config)));
                Ok(config)
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch invite config");
                Err(e.into())
            }
        }
    }
}
