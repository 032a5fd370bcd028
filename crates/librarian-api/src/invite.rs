// Invite endpoints
//
// Thin typed wrappers over `BackendClient::request` for the `/api/invite`
// routes. Expired or unknown invite tokens come back as `ok = false` and
// surface as `Error::Api`.

use crate::client::{BackendClient, RequestOptions};
use crate::error::Error;
use crate::models::{InviteConfig, InviteOption, InviteToken};

impl BackendClient {
    /// Libraries and labels available for new invites.
    pub async fn invite_config(&self) -> Result<InviteConfig, Error> {
        self.get("invite/config").await
    }

    /// Issue a new invite with the given restrictions.
    pub async fn create_invite(&self, option: &InviteOption) -> Result<InviteToken, Error> {
        self.post("invite/create", option).await
    }

    /// Look up an invite by its token.
    pub async fn invite(&self, token: &str) -> Result<InviteToken, Error> {
        self.request("invite", &RequestOptions::get().query("token", token))
            .await
    }
}
