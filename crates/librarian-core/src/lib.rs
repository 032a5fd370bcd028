//! Reactive session and fetch layer between `librarian-api` and front ends.
//!
//! - **[`Librarian`]**: process-wide context. Owns the auth store (session
//!   restored from a [`SessionStorage`] backend) and the request client, and
//!   vends [`FetchResource`] handles.
//!
//! - **[`FetchResource<T>`]**: one endpoint plus observable
//!   `data` / `error` / `loading` state, published through a
//!   `tokio::sync::watch` channel. [`ResourceStream<T>`] adapts that channel
//!   into a `Stream`.
//!
//! - **[`InviteConfigStore`]**: shared copy of the invite configuration.

pub mod config;
pub mod error;
pub mod invites;
pub mod librarian;
pub mod resource;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{LibrarianConfig, TlsVerification};
pub use error::CoreError;
pub use invites::InviteConfigStore;
pub use librarian::Librarian;
pub use resource::{FetchResource, ResourceConfig, ResourceState};
pub use stream::ResourceStream;

// Wire types front ends need without depending on librarian-api directly.
pub use librarian_api::{
    FileStorage, InviteConfig, InviteOption, InviteToken, Library, MemoryStorage,
    RequestOptions, SESSION_KEY, Session, SessionStorage, SharedLibraries,
};
