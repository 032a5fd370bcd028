// librarian-api: Async Rust client for the librarian backend API

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod invite;
pub mod models;
pub mod resolve;
pub mod session;
pub mod storage;
pub mod transport;

pub use auth::AuthStore;
pub use client::{Backend, BackendClient, RequestOptions};
pub use envelope::Envelope;
pub use error::{Error, ErrorKind};
pub use models::{InviteConfig, InviteOption, InviteToken, Library, SharedLibraries};
pub use resolve::UrlResolver;
pub use session::Session;
pub use storage::{FileStorage, MemoryStorage, SESSION_KEY, SessionStorage};
pub use transport::{TlsMode, TransportConfig};
