//! # API crate — browser client for the travel site's REST backend
//!
//! Everything the UI needs to talk to `/api/v1/`: CSRF-token resolution, a
//! transport-agnostic client with centralised failure reporting, typed wire
//! models and resource-scoped call groups. It has no Dioxus dependency so it
//! can be exercised natively.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | [`ClientConfig`]: base URL, timeout, login and media paths |
//! | [`token`] | CSRF token lookup over meta tag → cookie → hidden field |
//! | [`transport`] | [`Transport`] trait, `reqwest` implementation and an in-memory one |
//! | [`client`] | [`ApiClient`]: token attachment, failure classification, notification |
//! | [`resources`] | `scenic()`, `routes()`, `hotels()`, `foods()`, `news()`, `users()`, `favorites()`, `orders()`, `comments()` |
//! | [`models`] | Favorite and order wire types |
//! | [`notify`] | [`Notifier`] seam used to surface failures |
//! | [`error`] | [`ApiError`] and its user-facing messages |

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod resources;
pub mod token;
pub mod transport;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use models::{
    FavoriteList, FavoriteRecord, FavoriteTarget, FavoriteToggle, OrderStatus, OrderSummary,
    StatusReply, TargetType,
};
pub use notify::{NoticeKind, Notifier, RecordingNotifier};
pub use token::{resolve_token, CsrfToken, StaticTokenSources, TokenSources};
pub use transport::{
    ApiRequest, ApiResponse, MemoryTransport, ReqwestTransport, Transport, TransportError,
};
