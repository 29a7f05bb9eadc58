//! Storefront backend.
//!
//! An axum application serving auth, products, categories and user
//! administration under `/api`, backed by JSON document collections on a
//! [`storefront_cache::KvStore`].

pub mod api;
pub mod config;
pub mod middleware;
pub mod state;

pub use api::{build_app, ApiError, ApiResponse};
pub use config::{build_server_config, load_server_config, ServerConfig};
pub use state::{AppState, Store};
