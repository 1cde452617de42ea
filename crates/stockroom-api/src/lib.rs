// stockroom-api: Async Rust client for the stockroom inventory REST API

mod auth;
pub mod client;
pub mod error;
mod inventory;
pub mod models;
mod products;
mod suppliers;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
