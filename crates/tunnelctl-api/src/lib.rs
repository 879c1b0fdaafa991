// tunnelctl-api: Async Rust client for the tunnel control-plane REST API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::TunnelClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
