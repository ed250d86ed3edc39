//! loof-sync server: HTTP boundary and CLI around the LOOF registry lookup client.

pub mod config;
pub mod transport;
pub mod types;

pub use config::{resolve_addr, resolve_registry_config, RegistryOverrides};
pub use transport::{router, HttpTransport};
