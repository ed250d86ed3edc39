//! Transports exposing the registry lookup.

pub mod http;

pub use http::{router, HttpTransport};
