//! loof-sync: LOOF registry lookup client. Fetches the public search form,
//! submits a microchip number and normalizes the breeder data on the result page.

pub mod breed;
pub mod client;
pub mod config;
pub mod extract;
pub mod patch;
pub mod session;
pub mod titles;
pub mod types;

pub use breed::BreedCatalog;
pub use client::{lookup_by_chip, RegistryClient};
pub use config::{RegistryConfig, TitleLayout};
pub use extract::RecordParser;
pub use patch::RecordPatch;
pub use session::SearchSession;
pub use types::*;
