//! Server-side types: errors and the boundary's JSON bodies.

pub mod error;

pub use error::{ServerError, ServerResult};

/// Message for a request without a `puce` parameter.
pub const MISSING_CHIP_MESSAGE: &str = "Puce manquante";

/// Message for a `puce` that is not exactly 15 digits.
pub const INVALID_CHIP_MESSAGE: &str = "Format invalide : 15 chiffres requis";

/// Message when the lookup task itself failed.
pub const SERVER_ERROR_MESSAGE: &str = "Erreur serveur";
