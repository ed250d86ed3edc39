//! Core data types for registry lookups.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of digits in an animal microchip identifier.
pub const CHIP_DIGITS: usize = 15;

/// A validated 15-digit microchip number.
///
/// The lookup client itself accepts any non-empty string; this type is for
/// callers that enforce the format before invoking it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChipId(String);

impl ChipId {
    /// Trim surrounding whitespace and require exactly 15 ASCII digits.
    pub fn parse(raw: &str) -> LookupResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LookupError::InvalidInput("chip number is empty".into()));
        }
        if trimmed.len() != CHIP_DIGITS || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LookupError::InvalidInput(format!(
                "chip number must be exactly {CHIP_DIGITS} digits, got {trimmed:?}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChipId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sex of a registered animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Map the registry's free text ("Mâle", "male", "Femelle") to a sex.
    pub fn from_registry_text(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "mâle" | "male" => Some(Sex::Male),
            "femelle" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

/// One distinction obtained by an animal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    /// Award text, suffixed with ` (YYYY)` when the date is known.
    pub name: String,
    pub federation: String,
    /// `DD-MM-YYYY`, empty when the page gave no usable date.
    pub obtained_date: String,
}

/// Normalized result of a registry lookup.
///
/// Only `chip_id` is guaranteed. A record with nothing else means the
/// registry had no data for the chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreederRecord {
    pub chip_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification_grade: Option<String>,
    /// Most recent first. `None` when the page listed no titles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titles: Option<Vec<Title>>,
}

impl BreederRecord {
    /// Create a record carrying only the chip identifier.
    pub fn new(chip_id: impl Into<String>) -> Self {
        Self {
            chip_id: chip_id.into(),
            breed: None,
            color: None,
            sex: None,
            qualification_grade: None,
            titles: None,
        }
    }

    /// True when no field beyond the chip identifier was found.
    pub fn is_empty(&self) -> bool {
        self.breed.is_none()
            && self.color.is_none()
            && self.sex.is_none()
            && self.qualification_grade.is_none()
            && self.titles.is_none()
    }

    pub fn title_count(&self) -> usize {
        self.titles.as_ref().map_or(0, Vec::len)
    }
}

/// Errors that can occur during a registry lookup.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: registry returned HTTP {status}")]
    Network { status: u16 },

    /// Connection, TLS or timeout failure before any status was received.
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Search form tokens not found")]
    TokenNotFound,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl LookupError {
    /// Stable machine-readable code for this failure.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::InvalidInput(_) => "invalid_input",
            LookupError::Network { .. } | LookupError::Transport(_) => "network_error",
            LookupError::TokenNotFound => "token_not_found",
            LookupError::Parse(_) => "parse_error",
            LookupError::Unknown(_) => "unknown_error",
        }
    }

    /// HTTP status reported by the registry, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            LookupError::Network { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return LookupError::Network {
                status: status.as_u16(),
            };
        }
        if e.is_builder() {
            return LookupError::Unknown(e.to_string());
        }
        if e.is_timeout() {
            return LookupError::Transport(format!("request timed out: {e}"));
        }
        LookupError::Transport(e.to_string())
    }
}

/// Convenience result type.
pub type LookupResult<T> = Result<T, LookupError>;

/// Wire shape handed to callers: `{success, data}` or `{success, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BreederRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LookupOutcome {
    pub fn found(data: BreederRecord) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl From<LookupResult<BreederRecord>> for LookupOutcome {
    fn from(result: LookupResult<BreederRecord>) -> Self {
        match result {
            Ok(record) => LookupOutcome::found(record),
            Err(e) => LookupOutcome::failed(e.to_string()),
        }
    }
}
