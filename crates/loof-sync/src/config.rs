//! Registry client configuration.
//!
//! Values come from [`RegistryConfig::default`], optionally overlaid with
//! `LOOF_*` environment variables via [`RegistryConfig::from_env`]. Callers
//! (the CLI) apply their own overrides on top.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{LookupError, LookupResult};

/// Public search page of the LOOF registry.
pub const DEFAULT_SEARCH_URL: &str = "https://loof.asso.fr/mon-chat-est-il-enregistre-au-loof";

/// Federation credited when the page does not name one.
pub const DEFAULT_FEDERATION: &str = "LOOF";

pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Browser-like user agent; the registry serves its form to browsers.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/131.0.0.0 Safari/537.36";

/// Breeds recognised as a prefix of the description text, checked in order.
pub const DEFAULT_KNOWN_BREEDS: &[&str] = &[
    "Maine Coon",
    "Norvégien",
    "Bengal",
    "Ragdoll",
    "Sacré de Birmanie",
    "Chartreux",
    "Sibérien",
];

/// How title entries are laid out inside each list item of the result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleLayout {
    /// Title in `span.placeholder.i-title`, date embedded in the item text as
    /// `Obtenu le : DD-MM-YYYY`.
    #[default]
    InlineDate,
    /// Title, federation and date each in their own placeholder span
    /// (`i-title`, `i-federation`, `i-date`).
    SplitColumns,
}

impl FromStr for TitleLayout {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "inline_date" | "inline" => Ok(TitleLayout::InlineDate),
            "split_columns" | "split" => Ok(TitleLayout::SplitColumns),
            other => Err(LookupError::InvalidInput(format!(
                "unknown title layout '{other}' (expected inline_date or split_columns)"
            ))),
        }
    }
}

/// Settings for [`RegistryClient`](crate::RegistryClient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Search page URL; both the GET and the POST go here.
    pub search_url: String,
    /// Timeout applied to each HTTP step.
    pub request_timeout_ms: u64,
    pub user_agent: String,
    pub title_layout: TitleLayout,
    pub known_breeds: Vec<String>,
    pub default_federation: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            title_layout: TitleLayout::default(),
            known_breeds: DEFAULT_KNOWN_BREEDS.iter().map(|b| b.to_string()).collect(),
            default_federation: DEFAULT_FEDERATION.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Defaults overlaid with `LOOF_SEARCH_URL`, `LOOF_TIMEOUT_MS`,
    /// `LOOF_TITLE_LAYOUT` and `LOOF_USER_AGENT`.
    pub fn from_env() -> LookupResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> LookupResult<Self> {
        let mut config = Self::default();

        if let Some(url) = var("LOOF_SEARCH_URL") {
            config.search_url = url;
        }
        if let Some(ms) = var("LOOF_TIMEOUT_MS") {
            config.request_timeout_ms = ms.trim().parse().map_err(|_| {
                LookupError::InvalidInput(format!("LOOF_TIMEOUT_MS is not a number: {ms:?}"))
            })?;
        }
        if let Some(layout) = var("LOOF_TITLE_LAYOUT") {
            config.title_layout = layout.parse()?;
        }
        if let Some(ua) = var("LOOF_USER_AGENT") {
            config.user_agent = ua;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the client cannot work with.
    pub fn validate(&self) -> LookupResult<()> {
        let url = url::Url::parse(&self.search_url).map_err(|e| {
            LookupError::InvalidInput(format!("invalid search url '{}': {e}", self.search_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LookupError::InvalidInput(format!(
                "search url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(LookupError::InvalidInput(
                "request timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
