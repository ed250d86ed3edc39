//! Async registry client wrapping reqwest.
//!
//! One lookup is two sequential round trips against the search page: a GET
//! for the form tokens, then a POST of the chip number. Nothing is retried
//! and nothing survives the call; retry policy belongs to the caller.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::extract::RecordParser;
use crate::session::SearchSession;
use crate::types::{BreederRecord, LookupError, LookupOutcome, LookupResult};

/// HTTP client for the registry search form.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    search_url: String,
    parser: RecordParser,
}

impl RegistryClient {
    /// Build a client from validated settings.
    pub fn new(config: &RegistryConfig) -> LookupResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| LookupError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            parser: RecordParser::from_config(config),
        })
    }

    /// Client configured from `LOOF_*` environment variables.
    pub fn from_env() -> LookupResult<Self> {
        Self::new(&RegistryConfig::from_env()?)
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Look up a chip number on the registry.
    ///
    /// `chip` is sent verbatim; format validation is the caller's job. An
    /// `Ok` record with only `chip_id` set means the registry had no data.
    pub async fn lookup_by_chip(&self, chip: &str) -> LookupResult<BreederRecord> {
        match self.lookup_inner(chip).await {
            Ok(record) => {
                info!(
                    chip = %chip,
                    breed = record.breed.as_deref().unwrap_or("-"),
                    titles = record.title_count(),
                    empty = record.is_empty(),
                    "registry lookup succeeded"
                );
                Ok(record)
            }
            Err(e) => {
                warn!(chip = %chip, kind = e.kind(), status = ?e.status(), "registry lookup failed: {e}");
                Err(e)
            }
        }
    }

    /// [`lookup_by_chip`](Self::lookup_by_chip) bounded by an overall deadline.
    ///
    /// Dropping the returned future cancels the lookup at any point.
    pub async fn lookup_with_deadline(
        &self,
        chip: &str,
        deadline: Duration,
    ) -> LookupResult<BreederRecord> {
        match tokio::time::timeout(deadline, self.lookup_by_chip(chip)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(chip = %chip, deadline_ms = deadline.as_millis() as u64, "registry lookup deadline exceeded");
                Err(LookupError::Transport(format!(
                    "deadline exceeded after {} ms",
                    deadline.as_millis()
                )))
            }
        }
    }

    /// Lookup folded into the `{success, data | error}` shape.
    pub async fn lookup(&self, chip: &str) -> LookupOutcome {
        LookupOutcome::from(self.lookup_by_chip(chip).await)
    }

    async fn lookup_inner(&self, chip: &str) -> LookupResult<BreederRecord> {
        if chip.is_empty() {
            return Err(LookupError::InvalidInput("chip number is empty".into()));
        }

        let session = self.open_session().await?;
        let html = self.submit(chip, &session).await?;
        self.parser.parse(&html, chip)
    }

    /// Step 1: fetch the search form and scrape its tokens.
    async fn open_session(&self) -> LookupResult<SearchSession> {
        debug!(url = %self.search_url, "fetching search form");

        let resp = self.client.get(&self.search_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Network {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let session = SearchSession::from_search_page(&body)?;
        debug!(form_id = %session.form_id, "search form tokens acquired");
        Ok(session)
    }

    /// Step 2: post the chip number with the session tokens.
    ///
    /// A non-2xx answer fails the lookup instead of being parsed: an error
    /// page would otherwise read as "no data for this chip".
    async fn submit(&self, chip: &str, session: &SearchSession) -> LookupResult<String> {
        debug!(chip = %chip, "submitting search");

        let resp = self
            .client
            .post(&self.search_url)
            .form(&session.form_fields(chip))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Network {
                status: status.as_u16(),
            });
        }

        Ok(resp.text().await?)
    }
}

/// Look up a chip with a client configured from the environment.
pub async fn lookup_by_chip(chip: &str) -> LookupResult<BreederRecord> {
    RegistryClient::from_env()?.lookup_by_chip(chip).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RegistryClient::new(&RegistryConfig::default()).unwrap();
        assert_eq!(client.search_url(), crate::config::DEFAULT_SEARCH_URL);
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = RegistryConfig {
            search_url: "not a url".into(),
            ..RegistryConfig::default()
        };
        let err = RegistryClient::new(&config).err().unwrap();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn test_empty_chip_is_rejected_without_network() {
        let client = RegistryClient::new(&RegistryConfig::default()).unwrap();
        let result = tokio_test::block_on(client.lookup_by_chip(""));
        assert!(matches!(result, Err(LookupError::InvalidInput(_))));
    }

    #[test]
    fn test_lookup_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}
        let client = RegistryClient::new(&RegistryConfig::default()).unwrap();
        let fut = client.lookup_by_chip("250268712612228");
        assert_send(&fut);
    }
}
