use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{DriverLookup, GrandPrix, Page, QualifyingResults, RaceResults, SessionItem};
use crate::error::{ImporterError, Result};
use crate::traits::{RaceDataProvider, ResultEntry, SessionDescriptor, SessionListing, UpstreamEvent};

pub const DEFAULT_BASE_URL: &str = "https://hyprace-api.p.rapidapi.com";

/// Bounded retry for rate-limited (429) and transport-failed requests.
///
/// The wait grows linearly: `backoff * (attempt + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Delay before retry number `attempt + 1` (attempts are zero-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff * (attempt + 1)
    }

    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(2000))
    }
}

#[derive(Debug, Clone)]
pub struct HypraceConfig {
    pub base_url: String,
    pub api_key: String,
    pub retry: RetryPolicy,
}

impl HypraceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Client for the Hyprace API served through RapidAPI.
pub struct HypraceClient {
    base_url: String,
    api_key: String,
    api_host: String,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl HypraceClient {
    pub fn new(config: HypraceConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let api_host = Url::parse(&base_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .ok_or_else(|| {
                ImporterError::InvalidConfig(format!("base url has no host: {}", base_url))
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key: config.api_key,
            api_host,
            retry: config.retry,
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;

        loop {
            debug!("GET {} (attempt {})", url, attempt + 1);
            let sent = self
                .client
                .get(&url)
                .header("X-RapidAPI-Key", &self.api_key)
                .header("X-RapidAPI-Host", &self.api_host)
                .send()
                .await;

            let response = match sent {
                Ok(response) => response,
                Err(e) if (e.is_timeout() || e.is_connect()) && self.retry.allows_retry(attempt) => {
                    let wait = self.retry.delay_for(attempt);
                    warn!("Request to {} failed ({}), retrying in {:?}", url, e, wait);
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                if !self.retry.allows_retry(attempt) {
                    return Err(ImporterError::RateLimited {
                        url,
                        attempts: attempt + 1,
                    });
                }
                let wait = self.retry.delay_for(attempt);
                warn!("Rate limited on {}, waiting {:?}", url, wait);
                tokio::time::sleep(wait).await;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                return Err(ImporterError::UpstreamStatus {
                    url,
                    status: status.as_u16(),
                });
            }

            let body = response.text().await?;
            return Ok(serde_json::from_str(&body)?);
        }
    }
}

#[async_trait::async_trait]
impl RaceDataProvider for HypraceClient {
    async fn season_events(&self, season_year: i32) -> Result<Vec<UpstreamEvent>> {
        let page: Page<GrandPrix> = self
            .get_json(&format!(
                "/v2/grands-prix?seasonYear={}&pageSize=25",
                season_year
            ))
            .await?;

        Ok(page.items.into_iter().map(UpstreamEvent::from).collect())
    }

    async fn event_sessions(
        &self,
        event_id: &str,
        listing: SessionListing,
    ) -> Result<Vec<SessionDescriptor>> {
        let page: Page<SessionItem> = self
            .get_json(&format!(
                "/v2/grands-prix/{}/{}",
                event_id,
                listing.path_segment()
            ))
            .await?;

        Ok(page
            .items
            .into_iter()
            .map(SessionDescriptor::from)
            .collect())
    }

    async fn session_results(
        &self,
        event_id: &str,
        listing: SessionListing,
        session_id: &str,
    ) -> Result<Vec<ResultEntry>> {
        let path = format!(
            "/v2/grands-prix/{}/{}/{}/results",
            event_id,
            listing.path_segment(),
            session_id
        );

        let entries = match listing {
            SessionListing::Races => self
                .get_json::<RaceResults>(&path)
                .await?
                .participations
                .into_iter()
                .map(ResultEntry::from)
                .collect(),
            SessionListing::Qualifying => self
                .get_json::<QualifyingResults>(&path)
                .await?
                .results
                .into_iter()
                .map(ResultEntry::from)
                .collect(),
        };

        Ok(entries)
    }

    async fn driver_family_name(&self, driver_id: &str) -> Result<Option<String>> {
        let lookup: DriverLookup = self
            .get_json(&format!("/v2/drivers/{}", driver_id))
            .await?;
        Ok(lookup.into_driver().last_name)
    }

    fn name(&self) -> &'static str {
        "Hyprace"
    }
}
