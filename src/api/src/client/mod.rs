//! Client for The Racing API (North America).
//!
//! Every fetch returns a [`Fetched`] value: the items plus an optional
//! problem. Failures never escape as errors; callers show the problem as a
//! warning and carry on with an empty list.

pub mod cache;
mod error;

pub use cache::{Cache, CacheCategory};
pub use error::FetchError;

use anyhow::Context;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

use crate::auth::Credentials;
use crate::config::AppConfig;
use crate::normalize::{array_field, extract_meets, extract_races, Normalizer};
use crate::retry::RetryPolicy;
use crate::types::{Meet, Race};

/// Build an endpoint URL under `base_url`, one path segment per part.
///
/// Each part is percent-encoded (`/`, `?` and `#` included), so a meet id
/// can never leave the `/meets/` tree.
fn endpoint_url(base_url: &str, parts: &[&str]) -> Result<Url, FetchError> {
    if let Some(bad) = parts.iter().find(|p| matches!(**p, "" | "." | "..")) {
        return Err(FetchError::InvalidUrl(format!("bad path segment {:?}", bad)));
    }

    let mut url = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidUrl(format!("{} cannot be a base", base_url)))?
        .pop_if_empty()
        .extend(parts);
    Ok(url)
}

/// Build meets URL (date goes in the query string)
pub fn meets_url(base_url: &str) -> Result<Url, FetchError> {
    endpoint_url(base_url, &["meets"])
}

/// Build entries URL
pub fn entries_url(base_url: &str, meet_id: &str) -> Result<Url, FetchError> {
    endpoint_url(base_url, &["meets", meet_id, "entries"])
}

/// Build results URL
pub fn results_url(base_url: &str, meet_id: &str) -> Result<Url, FetchError> {
    endpoint_url(base_url, &["meets", meet_id, "results"])
}

/// Items from one fetch, with the reason they may be missing
#[derive(Debug)]
pub struct Fetched<T> {
    pub items: Vec<T>,
    pub problem: Option<FetchError>,
}

impl<T> Fetched<T> {
    fn ok(items: Vec<T>) -> Self {
        Self {
            items,
            problem: None,
        }
    }

    fn failed(problem: FetchError) -> Self {
        Self {
            items: Vec::new(),
            problem: Some(problem),
        }
    }

    /// User-facing warning text, if the fetch failed
    pub fn warning(&self) -> Option<String> {
        self.problem.as_ref().map(|p| match p.status() {
            Some(401 | 403) => format!(
                "{} (check RACING_API_USERNAME and RACING_API_PASSWORD)",
                p
            ),
            _ => p.to_string(),
        })
    }
}

/// Authenticated, memoizing client for the racing API
pub struct RacingApiClient {
    http: Client,
    base_url: String,
    auth_header: String,
    cache: Cache,
    retry: RetryPolicy,
    normalizer: Normalizer,
}

impl RacingApiClient {
    pub fn new(config: &AppConfig, credentials: &Credentials) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.api.url.clone(),
            auth_header: credentials.authorization_header(),
            cache: Cache::new(config.cache.ttl),
            retry: RetryPolicy::with_retries(config.api.retries),
            normalizer: Normalizer::new(config.display.sentinel.clone()),
        })
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Meets for an ISO date (YYYY-MM-DD)
    pub async fn fetch_meets(&self, date: &str) -> Fetched<Meet> {
        let url = match meets_url(&self.base_url) {
            Ok(url) => url,
            Err(e) => return Fetched::failed(e),
        };
        match self
            .get_envelope(CacheCategory::Meets, date, &url, &[("date", date)])
            .await
        {
            Ok(body) => Fetched::ok(extract_meets(&array_field(&body, "meets"), &self.normalizer)),
            Err(e) => Fetched::failed(e),
        }
    }

    /// Races with entries for a meet
    pub async fn fetch_entries(&self, meet_id: &str) -> Fetched<Race> {
        match entries_url(&self.base_url, meet_id) {
            Ok(url) => self.fetch_races(CacheCategory::Entries, meet_id, &url).await,
            Err(e) => Fetched::failed(e),
        }
    }

    /// Races with results for a meet
    pub async fn fetch_results(&self, meet_id: &str) -> Fetched<Race> {
        match results_url(&self.base_url, meet_id) {
            Ok(url) => self.fetch_races(CacheCategory::Results, meet_id, &url).await,
            Err(e) => Fetched::failed(e),
        }
    }

    async fn fetch_races(&self, category: CacheCategory, meet_id: &str, url: &Url) -> Fetched<Race> {
        match self.get_envelope(category, meet_id, url, &[]).await {
            Ok(body) => Fetched::ok(extract_races(&array_field(&body, "races"))),
            Err(e) => Fetched::failed(e),
        }
    }

    /// GET a JSON envelope, memoized by (endpoint, key). Only 200 counts as success.
    async fn get_envelope(
        &self,
        category: CacheCategory,
        key: &str,
        url: &Url,
        query: &[(&str, &str)],
    ) -> Result<Value, FetchError> {
        if let Some(body) = self.cache.get(category, key).await {
            tracing::debug!("Cache hit: {} {}", category.name(), key);
            return Ok(body);
        }

        tracing::debug!("GET {} {:?}", url, query);

        let http = &self.http;
        let auth = self.auth_header.as_str();
        let response = self
            .retry
            .run(category.name(), || async move {
                http.get(url.clone())
                    .query(query)
                    .header(AUTHORIZATION, auth)
                    .send()
                    .await
            })
            .await
            .map_err(|e| {
                tracing::warn!("{} request failed: {}", category.name(), e);
                FetchError::Transport(e)
            })?;

        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            tracing::warn!("{} returned {}: {}", category.name(), status, text);
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!("{} returned invalid JSON: {}", category.name(), e);
            FetchError::Decode(e.to_string())
        })?;

        self.cache.set(category, key, &body).await;
        Ok(body)
    }
}
