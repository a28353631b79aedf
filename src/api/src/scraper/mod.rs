//! Racecard scraper for racingpost.com (U.S. thoroughbred tracks).
//!
//! An alternative source to the racing API: race links come from a course's
//! meeting page, runners from each racecard page.

pub mod parsers;
pub mod rate_limiter;

pub use parsers::{MeetingParser, RaceCardParser};
pub use rate_limiter::RateLimiter;

use anyhow::{Context, Result};
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::AppConfig;
use crate::types::{ScrapedRace, ScrapedRunner};

pub const BASE_URL: &str = "https://www.racingpost.com";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// U.S. track names and their Racing Post course codes
pub const TRACK_CODES: [(&str, u32); 14] = [
    ("Churchill Downs", 308),
    ("Gulfstream Park", 272),
    ("Santa Anita", 257),
    ("Belmont Park", 259),
    ("Aqueduct", 270),
    ("Keeneland", 304),
    ("Oaklawn Park", 258),
    ("Fair Grounds", 300),
    ("Tampa Bay Downs", 285),
    ("Del Mar", 277),
    ("Saratoga", 273),
    ("Laurel Park", 305),
    ("Louisiana Downs", 299),
    ("Mountaineer", 307),
];

/// Course code for a track name (case-insensitive)
pub fn track_code(track_name: &str) -> Option<u32> {
    TRACK_CODES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(track_name.trim()))
        .map(|(_, code)| *code)
}

/// Build meeting page URL, e.g. `/racecards/273/saratoga/2024-08-03`
pub fn meeting_url(track_name: &str, code: u32, date: &str) -> String {
    let slug = track_name.trim().to_lowercase().replace(' ', "-");
    format!("{}/racecards/{}/{}/{}", BASE_URL, code, slug, date)
}

/// Scraped runners as records the normalizer understands
pub fn runner_records(runners: &[ScrapedRunner]) -> Vec<Value> {
    runners
        .iter()
        .map(|r| {
            json!({
                "name": r.name,
                "odds": r.odds,
                "jockey": r.jockey,
                "trainer": r.trainer,
            })
        })
        .collect()
}

/// HTTP client for Racing Post pages
pub struct RacingPostScraper {
    http: Client,
    limiter: RateLimiter,
}

impl RacingPostScraper {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            limiter: RateLimiter::per_minute(config.scraper.rpm),
        })
    }

    /// Races at a track on a date. Unknown tracks and non-200 pages give an empty list.
    pub async fn race_links(&self, track_name: &str, date: &str) -> Result<Vec<ScrapedRace>> {
        let Some(code) = track_code(track_name) else {
            tracing::warn!("No Racing Post code for track: {}", track_name);
            return Ok(Vec::new());
        };

        match self.fetch_page(&meeting_url(track_name, code, date)).await? {
            Some(html) => MeetingParser::parse(&html),
            None => Ok(Vec::new()),
        }
    }

    /// Runners on a racecard page. A non-200 page gives an empty list.
    pub async fn race_runners(&self, race_url: &str) -> Result<Vec<ScrapedRunner>> {
        match self.fetch_page(race_url).await? {
            Some(html) => RaceCardParser::parse(&html),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<Option<String>> {
        self.limiter.acquire().await;
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("{} returned {}", url, status);
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{Column, Normalizer, TableKind};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_track_code() {
        assert_eq!(track_code("Saratoga"), Some(273));
        assert_eq!(track_code("churchill downs"), Some(308));
        assert_eq!(track_code("Ascot"), None);
    }

    #[test]
    fn test_meeting_url() {
        assert_eq!(
            meeting_url("Tampa Bay Downs", 285, "2024-02-10"),
            "https://www.racingpost.com/racecards/285/tampa-bay-downs/2024-02-10"
        );
    }

    #[test]
    fn test_runner_records_normalize() {
        let runners = vec![
            ScrapedRunner {
                name: "Thorpedo Anna".to_string(),
                odds: "6/5".to_string(),
                jockey: "Brian Hernandez Jr.".to_string(),
                trainer: String::new(),
            },
            ScrapedRunner {
                name: "Idiomatic".to_string(),
                odds: "N/A".to_string(),
                jockey: String::new(),
                trainer: String::new(),
            },
        ];
        let table = Normalizer::default().table(&runner_records(&runners), TableKind::Entries);

        // Trainer is blank everywhere
        assert_eq!(table.columns, vec![Column::Horse, Column::Jockey, Column::Odds]);
        assert_eq!(table.cell(1, Column::Jockey), Some("N/A"));
    }

    #[tokio::test]
    async fn test_unknown_track_is_empty() {
        let scraper = RacingPostScraper::new(&AppConfig::default()).unwrap();
        let races = scraper.race_links("Ascot", "2024-06-18").await.unwrap();
        assert!(races.is_empty());
    }

    #[tokio::test]
    async fn test_race_runners_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/racecards/273/saratoga/2024-08-03/870001"))
            .and(header("user-agent", BROWSER_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<div class="racecard-number__row"><a class="racecard-horse-name">Alpha</a></div>"#,
            ))
            .mount(&server)
            .await;

        let scraper = RacingPostScraper::new(&AppConfig::default()).unwrap();
        let url = format!("{}/racecards/273/saratoga/2024-08-03/870001", server.uri());
        let runners = scraper.race_runners(&url).await.unwrap();

        assert_eq!(runners.len(), 1);
        assert_eq!(runners[0].name, "Alpha");
    }

    #[tokio::test]
    async fn test_race_runners_non_200_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let scraper = RacingPostScraper::new(&AppConfig::default()).unwrap();
        let runners = scraper.race_runners(&server.uri()).await.unwrap();
        assert!(runners.is_empty());
    }
}
