//! Per-action request handlers shared by the CLI and the HTTP surface.
//!
//! Each user action (pick a date, pick a meet) is one call here. Repeated
//! calls are cheap because the client memoizes upstream responses.

use chrono::{Local, NaiveDate};

use crate::client::RacingApiClient;
use crate::normalize::{Normalizer, TableKind};
use crate::selector::MeetSelector;
use crate::types::{MeetsResponse, Race, RaceTable, RacesResponse};

/// Parse a YYYY-MM-DD date
pub fn parse_date(input: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date '{}': expected YYYY-MM-DD", input))
}

/// Today's date in local time, formatted for the API
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Meets for a date, with selector options
pub async fn load_meets(client: &RacingApiClient, date: &NaiveDate) -> (MeetsResponse, MeetSelector) {
    let date = date.format("%Y-%m-%d").to_string();
    let fetched = client.fetch_meets(&date).await;
    let warning = fetched.warning();
    let selector = MeetSelector::new(fetched.items);

    tracing::info!("{} meets on {}", selector.len(), date);

    let response = MeetsResponse {
        date,
        meets: selector.meets().to_vec(),
        options: selector.options(),
        warning,
    };
    (response, selector)
}

/// Entries or results for a meet, one normalized table per race
pub async fn load_races(client: &RacingApiClient, meet_id: &str, kind: TableKind) -> RacesResponse {
    let fetched = match kind {
        TableKind::Entries => client.fetch_entries(meet_id).await,
        TableKind::Results => client.fetch_results(meet_id).await,
    };

    RacesResponse {
        meet_id: meet_id.to_string(),
        warning: fetched.warning(),
        races: race_tables(&fetched.items, client.normalizer(), kind),
    }
}

/// Normalize each race's runners
pub fn race_tables(races: &[Race], normalizer: &Normalizer, kind: TableKind) -> Vec<RaceTable> {
    races
        .iter()
        .map(|race| RaceTable {
            title: race.title(),
            race_number: race.race_number.clone(),
            race_name: race.race_name.clone(),
            post_time: race.post_time.clone(),
            table: normalizer.table(&race.runners, kind),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use crate::config::AppConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(base_url: &str) -> RacingApiClient {
        let mut config = AppConfig::default();
        config.api.url = base_url.to_string();
        RacingApiClient::new(&config, &Credentials::new("user", "pass")).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-05-04").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 4).unwrap()
        );
        assert!(parse_date("05/04/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[tokio::test]
    async fn test_saratoga_scenario() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/meets"))
            .and(query_param("date", "2024-05-04"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meets": [{"meet_id": "1", "track_name": "Saratoga", "country": "USA", "date": "2024-05-04"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let date = parse_date("2024-05-04").unwrap();
        let (response, selector) = load_meets(&client, &date).await;

        assert!(response.warning.is_none());
        assert_eq!(response.options.len(), 1);
        assert_eq!(response.options[0].label, "Saratoga (USA)");
        assert_eq!(selector.select_index(0).unwrap().meet_id, "1");
    }

    #[tokio::test]
    async fn test_load_races_with_missing_runners() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/meets/1/entries"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "races": [
                    {"race_number": 1, "race_name": "Maiden", "runners": [
                        {"program_number": "1", "horse_name": "Alpha", "jockey": "not an object"},
                        {"program_number": "2", "horse_name": "Bravo"}
                    ]},
                    {"race_number": 2}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let response = load_races(&client, "1", TableKind::Entries).await;

        assert_eq!(response.races.len(), 2);
        assert_eq!(response.races[0].title, "Race 1 - Maiden");
        assert_eq!(response.races[0].table.rows.len(), 2);
        assert!(response.races[1].table.is_empty());
    }

    #[tokio::test]
    async fn test_load_races_failure_carries_warning() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/meets/1/results"))
            .respond_with(ResponseTemplate::new(404).set_body_string("meet not found"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let response = load_races(&client, "1", TableKind::Results).await;

        assert!(response.races.is_empty());
        assert_eq!(response.warning.as_deref(), Some("HTTP 404: meet not found"));
    }
}
