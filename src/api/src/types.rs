//! Domain and response types for the race viewer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::NormalizedTable;

/// A race day at a single track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meet {
    pub meet_id: String,
    pub track_name: String,
    pub country: String,
    pub date: String,
}

impl Meet {
    /// Display label, e.g. "Saratoga (USA)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.track_name, self.country)
    }
}

/// A race within a meet, with its raw runner records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub race_number: Option<String>,
    pub race_name: Option<String>,
    pub post_time: Option<String>,
    /// Upstream `runners` (or `results`) records, untouched
    #[serde(default)]
    pub runners: Vec<Value>,
}

impl Race {
    /// Heading like "Race 3 - Allowance (13:05)"
    pub fn title(&self) -> String {
        let mut title = match &self.race_number {
            Some(n) => format!("Race {}", n),
            None => "Race".to_string(),
        };
        if let Some(name) = &self.race_name {
            title.push_str(" - ");
            title.push_str(name);
        }
        if let Some(time) = &self.post_time {
            title.push_str(&format!(" ({})", time));
        }
        title
    }
}

/// A race link scraped from a Racing Post meeting page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedRace {
    pub race_id: Option<String>,
    pub name: String,
    pub time: String,
    pub url: String,
}

/// A runner row scraped from a Racing Post racecard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedRunner {
    pub name: String,
    pub odds: String,
    pub jockey: String,
    pub trainer: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Selector option for a meet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetOption {
    pub meet_id: String,
    pub label: String,
}

/// Response for `GET /meets`
#[derive(Debug, Serialize)]
pub struct MeetsResponse {
    pub date: String,
    pub meets: Vec<Meet>,
    pub options: Vec<MeetOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// One race with its normalized table
#[derive(Debug, Serialize)]
pub struct RaceTable {
    pub title: String,
    pub race_number: Option<String>,
    pub race_name: Option<String>,
    pub post_time: Option<String>,
    pub table: NormalizedTable,
}

/// Response for `GET /meets/{id}/entries` and `/results`
#[derive(Debug, Serialize)]
pub struct RacesResponse {
    pub meet_id: String,
    pub races: Vec<RaceTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meet_label() {
        let meet = Meet {
            meet_id: "1".to_string(),
            track_name: "Saratoga".to_string(),
            country: "USA".to_string(),
            date: "2024-05-04".to_string(),
        };
        assert_eq!(meet.label(), "Saratoga (USA)");
    }

    #[test]
    fn test_race_title() {
        let race = Race {
            race_number: Some("3".to_string()),
            race_name: Some("Allowance".to_string()),
            post_time: Some("13:05".to_string()),
            runners: vec![],
        };
        assert_eq!(race.title(), "Race 3 - Allowance (13:05)");

        let bare = Race::default();
        assert_eq!(bare.title(), "Race");
    }
}
