//! Envelope, meet and race extraction.

use serde_json::Value;

use super::{resolve_paths, Normalizer, Path};
use crate::types::{Meet, Race};

const MEET_ID: &[Path] = &[&["meet_id"]];
const TRACK_NAME: &[Path] = &[&["track_name"]];
const COUNTRY: &[Path] = &[&["country"]];
const DATE: &[Path] = &[&["date"]];

const RACE_NUMBER: &[Path] = &[&["race_number"], &["number"]];
const RACE_NAME: &[Path] = &[&["race_name"], &["name"]];
const POST_TIME: &[Path] = &[&["post_time"], &["off_time"]];
const RUNNER_LISTS: [&str; 2] = ["runners", "results"];

/// Named array field of a response envelope. Missing or non-array is empty.
pub fn array_field(body: &Value, field: &str) -> Vec<Value> {
    body.get(field)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Meets from `meets` records. Records without a `meet_id` are dropped.
pub fn extract_meets(records: &[Value], normalizer: &Normalizer) -> Vec<Meet> {
    let or_sentinel = |value: Option<String>| value.unwrap_or_else(|| normalizer.sentinel().to_string());

    records
        .iter()
        .filter_map(|record| {
            let meet_id = resolve_paths(record, MEET_ID)?;
            Some(Meet {
                meet_id,
                track_name: or_sentinel(resolve_paths(record, TRACK_NAME)),
                country: or_sentinel(resolve_paths(record, COUNTRY)),
                date: or_sentinel(resolve_paths(record, DATE)),
            })
        })
        .collect()
}

/// Races from `races` records. Non-object records are dropped; a race with
/// neither `runners` nor `results` gets an empty runner list.
pub fn extract_races(records: &[Value]) -> Vec<Race> {
    records
        .iter()
        .filter(|record| record.is_object())
        .map(|record| Race {
            race_number: resolve_paths(record, RACE_NUMBER),
            race_name: resolve_paths(record, RACE_NAME),
            post_time: resolve_paths(record, POST_TIME),
            runners: runner_list(record),
        })
        .collect()
}

fn runner_list(race: &Value) -> Vec<Value> {
    RUNNER_LISTS
        .iter()
        .find_map(|key| race.get(*key).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_field() {
        let body = json!({"meets": [{"meet_id": "1"}], "other": 3});
        assert_eq!(array_field(&body, "meets").len(), 1);
        assert!(array_field(&body, "races").is_empty());
        assert!(array_field(&body, "other").is_empty());
        assert!(array_field(&json!([1, 2]), "meets").is_empty());
    }

    #[test]
    fn test_extract_meets() {
        let records = vec![
            json!({"meet_id": "1", "track_name": "Saratoga", "country": "USA", "date": "2024-05-04"}),
            json!({"meet_id": 2, "track_name": "Woodbine"}),
            json!({"track_name": "No Id Downs", "country": "USA"}),
            json!("garbage"),
        ];
        let meets = extract_meets(&records, &Normalizer::default());

        assert_eq!(meets.len(), 2);
        assert_eq!(meets[0].label(), "Saratoga (USA)");
        assert_eq!(meets[0].date, "2024-05-04");
        assert_eq!(meets[1].meet_id, "2");
        assert_eq!(meets[1].label(), "Woodbine (N/A)");
        assert_eq!(meets[1].date, "N/A");
    }

    #[test]
    fn test_extract_races() {
        let records = vec![
            json!({
                "race_number": 1,
                "race_name": "Maiden Special Weight",
                "post_time": "13:10",
                "runners": [{"horse_name": "Alpha"}, {"horse_name": "Bravo"}]
            }),
            json!({"number": "2", "results": [{"horse": "Charlie", "position": 1}]}),
            json!({"race_number": 3}),
            json!(null),
        ];
        let races = extract_races(&records);

        assert_eq!(races.len(), 3);
        assert_eq!(races[0].race_number.as_deref(), Some("1"));
        assert_eq!(races[0].runners.len(), 2);
        assert_eq!(races[1].race_number.as_deref(), Some("2"));
        assert_eq!(races[1].race_name, None);
        assert_eq!(races[1].runners.len(), 1);
        assert!(races[2].runners.is_empty());
    }

    #[test]
    fn test_runners_not_an_array() {
        let races = extract_races(&[json!({"race_number": 1, "runners": "tbd"})]);
        assert!(races[0].runners.is_empty());
    }
}
