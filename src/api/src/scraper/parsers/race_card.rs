//! Racecard parser for racingpost.com.

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};

use super::meeting::text_of;
use crate::types::ScrapedRunner;

/// Parser for racecard pages
pub struct RaceCardParser;

impl RaceCardParser {
    /// Parse runner rows in card order
    pub fn parse(html: &str) -> Result<Vec<ScrapedRunner>> {
        let document = Html::parse_document(html);

        let row_selector = Self::selector(".racecard-number__row")?;
        let name = Self::selector(".racecard-horse-name")?;
        let odds = Self::selector(".racecard-price")?;
        let jockey = Self::selector(".racecard-jockey")?;
        let trainer = Self::selector(".racecard-trainer")?;

        let runners = document
            .select(&row_selector)
            .map(|row| ScrapedRunner {
                name: Self::field(&row, &name).unwrap_or_else(|| "Unknown".to_string()),
                odds: Self::field(&row, &odds).unwrap_or_else(|| "N/A".to_string()),
                jockey: Self::field(&row, &jockey).unwrap_or_default(),
                trainer: Self::field(&row, &trainer).unwrap_or_default(),
            })
            .collect();

        Ok(runners)
    }

    fn field(row: &ElementRef, selector: &Selector) -> Option<String> {
        row.select(selector).next().map(|elem| text_of(&elem))
    }

    fn selector(css: &str) -> Result<Selector> {
        Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid selector {}: {}", css, e))
    }
}
