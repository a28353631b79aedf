//! Meeting page parser for racingpost.com.
//!
//! A meeting page lists the day's races for one course, each in a
//! `div.rc-meeting-info__race` block with a time and a link.

use anyhow::Result;
use regex::Regex;
use scraper::{Html, Selector};

use crate::scraper::BASE_URL;
use crate::types::ScrapedRace;

/// Parser for meeting pages
pub struct MeetingParser;

impl MeetingParser {
    /// Parse race links in page order. Blocks missing a time or link are skipped.
    pub fn parse(html: &str) -> Result<Vec<ScrapedRace>> {
        let document = Html::parse_document(html);

        let race_selector = Self::selector("div.rc-meeting-info__race")?;
        let time_selector = Self::selector(".rc-meeting-info__time")?;
        let link_selector = Self::selector("a.rc-meeting-info__link")?;
        // /racecards/{course}/{slug}/{date}/{race_id}
        let race_id_re = Regex::new(r"/racecards/\d+/[^/]+/\d{4}-\d{2}-\d{2}/(\d+)")?;

        let mut races = Vec::new();
        for block in document.select(&race_selector) {
            let (Some(time), Some(link)) = (
                block.select(&time_selector).next(),
                block.select(&link_selector).next(),
            ) else {
                continue;
            };

            let Some(href) = link.value().attr("href") else {
                continue;
            };

            races.push(ScrapedRace {
                race_id: race_id_re.captures(href).map(|caps| caps[1].to_string()),
                name: text_of(&link),
                time: text_of(&time),
                url: absolute_url(href),
            });
        }

        Ok(races)
    }

    fn selector(css: &str) -> Result<Selector> {
        Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid selector {}: {}", css, e))
    }
}

pub(crate) fn text_of(elem: &scraper::ElementRef) -> String {
    elem.text().collect::<String>().trim().to_string()
}

fn absolute_url(href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", BASE_URL, href)
    }
}
