//! HTML parsers for racingpost.com pages.

pub mod meeting;
pub mod race_card;

pub use meeting::MeetingParser;
pub use race_card::RaceCardParser;
