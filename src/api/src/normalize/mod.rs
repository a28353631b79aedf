//! Normalization of upstream runner/result records into display tables.
//!
//! Upstream records disagree on shape: a jockey may be a plain string or an
//! object with `alias`/`last_name`, odds may be flat or nested, and so on.
//! Each output column carries an ordered list of key paths; the first path
//! that reaches a non-empty scalar wins.

mod records;

pub use records::{array_field, extract_meets, extract_races};

use serde::Serialize;
use serde_json::Value;

/// Key path into a JSON record, e.g. `["jockey", "alias"]`
type Path = &'static [&'static str];

/// Output column of a runner table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Position,
    Number,
    Horse,
    Jockey,
    Trainer,
    Odds,
    PostPosition,
    Weight,
}

const POSITION_RULES: &[Path] = &[&["finish_position"], &["position"], &["place"]];
const NUMBER_RULES: &[Path] = &[
    &["program_number"],
    &["number"],
    &["runner_number"],
    &["saddle_cloth"],
];
const HORSE_RULES: &[Path] = &[&["horse_name"], &["horse", "name"], &["horse"], &["name"]];
const JOCKEY_RULES: &[Path] = &[
    &["jockey", "alias"],
    &["jockey", "last_name"],
    &["jockey", "name"],
    &["jockey"],
    &["jockey_name"],
];
const TRAINER_RULES: &[Path] = &[
    &["trainer", "alias"],
    &["trainer", "last_name"],
    &["trainer", "name"],
    &["trainer"],
    &["trainer_name"],
];
const ODDS_RULES: &[Path] = &[
    &["odds", "decimal"],
    &["odds", "morning_line"],
    &["morning_line_odds"],
    &["odds"],
    &["live_odds"],
];
const POST_POSITION_RULES: &[Path] = &[&["post_position"], &["draw"]];
const WEIGHT_RULES: &[Path] = &[&["weight", "lbs"], &["weight_lbs"], &["weight"]];

impl Column {
    /// Table header
    pub fn header(&self) -> &'static str {
        match self {
            Column::Position => "Pos",
            Column::Number => "#",
            Column::Horse => "Horse",
            Column::Jockey => "Jockey",
            Column::Trainer => "Trainer",
            Column::Odds => "Odds",
            Column::PostPosition => "PP",
            Column::Weight => "Wgt",
        }
    }

    /// Resolution paths in priority order
    pub fn rules(&self) -> &'static [Path] {
        match self {
            Column::Position => POSITION_RULES,
            Column::Number => NUMBER_RULES,
            Column::Horse => HORSE_RULES,
            Column::Jockey => JOCKEY_RULES,
            Column::Trainer => TRAINER_RULES,
            Column::Odds => ODDS_RULES,
            Column::PostPosition => POST_POSITION_RULES,
            Column::Weight => WEIGHT_RULES,
        }
    }
}

/// Which table is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Entries,
    Results,
}

impl TableKind {
    /// Candidate columns in display order
    pub fn columns(&self) -> &'static [Column] {
        match self {
            TableKind::Entries => &[
                Column::Number,
                Column::Horse,
                Column::Jockey,
                Column::Trainer,
                Column::Odds,
                Column::PostPosition,
                Column::Weight,
            ],
            TableKind::Results => &[
                Column::Position,
                Column::Number,
                Column::Horse,
                Column::Jockey,
                Column::Trainer,
                Column::Odds,
            ],
        }
    }

    /// Message shown instead of an empty table
    pub fn empty_message(&self) -> &'static str {
        match self {
            TableKind::Entries => "No runners available.",
            TableKind::Results => "No results available.",
        }
    }
}

/// Flat table ready for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
impl NormalizedTable {
    /// Cell value for a column in a row, if that column is shown
    pub fn cell(&self, row: usize, column: Column) -> Option<&str> {
        let idx = self.columns.iter().position(|c| *c == column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }
}

/// Follow a key path through nested objects. Non-object hops yield `None`.
fn lookup<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(record, |value, key| value.as_object()?.get(*key))
}

/// Render a scalar as text. Objects, arrays, null and blank strings don't count.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First path that resolves to a scalar
pub(crate) fn resolve_paths(record: &Value, paths: &[Path]) -> Option<String> {
    paths
        .iter()
        .find_map(|path| lookup(record, path).and_then(scalar_text))
}

/// Resolve one column of one record
pub fn resolve(record: &Value, column: Column) -> Option<String> {
    resolve_paths(record, column.rules())
}

/// Builds display tables from raw records
#[derive(Debug, Clone)]
pub struct Normalizer {
    sentinel: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new("N/A")
    }
}

impl Normalizer {
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Build a table from runner/result records.
    ///
    /// Records that are not objects or have no horse name are dropped.
    /// Columns with no value in any row are omitted; gaps in the remaining
    /// columns are filled with the sentinel. Upstream order is kept.
    pub fn table(&self, records: &[Value], kind: TableKind) -> NormalizedTable {
        let candidates = kind.columns();

        let resolved: Vec<Vec<Option<String>>> = records
            .iter()
            .filter(|record| record.is_object())
            .filter(|record| resolve(record, Column::Horse).is_some())
            .map(|record| candidates.iter().map(|c| resolve(record, *c)).collect())
            .collect();

        let shown: Vec<usize> = (0..candidates.len())
            .filter(|&i| resolved.iter().any(|row| row[i].is_some()))
            .collect();

        let rows = resolved
            .into_iter()
            .map(|row| {
                shown
                    .iter()
                    .map(|&i| row[i].clone().unwrap_or_else(|| self.sentinel.clone()))
                    .collect()
            })
            .collect();

        NormalizedTable {
            columns: shown.iter().map(|&i| candidates[i]).collect(),
            rows,
        }
    }
}
