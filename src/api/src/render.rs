//! Plain-text rendering for terminal output.

use crate::normalize::{NormalizedTable, TableKind};
use crate::types::{Meet, RacesResponse};

/// Render a table with aligned columns, or the "none available" message
pub fn format_table(table: &NormalizedTable, kind: TableKind) -> String {
    if table.is_empty() {
        return format!("  {}\n", kind.empty_message());
    }

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.header().chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let headers: Vec<&str> = table.columns.iter().map(|c| c.header()).collect();
    let mut out = format_row(&headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format_row(&rule, &widths));
    for row in &table.rows {
        out.push_str(&format_row(row, &widths));
    }
    out
}

fn format_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    format!("  {}\n", line.trim_end())
}

/// Numbered meet list
pub fn format_meets(meets: &[Meet], date: &str) -> String {
    if meets.is_empty() {
        return format!("No meets found for {}.\n", date);
    }

    let mut out = format!("=== Meets for {} ===\n", date);
    for (i, meet) in meets.iter().enumerate() {
        out.push_str(&format!("  {:2}. {}  [{}]\n", i + 1, meet.label(), meet.meet_id));
    }
    out
}

/// Every race of a meet, heading then table
pub fn format_races(response: &RacesResponse, kind: TableKind) -> String {
    if response.races.is_empty() {
        return format!("No races available for meet {}.\n", response.meet_id);
    }

    let mut out = String::new();
    for race in &response.races {
        out.push_str(&heading(&race.title));
        out.push_str(&format_table(&race.table, kind));
        out.push('\n');
    }
    out
}

/// Section heading
pub fn heading(title: &str) -> String {
    format!("=== {} ===\n", title)
}

/// Print a fetch problem to stderr
pub fn warn_user(message: &str) {
    eprintln!("Warning: {}", message);
}
