//! Terminal rendering: aligned tables, JSON and error reports.

use std::fmt::Display;

use chrono::NaiveDate;
use collmex::CollmexError;
use colored::Colorize;
use serde::Serialize;

/// Pretty JSON with non-ASCII characters kept as-is.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, std::io::Error> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Left-aligned table with a bold title and header line.
pub fn table(title: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = format!("{}\n", title.bold());
    let header = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(&format!("{}\n", header.trim_end().cyan()));
    let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&format!("{}\n", "-".repeat(rule).dimmed()));
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn pad(s: &str, width: usize) -> String {
    let n = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(n)))
}

pub fn cell<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn date(value: Option<NaiveDate>) -> String {
    cell(value)
}

/// First `max` characters of `s`.
pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

pub fn footer(text: &str) -> String {
    format!("\n{}", text.dimmed())
}

/// Kind, message and a hint where one helps.
pub fn print_error(err: &(dyn std::error::Error + 'static)) {
    let Some(e) = err.downcast_ref::<CollmexError>() else {
        eprintln!("{}: {err}", "Error".red());
        return;
    };
    eprintln!("{}: {e}", e.kind().red());
    match e {
        CollmexError::Authentication { .. } => {
            eprintln!("Check your COLLMEX_* environment variables");
        }
        CollmexError::Config(_) => {
            eprintln!("Ensure COLLMEX_CUSTOMER_ID, COLLMEX_USERNAME, COLLMEX_PASSWORD are set");
        }
        _ => {}
    }
}
