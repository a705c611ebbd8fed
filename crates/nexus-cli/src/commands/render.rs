//! Tables and small formatters shared by the human output of every command.

use crate::output::new_table;
use chrono::{Locale, NaiveDate};
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use nexus_models::{JournalEntry, NormalizedMedia, WishlistItem};
use serde_json::Value;

const TITLE_WIDTH: usize = 48;

pub fn format_rating(rating: Option<u8>) -> String {
    rating.map(|r| format!("{}/10", r)).unwrap_or_else(|| "-".to_string())
}

/// Day, abbreviated month and year in `locale`, e.g. "5 janv. 2024"
pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    date.format_localized("%-d %b %Y", locale).to_string()
}

pub fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Horizontal bar proportional to `count / max`, at most `width` blocks
pub fn bar(count: usize, max: usize, width: usize) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    let len = ((count * width) as f64 / max as f64).round().max(1.0) as usize;
    "█".repeat(len.min(width))
}

/// Display text for a metadata value; `None` for null and blank values
pub fn metadata_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(metadata_value).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Bool(b) => Some(if *b { "yes" } else { "no" }.to_string()),
        other => Some(other.to_string()),
    }
}

/// "releaseDate" -> "Release date"
pub fn metadata_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            label.push(' ');
            label.extend(c.to_lowercase());
        } else if c == '_' {
            label.push(' ');
        } else {
            label.push(c);
        }
    }
    label
}

/// One row per search result
pub fn media_table(results: &[NormalizedMedia]) -> Table {
    let mut table = new_table(&["ID", "Title", "Year", "Genres"]);
    for media in results {
        table.add_row(vec![
            Cell::new(&media.external_id).fg(Color::DarkGrey),
            Cell::new(truncate(&media.title, TITLE_WIDTH)),
            Cell::new(media.year.as_deref().unwrap_or("-")),
            Cell::new(truncate(&join_or_dash(&media.genres), 40)),
        ]);
    }
    table
}

/// Every known field of one record, metadata included
pub fn media_details_table(media: &NormalizedMedia) -> Table {
    let mut table = new_table(&["Field", "Value"]);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![Cell::new("Title"), Cell::new(&media.title)]);
    table.add_row(vec![Cell::new("Type"), Cell::new(media.media_type.label())]);
    table.add_row(vec![Cell::new("ID"), Cell::new(&media.external_id)]);
    table.add_row(vec![Cell::new("Year"), Cell::new(media.year.as_deref().unwrap_or("-"))]);
    table.add_row(vec![Cell::new("Genres"), Cell::new(join_or_dash(&media.genres))]);
    if let Some(poster) = &media.poster_url {
        table.add_row(vec![Cell::new("Poster"), Cell::new(poster)]);
    }
    for (key, value) in &media.metadata {
        if let Some(text) = metadata_value(value) {
            table.add_row(vec![Cell::new(metadata_label(key)), Cell::new(text)]);
        }
    }
    table
}

pub fn journal_table(entries: &[JournalEntry], locale: Locale) -> Table {
    let mut table = new_table(&["ID", "Date", "Type", "Title", "Rating", "Tags"]);
    for entry in entries {
        let mut title = truncate(&entry.media.title, TITLE_WIDTH);
        if entry.is_rewatch {
            title.push_str(" ↻");
        }
        table.add_row(vec![
            Cell::new(&entry.id).fg(Color::DarkGrey),
            Cell::new(format_date(entry.consumed_at, locale)),
            Cell::new(entry.media.media_type.label()),
            Cell::new(title),
            Cell::new(format_rating(entry.rating)).set_alignment(CellAlignment::Right),
            Cell::new(join_or_dash(&entry.tags)),
        ]);
    }
    table
}

pub fn wishlist_table(items: &[WishlistItem], locale: Locale) -> Table {
    let mut table = new_table(&["ID", "Type", "Title", "Year", "Priority", "Added"]);
    for item in items {
        table.add_row(vec![
            Cell::new(&item.id).fg(Color::DarkGrey),
            Cell::new(item.media.media_type.label()),
            Cell::new(truncate(&item.media.title, TITLE_WIDTH)),
            Cell::new(item.media.year.as_deref().unwrap_or("-")),
            Cell::new(item.priority).set_alignment(CellAlignment::Right),
            Cell::new(format_date(item.added_at.date_naive(), locale)),
        ]);
    }
    table
}
