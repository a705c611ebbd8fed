//! "Cultural DNA": statistics derived from the journal on every request.

use anyhow::{anyhow, Result};
use chrono::{Datelike, Locale, NaiveDate, NaiveTime, TimeZone, Utc};
use nexus_models::{CulturalDnaStats, GenreCount, JournalEntry, MediaType, MonthCount};
use std::collections::{BTreeMap, HashMap};

pub const TOP_GENRES: usize = 8;
pub const RECENT_MONTHS: usize = 12;
pub const TOP_ENTRIES: usize = 10;

pub const DEFAULT_LOCALE: Locale = Locale::fr_FR;

/// Parse a POSIX-style locale name ("fr_FR", "en_US")
pub fn parse_locale(name: &str) -> Result<Locale> {
    Locale::try_from(name.trim()).map_err(|_| anyhow!("Unknown locale: {}", name))
}

/// Abbreviated month and year in `locale`, e.g. "janv. 2024" for fr_FR
pub fn month_label(date: NaiveDate, locale: Locale) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .format_localized("%b %Y", locale)
        .to_string()
}

pub fn compute_stats(entries: &[JournalEntry]) -> CulturalDnaStats {
    compute_stats_with_locale(entries, DEFAULT_LOCALE)
}

/// Derive every statistic from `entries`. Empty input gives zeroed stats.
pub fn compute_stats_with_locale(entries: &[JournalEntry], locale: Locale) -> CulturalDnaStats {
    if entries.is_empty() {
        return CulturalDnaStats::empty();
    }

    let media_breakdown = media_breakdown(entries);
    let months = month_groups(entries);

    CulturalDnaStats {
        total_entries: entries.len(),
        average_rating: average_rating(entries),
        favorite_type: favorite_type(&media_breakdown),
        media_breakdown,
        top_genres: top_genres(entries),
        entries_by_month: months
            .iter()
            .skip(months.len().saturating_sub(RECENT_MONTHS))
            .map(|(date, count)| MonthCount {
                month: month_label(*date, locale),
                count: *count,
            })
            .collect(),
        most_active_month: most_active_month(&months).map(|date| month_label(date, locale)),
        rating_distribution: rating_distribution(entries),
        top_entries: top_entries(entries),
    }
}

/// Count per type, every type present
fn media_breakdown(entries: &[JournalEntry]) -> BTreeMap<MediaType, usize> {
    let mut breakdown: BTreeMap<MediaType, usize> = MediaType::ALL.into_iter().map(|t| (t, 0)).collect();
    for entry in entries {
        *breakdown.entry(entry.media.media_type).or_insert(0) += 1;
    }
    breakdown
}

/// Most logged type; on a tie the earlier type in canonical order wins
fn favorite_type(breakdown: &BTreeMap<MediaType, usize>) -> Option<MediaType> {
    let mut best: Option<(MediaType, usize)> = None;
    for media_type in MediaType::ALL {
        let count = breakdown.get(&media_type).copied().unwrap_or(0);
        if count > 0 && best.map_or(true, |(_, max)| count > max) {
            best = Some((media_type, count));
        }
    }
    best.map(|(media_type, _)| media_type)
}

/// Mean of the rated entries to one decimal, 0 when nothing is rated
fn average_rating(entries: &[JournalEntry]) -> f64 {
    let ratings: Vec<f64> = entries.iter().filter_map(|e| e.rating).map(f64::from).collect();
    if ratings.is_empty() {
        return 0.0;
    }
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Genre frequencies, highest first; equal counts keep first-seen order
fn top_genres(entries: &[JournalEntry]) -> Vec<GenreCount> {
    let mut counts: Vec<GenreCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for genre in entries.iter().flat_map(|e| e.media.genres.iter()) {
        match index.get(genre.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(genre.as_str(), counts.len());
                counts.push(GenreCount {
                    genre: genre.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_GENRES);
    counts
}

/// Entry count per calendar month, keyed by the first day of the month
fn month_groups(entries: &[JournalEntry]) -> BTreeMap<NaiveDate, usize> {
    let mut months = BTreeMap::new();
    for entry in entries {
        let date = entry.consumed_at;
        let first_of_month = date.with_day(1).unwrap_or(date);
        *months.entry(first_of_month).or_insert(0) += 1;
    }
    months
}

/// Busiest month across all groups; on a tie the earliest month wins
fn most_active_month(months: &BTreeMap<NaiveDate, usize>) -> Option<NaiveDate> {
    let mut best: Option<(NaiveDate, usize)> = None;
    for (date, count) in months {
        if best.map_or(true, |(_, max)| *count > max) {
            best = Some((*date, *count));
        }
    }
    best.map(|(date, _)| date)
}

fn rating_distribution(entries: &[JournalEntry]) -> BTreeMap<u8, usize> {
    let mut distribution = BTreeMap::new();
    for rating in entries.iter().filter_map(|e| e.rating) {
        *distribution.entry(rating).or_insert(0) += 1;
    }
    distribution
}

/// Highest rated entries; equal ratings keep input order
fn top_entries(entries: &[JournalEntry]) -> Vec<JournalEntry> {
    let mut rated: Vec<&JournalEntry> = entries.iter().filter(|e| e.rating.is_some()).collect();
    rated.sort_by(|a, b| b.rating.cmp(&a.rating));
    rated.into_iter().take(TOP_ENTRIES).cloned().collect()
}
