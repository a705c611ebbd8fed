use super::context::AppContext;
use super::render::{bar, format_rating, journal_table};
use crate::output::{new_table, section_header, Output};
use chrono::Locale;
use color_eyre::Result;
use comfy_table::{Cell, CellAlignment, Color};
use nexus_core::compute_stats_with_locale;
use nexus_models::{CulturalDnaStats, MediaType};
use owo_colors::OwoColorize;

const BAR_WIDTH: usize = 24;

pub async fn run_stats(locale: Option<String>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let locale = ctx.locale(locale.as_deref())?;
    let journal = ctx.journal()?;

    let stats = compute_stats_with_locale(journal.entries(), locale);
    output.data(&stats);

    if output.shows_human() {
        if stats.total_entries == 0 {
            output.info("Your journal is empty: log something with 'nexus log' to grow your Cultural DNA");
        } else {
            print_stats(&stats, locale, output);
        }
    }
    Ok(())
}

fn print_stats(stats: &CulturalDnaStats, locale: Locale, output: &Output) {
    output.println(section_header("Cultural DNA"));
    let mut overview = new_table(&["Entries", "Average rating", "Favorite type", "Most active month"]);
    overview.add_row(vec![
        Cell::new(stats.total_entries),
        Cell::new(if stats.average_rating > 0.0 {
            format!("{:.1}/10", stats.average_rating)
        } else {
            "-".to_string()
        }),
        Cell::new(stats.favorite_type.map(|t| t.label()).unwrap_or("-")),
        Cell::new(stats.most_active_month.as_deref().unwrap_or("-")),
    ]);
    output.table(&overview);

    output.println(section_header("By type"));
    let max = stats.media_breakdown.values().copied().max().unwrap_or(0);
    let mut breakdown = new_table(&["Type", "Entries", ""]);
    for media_type in MediaType::ALL {
        let count = stats.count_for(media_type);
        breakdown.add_row(vec![
            Cell::new(media_type.label()),
            Cell::new(count).set_alignment(CellAlignment::Right),
            Cell::new(bar(count, max, BAR_WIDTH)).fg(Color::Green),
        ]);
    }
    output.table(&breakdown);

    if !stats.top_genres.is_empty() {
        output.println(section_header("Top genres"));
        let max = stats.top_genres.first().map(|g| g.count).unwrap_or(0);
        let mut genres = new_table(&["Genre", "Entries", ""]);
        for genre in &stats.top_genres {
            genres.add_row(vec![
                Cell::new(&genre.genre),
                Cell::new(genre.count).set_alignment(CellAlignment::Right),
                Cell::new(bar(genre.count, max, BAR_WIDTH)).fg(Color::Magenta),
            ]);
        }
        output.table(&genres);
    }

    output.println(section_header("Activity"));
    let max = stats.entries_by_month.iter().map(|m| m.count).max().unwrap_or(0);
    let mut months = new_table(&["Month", "Entries", ""]);
    for month in &stats.entries_by_month {
        months.add_row(vec![
            Cell::new(&month.month),
            Cell::new(month.count).set_alignment(CellAlignment::Right),
            Cell::new(bar(month.count, max, BAR_WIDTH)).fg(Color::Cyan),
        ]);
    }
    output.table(&months);

    if !stats.rating_distribution.is_empty() {
        output.println(section_header("Ratings"));
        let max = stats.rating_distribution.values().copied().max().unwrap_or(0);
        let mut ratings = new_table(&["Rating", "Entries", ""]);
        for (rating, count) in stats.rating_distribution.iter().rev() {
            ratings.add_row(vec![
                Cell::new(format_rating(Some(*rating))),
                Cell::new(count).set_alignment(CellAlignment::Right),
                Cell::new(bar(*count, max, BAR_WIDTH)).fg(Color::Yellow),
            ]);
        }
        output.table(&ratings);
    }

    if !stats.top_entries.is_empty() {
        output.println(section_header("Highest rated"));
        output.table(&journal_table(&stats.top_entries, locale));
    }

    output.println(
        format!("Computed from {} journal entries", stats.total_entries)
            .bright_black()
            .to_string(),
    );
}
