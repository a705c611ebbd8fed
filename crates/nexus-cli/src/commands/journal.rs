use super::context::AppContext;
use super::details::fetch_media;
use super::prompts;
use super::render::{format_date, format_rating, journal_table};
use super::ui::is_interactive;
use crate::output::Output;
use crate::{EntryArgs, JournalCommands};
use chrono::{Local, NaiveDate};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use nexus_core::JournalStore;
use nexus_models::{JournalEntry, JournalEntryDraft, JournalUpdate, MediaType};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

fn draft_from_args(entry: EntryArgs, today: NaiveDate) -> JournalEntryDraft {
    JournalEntryDraft {
        consumed_at: entry.date.unwrap_or(today),
        rating: entry.rating,
        note: entry.note.unwrap_or_default(),
        tags: entry.tags,
        is_rewatch: entry.rewatch,
    }
}

pub async fn run_log(media_type: MediaType, id: &str, entry: EntryArgs, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let locale = ctx.locale(None)?;
    let mut journal = ctx.journal()?;

    let media = fetch_media(&ctx.aggregator(), media_type, id, output).await?;
    let draft = draft_from_args(entry, Local::now().date_naive());
    let logged = journal.add(media, draft).map_err(|e| eyre!("Failed to log entry: {:#}", e))?;

    output.data(&logged);
    if output.shows_human() {
        output.success(format!(
            "{} : {} ({}, {})",
            logged.media.media_type.verb(),
            logged.media.title.bold(),
            format_date(logged.consumed_at, locale),
            format_rating(logged.rating)
        ));
        output.println(format!("Entry id: {}", logged.id).bright_black().to_string());

        let wished = ctx
            .wishlist()?
            .list()
            .into_iter()
            .find(|item| item.media.is_same_item(&logged.media.external_id, logged.media.media_type));
        if let Some(item) = wished {
            output.info(format!("Still on your wishlist. Remove it with: nexus wishlist remove {}", item.id));
        }
    }
    Ok(())
}

pub async fn run_journal(cmd: JournalCommands, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut journal = ctx.journal()?;

    match cmd {
        JournalCommands::List { media_type, tag } => {
            let entries = select_entries(&journal, media_type, tag.as_deref());
            output.data(&entries);
            if output.shows_human() {
                if entries.is_empty() {
                    output.info("No journal entries yet. Log one with: nexus log <type> <id>");
                } else {
                    output.table(&journal_table(&entries, ctx.locale(None)?));
                    output.println(format!("{} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" }));
                }
            }
            Ok(())
        }
        JournalCommands::Edit {
            id,
            date,
            rating,
            clear_rating,
            note,
            tags,
            clear_tags,
            rewatch,
        } => {
            let update = JournalUpdate {
                consumed_at: date,
                rating: if clear_rating { Some(None) } else { rating.map(Some) },
                note,
                tags: if clear_tags {
                    Some(Vec::new())
                } else if tags.is_empty() {
                    None
                } else {
                    Some(tags)
                },
                is_rewatch: rewatch,
            };
            edit_entry(&mut journal, &id, &update, output)
        }
        JournalCommands::Delete { id, yes } => delete_entry(&mut journal, &id, yes, output),
        JournalCommands::Tags => {
            let tags: Vec<(String, usize)> = journal
                .all_tags()
                .into_iter()
                .map(|tag| {
                    let count = journal.entries().iter().filter(|e| e.has_tag(&tag)).count();
                    (tag, count)
                })
                .collect();

            output.data(&tags.iter().map(|(tag, count)| json!({ "tag": tag, "count": count })).collect::<Vec<_>>());
            if output.shows_human() {
                if tags.is_empty() {
                    output.info("No tags in use");
                }
                for (tag, count) in &tags {
                    output.println(format!("  {} {}", tag.cyan(), format!("({})", count).bright_black()));
                }
            }
            Ok(())
        }
        JournalCommands::Export { file } => {
            let count = export_to(&journal, &file)?;
            output.success(format!("Exported {} entries to {}", count, file.display()));
            Ok(())
        }
        JournalCommands::Import { file } => {
            let (added, skipped) = import_from(&mut journal, &file)?;
            output.success(format!("Imported {} new entries from {} ({} already present)", added, file.display(), skipped));
            Ok(())
        }
    }
}

/// Most recent first, narrowed by type and tag when given
fn select_entries(journal: &JournalStore, media_type: Option<MediaType>, tag: Option<&str>) -> Vec<JournalEntry> {
    let mut entries = match media_type {
        Some(media_type) => journal.filter_by_type(media_type),
        None => journal.list(),
    };
    if let Some(tag) = tag {
        entries.retain(|e| e.has_tag(tag.trim()));
    }
    entries
}

fn edit_entry(journal: &mut JournalStore, id: &str, update: &JournalUpdate, output: &Output) -> Result<()> {
    if update.is_empty() {
        output.warn("Nothing to change: pass at least one of --date, --rating, --clear-rating, --note, --tag, --clear-tags, --rewatch");
        return Ok(());
    }

    let updated = journal
        .update(id, update)
        .map_err(|e| eyre!("Failed to update entry: {:#}", e))?
        .ok_or_else(|| eyre!("No journal entry with id {}", id))?;

    output.data(&updated);
    output.success(format!("Updated '{}'", updated.media.title));
    Ok(())
}

fn delete_entry(journal: &mut JournalStore, id: &str, yes: bool, output: &Output) -> Result<()> {
    let entry = journal
        .get_by_id(id)
        .cloned()
        .ok_or_else(|| eyre!("No journal entry with id {}", id))?;

    if !yes {
        if !is_interactive() {
            return Err(eyre!("Refusing to delete without confirmation; pass --yes"));
        }
        let prompt = format!("Delete '{}' logged on {}?", entry.media.title, entry.consumed_at);
        if !prompts::prompt_yes_no(&prompt, false)? {
            output.info("Nothing deleted");
            return Ok(());
        }
    }

    journal.delete(id).map_err(|e| eyre!("Failed to delete entry: {:#}", e))?;
    output.success(format!("Deleted '{}'", entry.media.title));
    Ok(())
}

fn export_to(journal: &JournalStore, file: &Path) -> Result<usize> {
    let json = journal.export_json().map_err(|e| eyre!("Failed to export journal: {:#}", e))?;
    std::fs::write(file, json).map_err(|e| eyre!("Failed to write {}: {}", file.display(), e))?;
    Ok(journal.len())
}

/// Returns `(added, skipped)`
fn import_from(journal: &mut JournalStore, file: &Path) -> Result<(usize, usize)> {
    let content =
        std::fs::read_to_string(file).map_err(|e| eyre!("Failed to read {}: {}", file.display(), e))?;
    let entries: Vec<JournalEntry> =
        serde_json::from_str(&content).map_err(|e| eyre!("{} is not a journal export: {}", file.display(), e))?;

    let total = entries.len();
    let added = journal
        .import(entries)
        .map_err(|e| eyre!("Failed to import {}: {:#}", file.display(), e))?;
    Ok((added, total - added))
}
