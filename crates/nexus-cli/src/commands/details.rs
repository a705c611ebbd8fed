use super::context::AppContext;
use super::render::media_details_table;
use super::ui::Spinner;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use nexus_core::Aggregator;
use nexus_models::{MediaType, NormalizedMedia};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Full record for one catalog item, with a spinner while the catalog answers
pub async fn fetch_media(aggregator: &Aggregator, media_type: MediaType, id: &str, output: &Output) -> Result<NormalizedMedia> {
    let spinner = Spinner::start(format!("Fetching {} {}...", media_type, id.trim()), output);
    let result = aggregator.get_media_details(media_type, id).await;
    spinner.finish();

    result.map_err(|e| {
        if e.is_not_found() {
            eyre!("No {} with id '{}' ({})", media_type, id.trim(), e)
        } else {
            eyre!("Could not fetch {} '{}': {}", media_type, id.trim(), e)
        }
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailsReport {
    media: NormalizedMedia,
    in_wishlist: bool,
    journal_entries: usize,
}

pub async fn run_details(media_type: MediaType, id: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let media = fetch_media(&ctx.aggregator(), media_type, id, output).await?;

    let journal = ctx.journal()?;
    let journal_entries = journal
        .entries()
        .iter()
        .filter(|e| e.media.is_same_item(&media.external_id, media.media_type))
        .count();
    let in_wishlist = ctx.wishlist()?.is_in_wishlist(&media.external_id, media.media_type);

    let report = DetailsReport {
        media,
        in_wishlist,
        journal_entries,
    };
    output.data(&report);

    if output.shows_human() {
        output.table(&media_details_table(&report.media));
        if report.journal_entries > 0 {
            output.println(format!(
                "{} {} {} time(s)",
                "●".green(),
                report.media.media_type.verb(),
                report.journal_entries
            ));
        }
        if report.in_wishlist {
            output.println(format!("{} On your wishlist", "★".yellow()));
        }
    }
    Ok(())
}
