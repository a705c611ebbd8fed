use super::context::AppContext;
use super::render::media_table;
use super::ui::Spinner;
use crate::output::{section_header, Output};
use color_eyre::Result;
use nexus_core::{Aggregator, SearchSession};
use nexus_models::{MediaType, NormalizedMedia};
use nexus_sources::SourceError;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BucketReport<'a> {
    results: &'a [NormalizedMedia],
    has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_results: Option<u64>,
    pages_loaded: u32,
}

#[derive(Debug, Serialize)]
struct FailureReport {
    kind: &'static str,
    message: String,
}

impl From<&SourceError> for FailureReport {
    fn from(error: &SourceError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchReport<'a> {
    query: &'a str,
    results: BTreeMap<MediaType, BucketReport<'a>>,
    failures: BTreeMap<MediaType, FailureReport>,
}

/// Types shown for a search: one when `--type` is given, else all of them
fn shown_types(only: Option<MediaType>) -> Vec<MediaType> {
    only.map(|t| vec![t]).unwrap_or_else(|| MediaType::ALL.to_vec())
}

/// Fan out `query`, then page each shown type up to `pages`.
///
/// Returns the errors of the follow-up pages; failures of the first page
/// are kept in the session.
async fn collect(
    aggregator: &Aggregator,
    session: &mut SearchSession,
    query: &str,
    types: &[MediaType],
    pages: u32,
    spinner: &Spinner,
) -> BTreeMap<MediaType, SourceError> {
    session.search(aggregator, query).await;

    let mut load_errors = BTreeMap::new();
    for &media_type in types {
        while session.page(media_type) < pages && session.has_more(media_type) {
            spinner.set_message(format!(
                "Loading page {} of {} results...",
                session.page(media_type) + 1,
                media_type
            ));
            if let Err(e) = session.load_next(aggregator, media_type).await {
                load_errors.insert(media_type, e);
                break;
            }
        }
    }
    load_errors
}

pub async fn run_search(query: &str, only: Option<MediaType>, pages: u32, output: &Output) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        output.warn("Empty query: nothing to search for");
        return Ok(());
    }

    let ctx = AppContext::load()?;
    let aggregator = ctx.aggregator();
    let types = shown_types(only);

    let mut session = SearchSession::new();
    let spinner = Spinner::start(format!("Searching every catalog for '{}'...", query), output);
    let load_errors = collect(&aggregator, &mut session, query, &types, pages, &spinner).await;
    spinner.finish();

    let mut failures: BTreeMap<MediaType, FailureReport> = BTreeMap::new();
    for &media_type in &types {
        if let Some(error) = session.failures().get(&media_type).or_else(|| load_errors.get(&media_type)) {
            failures.insert(media_type, error.into());
        }
    }

    let results = types
        .iter()
        .filter_map(|&media_type| {
            session.bucket(media_type).map(|bucket| {
                (
                    media_type,
                    BucketReport {
                        results: &bucket.results,
                        has_more: bucket.has_more,
                        total_results: bucket.total_results,
                        pages_loaded: session.page(media_type),
                    },
                )
            })
        })
        .collect();

    let report = SearchReport { query, results, failures };
    output.data(&report);
    if output.shows_human() {
        print_report(&report, output);
    }
    Ok(())
}

fn print_report(report: &SearchReport<'_>, output: &Output) {
    let total: usize = report.results.values().map(|b| b.results.len()).sum();
    output.println(format!(
        "{} result(s) for {}",
        total.to_string().bold(),
        format!("'{}'", report.query).bright_white()
    ));

    for (media_type, bucket) in &report.results {
        let heading = match bucket.total_results {
            Some(total) if total > 0 => format!("{} ({} of {})", media_type.label(), bucket.results.len(), total),
            _ => format!("{} ({})", media_type.label(), bucket.results.len()),
        };
        output.println(section_header(&heading));

        if let Some(failure) = report.failures.get(media_type) {
            output.warn(&failure.message);
        }
        if bucket.results.is_empty() {
            if !report.failures.contains_key(media_type) {
                output.println("No results".bright_black().to_string());
            }
            continue;
        }

        output.table(&media_table(bucket.results));
        if bucket.has_more {
            output.println(
                format!(
                    "More available: nexus search \"{}\" --type {} --pages {}",
                    report.query,
                    media_type,
                    bucket.pages_loaded + 1
                )
                .bright_black()
                .to_string(),
            );
        }
    }
}
