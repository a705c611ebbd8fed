use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use commands::{config, details, journal, search, stats, wishlist};
use nexus_models::MediaType;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "nexus")]
#[command(about = "Nexus - One journal for every film, series, book, game and album")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to this file instead of stderr (rotated daily)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every catalog at once
    #[command(long_about = "Search films and series (TMDB), books (Open Library), games (RAWG) and albums (MusicBrainz) in one go. Results are grouped by media type; a catalog that fails only empties its own group.")]
    Search {
        /// Free-text query
        query: String,

        /// Only show results of this type (movie, tv, book, game, music)
        #[arg(long = "type", value_name = "TYPE")]
        media_type: Option<MediaType>,

        /// Load up to this many pages per type
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },

    /// Show the full record of one catalog item
    Details {
        /// Media type (movie, tv, book, game, music)
        media_type: MediaType,

        /// Catalog id, as shown by `nexus search`
        id: String,
    },

    /// Log a film, series, book, game or album in the journal
    #[command(long_about = "Fetch the item from its catalog and record it in the journal. The journal keeps a snapshot of the record as it was when logged.")]
    Log {
        /// Media type (movie, tv, book, game, music)
        media_type: MediaType,

        /// Catalog id, as shown by `nexus search`
        id: String,

        #[command(flatten)]
        entry: EntryArgs,
    },

    /// Browse and edit the journal
    Journal {
        #[command(subcommand)]
        cmd: Option<JournalCommands>,
    },

    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        cmd: Option<WishlistCommands>,
    },

    /// Show your Cultural DNA, computed from the journal
    Stats {
        /// Locale for month labels (defaults to display.locale from the config)
        #[arg(long)]
        locale: Option<String>,
    },

    /// Configure API keys and settings
    #[command(long_about = "Manage configuration and credentials for Nexus. TMDB and RAWG need an API key; Open Library and MusicBrainz work without one. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

/// Fields of a new journal entry
#[derive(clap::Args, Debug, Clone)]
pub struct EntryArgs {
    /// Day the item was consumed (YYYY-MM-DD, defaults to today)
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Rating from 1 to 10
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    rating: Option<u8>,

    /// Free-text note
    #[arg(long)]
    note: Option<String>,

    /// Tag the entry (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Mark as a rewatch, reread, replay or relisten
    #[arg(long, action = ArgAction::SetTrue)]
    rewatch: bool,
}

#[derive(Subcommand)]
enum JournalCommands {
    /// List entries, most recently consumed first
    List {
        /// Only entries of this type
        #[arg(long = "type", value_name = "TYPE")]
        media_type: Option<MediaType>,

        /// Only entries with this tag
        #[arg(long)]
        tag: Option<String>,
    },

    /// Edit an entry; only the given fields change
    Edit {
        /// Entry id
        id: String,

        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,

        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10), conflicts_with = "clear_rating")]
        rating: Option<u8>,

        /// Remove the rating
        #[arg(long, action = ArgAction::SetTrue)]
        clear_rating: bool,

        #[arg(long)]
        note: Option<String>,

        /// Replace the tags (repeatable)
        #[arg(long = "tag", value_name = "TAG", conflicts_with = "clear_tags")]
        tags: Vec<String>,

        /// Remove every tag
        #[arg(long, action = ArgAction::SetTrue)]
        clear_tags: bool,

        #[arg(long)]
        rewatch: Option<bool>,
    },

    /// Delete an entry
    Delete {
        /// Entry id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },

    /// List every tag in use
    Tags,

    /// Write the journal to a JSON file
    Export {
        file: PathBuf,
    },

    /// Add entries from a JSON export; ids already present are skipped
    Import {
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum WishlistCommands {
    /// Add a catalog item
    Add {
        media_type: MediaType,
        id: String,

        /// Higher comes first in your own planning
        #[arg(long, default_value_t = 0)]
        priority: i32,
    },

    /// List items, most recently added first
    List {
        #[arg(long = "type", value_name = "TYPE")]
        media_type: Option<MediaType>,
    },

    /// Remove an item by wishlist id
    Remove {
        id: String,
    },

    /// Tell whether a catalog item is on the wishlist
    Check {
        media_type: MediaType,
        id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks API keys)
    Show {
        /// Show API keys unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Configure TMDB (films and series)
    #[command(long_about = "Store the TMDB API key. Create one at https://www.themoviedb.org/settings/api.")]
    Tmdb {
        /// TMDB API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,

        /// Language for titles and genres, e.g. fr-FR
        #[arg(long)]
        language: Option<String>,
    },

    /// Configure RAWG (games)
    #[command(long_about = "Store the RAWG API key. Create one at https://rawg.io/apidocs.")]
    Rawg {
        /// RAWG API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Configure display settings
    Display {
        /// Locale for dates and month labels, e.g. fr_FR or en_US
        #[arg(long)]
        locale: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging_with_file(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search { query, media_type, pages } => search::run_search(&query, media_type, pages, &output).await,
        Commands::Details { media_type, id } => details::run_details(media_type, &id, &output).await,
        Commands::Log { media_type, id, entry } => journal::run_log(media_type, &id, entry, &output).await,
        Commands::Journal { cmd } => {
            let cmd = cmd.unwrap_or(JournalCommands::List { media_type: None, tag: None });
            journal::run_journal(cmd, &output).await
        }
        Commands::Wishlist { cmd } => {
            let cmd = cmd.unwrap_or(WishlistCommands::List { media_type: None });
            wishlist::run_wishlist(cmd, &output).await
        }
        Commands::Stats { locale } => stats::run_stats(locale, &output).await,
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::parse_from(["nexus", "search", "dune", "--type", "book", "--pages", "3"]);
        match cli.command {
            Commands::Search { query, media_type, pages } => {
                assert_eq!(query, "dune");
                assert_eq!(media_type, Some(MediaType::Book));
                assert_eq!(pages, 3);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_log_entry() {
        let cli = Cli::parse_from([
            "nexus", "log", "movie", "550", "--date", "2024-01-05", "--rating", "9", "--tag", "cinéma", "--tag",
            "culte", "--rewatch",
        ]);
        match cli.command {
            Commands::Log { media_type, id, entry } => {
                assert_eq!(media_type, MediaType::Movie);
                assert_eq!(id, "550");
                assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 1, 5));
                assert_eq!(entry.rating, Some(9));
                assert_eq!(entry.tags, vec!["cinéma", "culte"]);
                assert!(entry.rewatch);
            }
            _ => panic!("expected log"),
        }
    }

    #[test]
    fn test_rejects_out_of_range_rating_and_unknown_type() {
        assert!(Cli::try_parse_from(["nexus", "log", "book", "OL1W", "--rating", "11"]).is_err());
        assert!(Cli::try_parse_from(["nexus", "details", "podcast", "1"]).is_err());
        assert!(Cli::try_parse_from(["nexus", "search", "dune", "--pages", "0"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["nexus", "stats", "--output", "json", "-vv"]);
        assert_eq!(cli.output, output::OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }
}
