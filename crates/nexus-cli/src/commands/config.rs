use super::context::AppContext;
use super::prompts;
use super::ui::is_interactive;
use crate::output::{new_table, section_header, Output};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Cell;
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load()?;
    match cmd {
        ConfigCommands::Show { full } => show_config(&ctx, full, output),
        ConfigCommands::Tmdb { api_key, language } => configure_tmdb(&mut ctx, api_key, language, output),
        ConfigCommands::Rawg { api_key } => configure_rawg(&mut ctx, api_key, output),
        ConfigCommands::Display { locale } => configure_display(&mut ctx, &locale, output),
    }
}

fn enabled_mark(enabled: bool) -> String {
    if enabled {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

fn show_config(ctx: &AppContext, full: bool, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let tmdb_key = ctx.credentials.get_tmdb_api_key();
    let rawg_key = ctx.credentials.get_rawg_api_key();
    let key_display = |key: &Option<String>| match key {
        Some(key) if full => key.clone(),
        Some(key) => mask_string(key),
        None => "<not set>".to_string(),
    };

    output.data(&json!({
        "configFile": ctx.paths.config_file(),
        "dataDir": ctx.paths.data_dir(),
        "tmdb": {
            "enabled": config.tmdb.enabled,
            "language": config.tmdb.language,
            "apiKey": key_display(&tmdb_key),
            "baseUrl": config.tmdb.base_url,
        },
        "rawg": {
            "enabled": config.rawg.enabled,
            "apiKey": key_display(&rawg_key),
            "baseUrl": config.rawg.base_url,
        },
        "openLibrary": {
            "enabled": config.open_library.enabled,
            "baseUrl": config.open_library.base_url,
        },
        "musicbrainz": {
            "enabled": config.musicbrainz.enabled,
            "userAgent": config.musicbrainz.user_agent,
            "minIntervalMs": config.musicbrainz.min_interval_ms,
            "baseUrl": config.musicbrainz.base_url,
        },
        "http": { "timeoutSecs": config.http.timeout_secs },
        "display": { "locale": config.display.locale },
    }));

    if !output.shows_human() {
        return Ok(());
    }

    let config_file = ctx.paths.config_file();
    output.println(section_header("Configuration"));
    let mut files = new_table(&["File", "Path"]);
    files.add_row(vec![
        Cell::new("Config"),
        Cell::new(format!(
            "{}{}",
            config_file.display(),
            if config_file.exists() { "" } else { " (defaults, not written yet)" }
        )),
    ]);
    files.add_row(vec![Cell::new("Credentials"), Cell::new(ctx.paths.credentials_file().display())]);
    files.add_row(vec![Cell::new("Journal"), Cell::new(ctx.paths.journal_file().display())]);
    files.add_row(vec![Cell::new("Wishlist"), Cell::new(ctx.paths.wishlist_file().display())]);
    output.table(&files);

    let mut catalogs = new_table(&["Catalog", "Serves", "Enabled", "Settings"]);
    catalogs.add_row(vec![
        Cell::new("TMDB"),
        Cell::new("Films, series"),
        Cell::new(enabled_mark(config.tmdb.enabled)),
        Cell::new(format!("API key: {}\nLanguage: {}", key_display(&tmdb_key), config.tmdb.language)),
    ]);
    catalogs.add_row(vec![
        Cell::new("Open Library"),
        Cell::new("Books"),
        Cell::new(enabled_mark(config.open_library.enabled)),
        Cell::new("No API key needed"),
    ]);
    catalogs.add_row(vec![
        Cell::new("RAWG"),
        Cell::new("Games"),
        Cell::new(enabled_mark(config.rawg.enabled)),
        Cell::new(format!("API key: {}", key_display(&rawg_key))),
    ]);
    catalogs.add_row(vec![
        Cell::new("MusicBrainz"),
        Cell::new("Albums"),
        Cell::new(enabled_mark(config.musicbrainz.enabled)),
        Cell::new(format!(
            "User agent: {}\nMin interval: {} ms",
            config.musicbrainz.user_agent, config.musicbrainz.min_interval_ms
        )),
    ]);
    output.table(&catalogs);

    let mut general = new_table(&["Setting", "Value"]);
    general.add_row(vec![Cell::new("HTTP timeout"), Cell::new(format!("{} s", config.http.timeout_secs))]);
    general.add_row(vec![Cell::new("Display locale"), Cell::new(&config.display.locale)]);
    output.table(&general);

    if tmdb_key.is_none() && config.tmdb.enabled {
        output.warn("TMDB has no API key: film and series searches will fail. Run 'nexus config tmdb'.");
    }
    if rawg_key.is_none() && config.rawg.enabled {
        output.warn("RAWG has no API key: game searches will fail. Run 'nexus config rawg'.");
    }
    Ok(())
}

/// The key from the command line, or a masked prompt on a terminal
fn resolve_api_key(catalog: &str, from_args: Option<String>, replacing: bool) -> Result<String> {
    match from_args {
        Some(key) => {
            prompts::validate_api_key(&key).map_err(|e| eyre!("{}", e))?;
            Ok(key.trim().to_string())
        }
        None if is_interactive() => prompts::prompt_api_key(catalog, replacing),
        None => Err(eyre!("No terminal to prompt on; pass the key with --api-key")),
    }
}

fn configure_tmdb(ctx: &mut AppContext, api_key: Option<String>, language: Option<String>, output: &Output) -> Result<()> {
    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;

    // A language-only change keeps the stored key
    if api_key.is_some() || language.is_none() {
        let replacing = ctx.credentials.get_tmdb_api_key().is_some();
        let key = resolve_api_key("TMDB", api_key, replacing)?;
        ctx.credentials.set_tmdb_api_key(key);
        ctx.save_credentials()?;
    }

    if let Some(language) = language {
        let language = language.trim();
        if language.is_empty() {
            return Err(eyre!("Language cannot be empty"));
        }
        ctx.config.tmdb.language = language.to_string();
    }
    ctx.config.tmdb.enabled = true;
    ctx.save_config()?;

    output.success(format!("TMDB configured (language {})", ctx.config.tmdb.language));
    Ok(())
}

fn configure_rawg(ctx: &mut AppContext, api_key: Option<String>, output: &Output) -> Result<()> {
    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;

    let replacing = ctx.credentials.get_rawg_api_key().is_some();
    let key = resolve_api_key("RAWG", api_key, replacing)?;
    ctx.credentials.set_rawg_api_key(key);
    ctx.save_credentials()?;

    ctx.config.rawg.enabled = true;
    ctx.save_config()?;

    output.success("RAWG configured");
    Ok(())
}

fn configure_display(ctx: &mut AppContext, locale: &str, output: &Output) -> Result<()> {
    let locale = locale.trim();
    ctx.locale(Some(locale))?;

    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;
    ctx.config.display.locale = locale.to_string();
    ctx.save_config()?;

    output.success(format!("Display locale set to {}", locale));
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use nexus_config::PathManager;

    fn context(dir: &tempfile::TempDir) -> AppContext {
        AppContext::from_paths(PathManager::from_base(dir.path().to_path_buf())).unwrap()
    }

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abcd"), "****");
        assert_eq!(mask_string("8f2c1e0d9b"), "8f***9b");
    }

    #[test]
    fn test_configure_keys_with_flags() {
        let dir = tempfile::tempdir().unwrap();
        let output = Output::new(OutputFormat::Json, true);

        let mut ctx = context(&dir);
        configure_tmdb(&mut ctx, Some(" tmdb-key-123 ".to_string()), Some("en-US".to_string()), &output).unwrap();
        configure_rawg(&mut ctx, Some("rawg-key-456".to_string()), &output).unwrap();

        let reloaded = context(&dir);
        assert_eq!(reloaded.credentials.get("tmdb_api_key").map(String::as_str), Some("tmdb-key-123"));
        assert_eq!(reloaded.credentials.get("rawg_api_key").map(String::as_str), Some("rawg-key-456"));
        assert_eq!(reloaded.config.tmdb.language, "en-US");
        assert!(reloaded.config.rawg.enabled);
    }

    #[test]
    fn test_language_only_keeps_key() {
        let dir = tempfile::tempdir().unwrap();
        let output = Output::new(OutputFormat::Json, true);

        let mut ctx = context(&dir);
        configure_tmdb(&mut ctx, Some("tmdb-key-123".to_string()), None, &output).unwrap();
        configure_tmdb(&mut ctx, None, Some("de-DE".to_string()), &output).unwrap();

        let reloaded = context(&dir);
        assert_eq!(reloaded.credentials.get("tmdb_api_key").map(String::as_str), Some("tmdb-key-123"));
        assert_eq!(reloaded.config.tmdb.language, "de-DE");
    }

    #[test]
    fn test_display_locale_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        let output = Output::new(OutputFormat::Json, true);
        let mut ctx = context(&dir);

        assert!(configure_display(&mut ctx, "xx_YY", &output).is_err());
        configure_display(&mut ctx, " en_US ", &output).unwrap();
        assert_eq!(context(&dir).config.display.locale, "en_US");
    }
}
