use clap::ValueEnum;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Human mode and not quiet: tables and colors should be printed
    pub fn shows_human(&self) -> bool {
        self.format == OutputFormat::Human && !self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{} {}", "✓".green(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "success", "message": msg.as_ref() }));
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "error", "message": msg.as_ref() }));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "info", "message": msg.as_ref() }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{} {}", "⚠".yellow(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "warning", "message": msg.as_ref() }));
            }
        }
    }

    /// Plain line in human mode; nothing in JSON modes, where `data` carries the payload
    pub fn println(&self, msg: impl AsRef<str>) {
        if self.shows_human() {
            println!("{}", msg.as_ref());
        }
    }

    pub fn table(&self, table: &Table) {
        if self.shows_human() {
            println!("{}", table);
        }
    }

    /// Print a command's result document in JSON modes
    pub fn data<T: Serialize>(&self, value: &T) {
        if self.format == OutputFormat::Human {
            return;
        }

        match serde_json::to_value(value) {
            Ok(value) => self.print_json(&value),
            Err(e) => self.error(format!("Failed to serialize output: {}", e)),
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        println!("{}", render_json(self.format, data));
    }
}

fn render_json(format: OutputFormat, data: &serde_json::Value) -> String {
    match format {
        OutputFormat::JsonPretty => serde_json::to_string_pretty(data).unwrap_or_default(),
        OutputFormat::Json | OutputFormat::Human => serde_json::to_string(data).unwrap_or_default(),
    }
}

/// Table with the rounded UTF-8 look used by every listing
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

/// Section title in bold cyan, underlined
pub fn section_header(title: &str) -> String {
    format!(
        "\n{}\n{}",
        title.bold().bright_cyan(),
        "─".repeat(title.chars().count()).bright_cyan()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_compact_and_pretty() {
        let data = json!({ "type": "info", "message": "ok" });
        let compact = render_json(OutputFormat::Json, &data);
        assert!(!compact.contains('\n'));
        assert_eq!(serde_json::from_str::<serde_json::Value>(&compact).unwrap(), data);

        let pretty = render_json(OutputFormat::JsonPretty, &data);
        assert!(pretty.contains("\n  \"message\": \"ok\""));
    }

    #[test]
    fn test_shows_human() {
        assert!(Output::new(OutputFormat::Human, false).shows_human());
        assert!(!Output::new(OutputFormat::Human, true).shows_human());
        assert!(!Output::new(OutputFormat::Json, false).shows_human());
    }

    #[test]
    fn test_new_table_has_header() {
        let table = new_table(&["Titre", "Année"]);
        let rendered = table.to_string();
        assert!(rendered.contains("Titre"));
        assert!(rendered.contains("Année"));
    }
}
