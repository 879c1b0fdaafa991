//! Output formatting: table, JSON, YAML.
//!
//! `--output` is a free-form string so an unknown value is reported as an
//! error rather than a clap usage failure. Table rendering is always
//! command-specific; structured formats serialize the data as-is.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::ColorMode;
use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// `""` selects the table, `json` and `yaml` the structured encodings.
    pub fn from_flag(flag: &str) -> Result<Self, CliError> {
        match flag {
            "" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            other => Err(CliError::UnknownFormat {
                format: other.into(),
            }),
        }
    }
}

// ── Color helpers ────────────────────────────────────────────────────

pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Bold when color is on; plain otherwise.
pub fn emphasize(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_owned()
    }
}

/// Dimmed when color is on; plain otherwise.
pub fn hint(text: &str, color: bool) -> String {
    if color {
        text.dimmed().to_string()
    } else {
        text.to_owned()
    }
}

// ── Render dispatch ──────────────────────────────────────────────────

/// Render `data` as JSON/YAML, or hand it to `table_fn` for the table.
pub fn render<T>(
    format: OutputFormat,
    data: &T,
    table_fn: impl FnOnce(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(table_fn(data)),
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

/// Whitespace-aligned columns with an upper-case header row.
pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::blank()).to_string()
}

/// JSON with two-space indentation.
pub fn render_json_pretty<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(data).map_err(|e| CliError::Serialize {
        message: e.to_string(),
    })
}

pub fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Serialize {
        message: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: u32,
        name: &'static str,
    }

    #[test]
    fn parses_known_formats() {
        assert_eq!(OutputFormat::from_flag("").unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::from_flag("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flag("yaml").unwrap(), OutputFormat::Yaml);
    }

    #[test]
    fn unknown_format_is_an_error() {
        let err = OutputFormat::from_flag("xml").unwrap_err();
        assert_eq!(err.to_string(), "Unknown output format 'xml'");
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }

    #[test]
    fn json_uses_two_space_indent() {
        let out = render(OutputFormat::Json, &[Item { id: 1, name: "web" }], |_| {
            unreachable!()
        })
        .unwrap();
        assert_eq!(out, "[\n  {\n    \"id\": 1,\n    \"name\": \"web\"\n  }\n]");
    }

    #[test]
    fn yaml_output() {
        let out = render(OutputFormat::Yaml, &Item { id: 2, name: "api" }, |_| {
            unreachable!()
        })
        .unwrap();
        assert_eq!(out, "id: 2\nname: api\n");
    }

    #[test]
    fn table_delegates_to_closure() {
        let out = render(OutputFormat::Table, &Item { id: 3, name: "x" }, |i| {
            format!("{}={}", i.id, i.name)
        })
        .unwrap();
        assert_eq!(out, "3=x");
    }
}
