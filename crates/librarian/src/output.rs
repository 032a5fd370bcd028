//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table views are
//! hand-built details (with `tabled` for row data), structured formats use
//! serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single item. Table mode uses `detail_fn` since detail views
/// don't go through `Tabled`.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Plain => Ok(id_fn(data)),
        structured => render_structured(structured, data),
    }
}

/// Render an untyped `data` payload. Table mode falls back to pretty JSON.
pub fn render_value(format: &OutputFormat, data: &serde_json::Value) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Plain => Ok(match data {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }),
        structured => render_structured(structured, data),
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

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_structured<T: serde::Serialize + ?Sized>(
    format: &OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    match format {
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => {
            serde_yaml::to_string(data).map_err(|e| CliError::Internal(format!("YAML: {e}")))
        }
        _ => Ok(serde_json::to_string_pretty(data)?),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_value_prints_one_string_per_line() {
        let out = render_value(&OutputFormat::Plain, &json!(["a", "b", 3])).unwrap();
        assert_eq!(out, "a\nb\n3");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_value(&OutputFormat::JsonCompact, &json!({ "id": 1 })).unwrap();
        assert_eq!(out, r#"{"id":1}"#);
    }

    #[test]
    fn yaml_renders_mappings() {
        let out = render_value(&OutputFormat::Yaml, &json!({ "id": 1 })).unwrap();
        assert_eq!(out.trim(), "id: 1");
    }
}
