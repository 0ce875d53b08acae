//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one value per line.

use std::io::{self, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render rows that are both `Tabled` and `Serialize`.
///
/// `plain` calls `id_fn` on each row to emit one value per line.
pub fn render_list<R>(
    format: &OutputFormat,
    rows: &[R],
    id_fn: impl Fn(&R) -> String,
) -> Result<String, CliError>
where
    R: Tabled + Serialize,
{
    Ok(match format {
        OutputFormat::Table => Table::new(rows).with(Style::rounded()).to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(rows)?,
        OutputFormat::JsonCompact => serde_json::to_string(rows)?,
        OutputFormat::Yaml => serde_yaml::to_string(rows)?,
        OutputFormat::Plain => rows.iter().map(id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single item. Table output uses `detail_fn`, a pre-formatted
/// key/value block.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// `-` for absent values in table cells.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Tabled, Serialize)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Value")]
        value: f64,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: "40004".into(),
                value: 7.5,
            },
            Row {
                id: "40008".into(),
                value: 31.0,
            },
        ]
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let out = render_list(&OutputFormat::Plain, &rows(), |r| r.id.clone()).unwrap();
        assert_eq!(out, "40004\n40008");
    }

    #[test]
    fn json_keeps_field_names() {
        let out = render_list(&OutputFormat::JsonCompact, &rows(), |r| r.id.clone()).unwrap();
        assert_eq!(out, r#"[{"id":"40004","value":7.5},{"id":"40008","value":31.0}]"#);
    }

    #[test]
    fn table_uses_column_headers() {
        let out = render_list(&OutputFormat::Table, &rows(), |r| r.id.clone()).unwrap();
        assert!(out.contains("ID"));
        assert!(out.contains("Value"));
        assert!(out.contains("31"));
    }

    #[test]
    fn or_dash_fills_gaps() {
        assert_eq!(or_dash(None::<f64>), "-");
        assert_eq!(or_dash(Some(2)), "2");
    }
}
