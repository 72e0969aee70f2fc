//! CSV export of record lists.
//!
//! The first record fixes the column order. Cells are hardened against
//! spreadsheet formula injection, and the file starts with a UTF-8 byte order
//! mark so spreadsheet tools detect the encoding.

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_FILENAME: &str = "data.csv";
pub const CONTENT_TYPE: &str = "text/csv; charset=utf-8";

const BOM: &str = "\u{feff}";
const LINE_END: &str = "\r\n";
const FORMULA_PREFIXES: [char; 4] = ['=', '+', '-', '@'];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Record {0} is not a JSON object")]
    NotARecord(usize),

    #[error("Failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {}: {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),
}

/// Write `records` as CSV to `dir/filename` and return the path written.
///
/// Only the last component of `filename` is used; `None` means
/// [`DEFAULT_FILENAME`]. An empty `records` slice writes nothing and
/// returns `Ok(None)`.
pub fn export_csv<T: Serialize>(
    records: &[T],
    dir: &Path,
    filename: Option<&str>,
) -> Result<Option<PathBuf>, ExportError> {
    let Some(content) = render(records)? else {
        tracing::debug!("nothing to export");
        return Ok(None);
    };

    let name = filename
        .and_then(|name| Path::new(name).file_name())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILENAME));
    let path = dir.join(name);

    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io(dir.to_path_buf(), e))?;
    let mut bytes = Vec::with_capacity(BOM.len() + content.len());
    bytes.extend_from_slice(BOM.as_bytes());
    bytes.extend_from_slice(content.as_bytes());
    std::fs::write(&path, bytes).map_err(|e| ExportError::Io(path.clone(), e))?;

    tracing::info!(path = %path.display(), rows = records.len(), "exported csv");
    Ok(Some(path))
}

/// CSV text without the byte order mark. `None` for no records.
pub(crate) fn render<T: Serialize>(records: &[T]) -> Result<Option<String>, ExportError> {
    if records.is_empty() {
        return Ok(None);
    }

    let rows = records
        .iter()
        .enumerate()
        .map(|(index, record)| match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            _ => Err(ExportError::NotARecord(index)),
        })
        .collect::<Result<Vec<Map<String, Value>>, ExportError>>()?;

    let headers: Vec<&String> = rows[0].keys().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|header| escape_cell(header))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in &rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|header| escape_cell(&cell_text(row.get(header.as_str()))))
            .collect();
        lines.push(cells.join(","));
    }

    Ok(Some(lines.join(LINE_END)))
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn escape_cell(raw: &str) -> String {
    let mut text = raw.replace('"', "\"\"");
    if text.starts_with(FORMULA_PREFIXES) {
        text.insert(0, '\'');
    }
    if text.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", text)
    } else {
        text
    }
}
