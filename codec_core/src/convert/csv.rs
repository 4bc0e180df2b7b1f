//! Delimited text <-> JSON.
//!
//! The reader is a single pass over the characters driven by [`ScanState`];
//! the writer quotes only the fields that need it.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Result, ToolError};

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CsvOptions {
    pub delimiter: char,
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
        }
    }
}

impl CsvOptions {
    /// Builds options from the raw delimiter text typed on the page. Empty
    /// means `,`; anything longer than one character is rejected.
    pub fn new(delimiter: &str, has_header: bool) -> Result<Self> {
        let mut chars = delimiter.chars();
        let delimiter = match (chars.next(), chars.next()) {
            (None, _) => ',',
            (Some(ch), None) if ch != '"' && ch != '\n' && ch != '\r' => ch,
            _ => {
                return Err(ToolError::format(format!(
                    "delimiter must be a single character other than a quote or newline, got {delimiter:?}"
                )))
            }
        };
        Ok(Self {
            delimiter,
            has_header,
        })
    }
}

/// Rows of fields exactly as they appeared in the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CsvTable {
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Promotes the first row to field names. Short rows are padded with
    /// empty strings and fields past the last name are dropped. A repeated
    /// name keeps its first position and takes the value of its last column.
    pub fn into_records(self) -> Vec<Map<String, Value>> {
        let mut rows = self.rows.into_iter();
        let Some(headers) = rows.next() else {
            return Vec::new();
        };
        rows.map(|row| {
            let mut record = Map::new();
            for (idx, name) in headers.iter().enumerate() {
                let value = row.get(idx).cloned().unwrap_or_default();
                record.insert(name.clone(), Value::String(value));
            }
            record
        })
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside quotes.
    Unquoted,
    /// Inside a quoted section.
    Quoted,
    /// Saw `"` inside quotes; a second `"` is a literal quote, anything
    /// else closes the section.
    QuoteInQuoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Append,
    AppendQuote,
    Skip,
    EndField,
    EndRow,
}

impl ScanState {
    /// Returns the next state, the action for `ch`, and whether `ch` must be
    /// fed again in the next state.
    fn step(self, ch: char, delimiter: char) -> (ScanState, Action, bool) {
        match self {
            Self::Unquoted => match ch {
                '"' => (Self::Quoted, Action::Skip, false),
                '\n' => (Self::Unquoted, Action::EndRow, false),
                '\r' => (Self::Unquoted, Action::Skip, false),
                c if c == delimiter => (Self::Unquoted, Action::EndField, false),
                _ => (Self::Unquoted, Action::Append, false),
            },
            Self::Quoted => match ch {
                '"' => (Self::QuoteInQuoted, Action::Skip, false),
                _ => (Self::Quoted, Action::Append, false),
            },
            Self::QuoteInQuoted => match ch {
                '"' => (Self::Quoted, Action::AppendQuote, false),
                _ => (Self::Unquoted, Action::Skip, true),
            },
        }
    }
}

pub fn parse_csv(text: &str, options: &CsvOptions) -> CsvTable {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut state = ScanState::Unquoted;

    for ch in text.chars() {
        let mut again = true;
        while again {
            let (next, action, reprocess) = state.step(ch, options.delimiter);
            match action {
                Action::Append => field.push(ch),
                Action::AppendQuote => field.push('"'),
                Action::Skip => {}
                Action::EndField => row.push(std::mem::take(&mut field)),
                Action::EndRow => {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
            }
            state = next;
            again = reprocess;
        }
    }
    if state == ScanState::Quoted {
        tracing::debug!("unterminated quoted field, keeping text read so far");
    }
    // A final `""` leaves the scanner past a quote with an empty field.
    if !field.is_empty() || !row.is_empty() || state != ScanState::Unquoted {
        row.push(field);
        rows.push(row);
    }
    CsvTable { rows }
}

/// Parses CSV and renders it as pretty JSON: an array of objects when the
/// first row is a header, an array of string arrays otherwise.
pub fn csv_to_json(text: &str, options: &CsvOptions) -> Result<String> {
    let table = parse_csv(text, options);
    let value = if options.has_header {
        Value::Array(table.into_records().into_iter().map(Value::Object).collect())
    } else {
        Value::Array(
            table
                .rows
                .into_iter()
                .map(|row| Value::Array(row.into_iter().map(Value::String).collect()))
                .collect(),
        )
    };
    serde_json::to_string_pretty(&value).map_err(|err| ToolError::format(err.to_string()))
}

fn escape_field(field: &str, delimiter: char) -> String {
    let needs_quotes = field.contains(['"', '\n', '\r']) || field.contains(delimiter);
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Joins escaped fields. A row holding one empty field is written as `""`
/// so the reader does not mistake it for a blank line.
fn join_fields(fields: Vec<String>, delimiter: char) -> String {
    match fields.as_slice() {
        [only] if only.is_empty() => "\"\"".to_string(),
        _ => fields.join(&delimiter.to_string()),
    }
}

fn write_row<'a>(cells: impl Iterator<Item = Option<&'a Value>>, delimiter: char) -> String {
    join_fields(
        cells
            .map(|cell| escape_field(&cell_text(cell), delimiter))
            .collect(),
        delimiter,
    )
}

/// Serializes already-parsed rows. Objects become one line each, keyed by
/// the first object's fields when `has_header` is set; arrays are written
/// as-is.
pub fn serialize_csv(rows: &[Value], options: &CsvOptions) -> Result<String> {
    let Some(first) = rows.first() else {
        return Ok(String::new());
    };
    let delimiter = options.delimiter;
    let mut lines = Vec::with_capacity(rows.len() + 1);
    if let Value::Object(first) = first {
        let headers: Option<Vec<&String>> = options.has_header.then(|| first.keys().collect());
        if let Some(headers) = &headers {
            lines.push(join_fields(
                headers
                    .iter()
                    .map(|name| escape_field(name, delimiter))
                    .collect(),
                delimiter,
            ));
        }
        for (idx, row) in rows.iter().enumerate() {
            let obj = row
                .as_object()
                .ok_or_else(|| ToolError::format(format!("row {idx} is not an object")))?;
            let line = match &headers {
                Some(headers) => write_row(headers.iter().map(|key| obj.get(*key)), delimiter),
                None => write_row(obj.values().map(Some), delimiter),
            };
            lines.push(line);
        }
    } else {
        for (idx, row) in rows.iter().enumerate() {
            let cells = row
                .as_array()
                .ok_or_else(|| ToolError::format(format!("row {idx} is not an array")))?;
            lines.push(write_row(cells.iter().map(Some), delimiter));
        }
    }
    Ok(lines.join("\n"))
}

/// Parses a JSON array and serializes it with [`serialize_csv`].
pub fn json_to_csv(text: &str, options: &CsvOptions) -> Result<String> {
    let source = if text.trim().is_empty() { "[]" } else { text };
    let value: Value =
        serde_json::from_str(source).map_err(|err| ToolError::format(err.to_string()))?;
    match value {
        Value::Array(rows) => serialize_csv(&rows, options),
        other => Err(ToolError::format(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
