//! Post-parse cleanups for tables read from a full sheet grid.
//!
//! A sheet is read to its declared bounds, so trailing rows and columns
//! usually come back empty. Both cleanups rebuild multi-level labels from the
//! surviving entries so dropped label values do not linger in level metadata.

use std::sync::OnceLock;

use regex::Regex;
use sheetframe_engine::{Axis, Table, Value};

fn unnamed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^Unnamed:\s\d+(?:_level_\d+)?$").expect("unnamed-column pattern is valid")
    })
}

/// True for the placeholder labels the parser gives header cells left blank.
pub fn is_unnamed_label(label: &Value) -> bool {
    label.as_text().is_some_and(|s| unnamed_pattern().is_match(s))
}

fn is_unnamed_column(columns: &Axis, col: usize) -> bool {
    columns.tuple(col).iter().all(is_unnamed_label)
}

/// Drop rows in which every value is missing.
pub fn drop_empty_rows(table: &Table) -> Table {
    if table.ncols() == 0 {
        return table.clone();
    }
    let keep: Vec<usize> = (0..table.nrows()).filter(|&r| !table.is_row_null(r)).collect();
    if keep.len() == table.nrows() {
        return table.clone();
    }

    log::debug!("Dropping {} empty row(s)", table.nrows() - keep.len());
    let mut cleaned = table.take_rows(&keep);
    cleaned.rebuild_index();
    cleaned
}

/// Drop columns with a placeholder label whose values are all missing.
/// Named columns are kept even when empty.
pub fn drop_empty_columns(table: &Table) -> Table {
    let keep: Vec<usize> = (0..table.ncols())
        .filter(|&c| !(is_unnamed_column(table.columns(), c) && table.is_column_null(c)))
        .collect();
    if keep.len() == table.ncols() {
        return table.clone();
    }

    log::debug!("Dropping {} empty unnamed column(s)", table.ncols() - keep.len());
    let mut cleaned = table.take_columns(&keep);
    cleaned.rebuild_columns();
    cleaned
}
