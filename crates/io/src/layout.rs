//! Placement of a table's labels and values on the grid.
//!
//! A written table occupies a rectangle anchored at the caller's (row, col):
//!
//! ```text
//! [ header block: one row per column level ]
//! [ index-names row (multi-level header with named index only) ]
//! [ index columns | data ]
//! ```
//!
//! With a single header row the cells above the index columns hold the index
//! level names. With several header rows the first index column holds each
//! column level's name and the other index positions are blank.

use sheetframe_core::GridUpdate;
use sheetframe_engine::{Table, Value};

/// Row and column reservations for one write, computed once per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDirectives {
    /// Rows above the data holding column labels, one per column level
    pub header_rows: usize,
    /// Columns left of the data holding index labels, one per index level
    pub index_cols: usize,
    /// Extra row below the header block holding the index level names
    pub index_names_row: bool,
}

impl LayoutDirectives {
    pub fn for_table(table: &Table, include_index: bool, include_header: bool) -> Self {
        let header_rows = if include_header { table.columns().nlevels() } else { 0 };
        let index_cols = if include_index { table.index().nlevels() } else { 0 };
        let index_names_row =
            include_header && include_index && table.columns().is_multi() && table.index().has_names();
        Self { header_rows, index_cols, index_names_row }
    }

    /// Grid rows above the first data row.
    pub fn data_row_offset(&self) -> usize {
        self.header_rows + usize::from(self.index_names_row)
    }

    /// Rows the written block spans.
    pub fn total_rows(&self, table: &Table) -> usize {
        self.data_row_offset() + table.nrows()
    }

    /// Columns the written block spans.
    pub fn total_cols(&self, table: &Table) -> usize {
        self.index_cols + table.ncols()
    }
}

/// Every cell write for `table` anchored at (`anchor_row`, `anchor_col`),
/// with values rendered by `repr`.
///
/// Exactly one update per position of the block, in row-major order.
pub fn plan_updates(
    table: &Table,
    layout: &LayoutDirectives,
    anchor_row: usize,
    anchor_col: usize,
    repr: impl Fn(&Value) -> String,
) -> Vec<GridUpdate> {
    let total_cols = layout.total_cols(table);
    if total_cols == 0 {
        return Vec::new();
    }

    let mut updates = Vec::with_capacity(layout.total_rows(table) * total_cols);
    let index_names = table.index().names();
    let column_names = table.columns().names();
    let data_col = anchor_col + layout.index_cols;

    // Header block
    for level in 0..layout.header_rows {
        let row = anchor_row + level;
        for k in 0..layout.index_cols {
            let label = if layout.header_rows == 1 {
                name_value(&index_names[k])
            } else if k == 0 {
                name_value(&column_names[level])
            } else {
                Value::Null
            };
            updates.push(GridUpdate::new(row, anchor_col + k, repr(&label)));
        }
        for j in 0..table.ncols() {
            let label = table.columns().component(j, level);
            updates.push(GridUpdate::new(row, data_col + j, repr(&label)));
        }
    }

    if layout.index_names_row {
        let row = anchor_row + layout.header_rows;
        for k in 0..layout.index_cols {
            updates.push(GridUpdate::new(row, anchor_col + k, repr(&name_value(&index_names[k]))));
        }
        for j in 0..table.ncols() {
            updates.push(GridUpdate::new(row, data_col + j, String::new()));
        }
    }

    // Index labels and data
    let first_data_row = anchor_row + layout.data_row_offset();
    for r in 0..table.nrows() {
        let row = first_data_row + r;
        for k in 0..layout.index_cols {
            updates.push(GridUpdate::new(row, anchor_col + k, repr(&table.index().component(r, k))));
        }
        for j in 0..table.ncols() {
            updates.push(GridUpdate::new(row, data_col + j, repr(table.value(r, j))));
        }
    }

    updates
}

fn name_value(name: &Option<String>) -> Value {
    name.as_deref().map_or(Value::Null, Value::from)
}
