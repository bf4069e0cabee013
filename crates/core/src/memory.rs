//! In-process worksheet.
//!
//! Behaves like the remote service where sheetframe depends on it: resize
//! requests apply rows before columns and are rejected when either step would
//! exceed the cell limit, omitted trailing cells come back as short rows, and
//! a leading apostrophe marks literal text. Every call is recorded so callers
//! can assert on request ordering.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::SheetError;
use crate::grid::{Dimensions, Grid, GridRange, GridUpdate};
use crate::worksheet::{ValueRenderMode, Worksheet};

/// Cell limit enforced by Google Sheets per spreadsheet.
pub const SHEETS_CELL_LIMIT: u64 = 10_000_000;

/// A request received by a [`MemoryWorksheet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetCall {
    Dimensions,
    Resize { rows: Option<usize>, cols: Option<usize> },
    Fetch { range: GridRange, mode: ValueRenderMode },
    Update { cells: usize },
}

#[derive(Debug, Clone, PartialEq)]
struct StoredCell {
    input: String,
    evaluated: Option<String>,
}

#[derive(Debug)]
pub struct MemoryWorksheet {
    title: String,
    dims: Dimensions,
    max_cell_count: u64,
    cells: BTreeMap<(usize, usize), StoredCell>,
    calls: RefCell<Vec<SheetCall>>,
}

impl MemoryWorksheet {
    pub fn new(title: &str, rows: usize, cols: usize) -> Self {
        Self {
            title: title.to_string(),
            dims: Dimensions::new(rows, cols),
            max_cell_count: SHEETS_CELL_LIMIT,
            cells: BTreeMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Build a sheet holding `rows` at A1, sized to the widest row.
    pub fn from_rows(title: &str, rows: &[Vec<&str>]) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut sheet = Self::new(title, rows.len(), width);
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.set_cell(r + 1, c + 1, value);
            }
        }
        sheet
    }

    pub fn with_max_cell_count(mut self, max_cell_count: u64) -> Self {
        self.max_cell_count = max_cell_count;
        self
    }

    /// Seed a cell without recording a call. Grows the sheet if needed.
    pub fn set_cell(&mut self, row: usize, col: usize, input: &str) {
        self.dims.rows = self.dims.rows.max(row);
        self.dims.cols = self.dims.cols.max(col);
        self.store(row, col, input);
    }

    /// Attach the evaluated result of a formula cell.
    pub fn set_evaluated(&mut self, row: usize, col: usize, value: &str) {
        if let Some(cell) = self.cells.get_mut(&(row, col)) {
            cell.evaluated = Some(value.to_string());
        }
    }

    /// Stored input of a cell, `None` when the cell is empty.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(&(row, col)).map(|c| c.input.as_str())
    }

    pub fn current_dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn calls(&self) -> Vec<SheetCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Only the resize requests, in order.
    pub fn resize_calls(&self) -> Vec<(Option<usize>, Option<usize>)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                SheetCall::Resize { rows, cols } => Some((*rows, *cols)),
                _ => None,
            })
            .collect()
    }

    /// Cell counts of each update request, in order.
    pub fn update_calls(&self) -> Vec<usize> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                SheetCall::Update { cells } => Some(*cells),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: SheetCall) {
        self.calls.borrow_mut().push(call);
    }

    fn store(&mut self, row: usize, col: usize, value: &str) {
        if value.is_empty() {
            self.cells.remove(&(row, col));
            return;
        }
        // A leading apostrophe is consumed by the service and marks the rest as text.
        let input = value.strip_prefix('\'').unwrap_or(value);
        self.cells.insert(
            (row, col),
            StoredCell { input: input.to_string(), evaluated: None },
        );
    }

    fn check_limit(&self, rows: usize, cols: usize) -> Result<(), SheetError> {
        let count = Dimensions::new(rows, cols).cell_count();
        if count > self.max_cell_count {
            return Err(SheetError::Validation(format!(
                "Invalid requests[0].updateSheetProperties: This action would increase the number of cells in the workbook above the limit of {} cells.",
                self.max_cell_count
            )));
        }
        Ok(())
    }
}

impl Worksheet for MemoryWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn dimensions(&self) -> Result<Dimensions, SheetError> {
        self.record(SheetCall::Dimensions);
        Ok(self.dims)
    }

    fn resize(&mut self, rows: Option<usize>, cols: Option<usize>) -> Result<(), SheetError> {
        self.record(SheetCall::Resize { rows, cols });

        if rows == Some(0) || cols == Some(0) {
            return Err(SheetError::Validation(
                "Invalid requests[0].updateSheetProperties: grid dimensions must be positive".into(),
            ));
        }

        let new_rows = rows.unwrap_or(self.dims.rows);
        let new_cols = cols.unwrap_or(self.dims.cols);

        // Row count is applied and checked before the column count.
        self.check_limit(new_rows, self.dims.cols)?;
        self.check_limit(new_rows, new_cols)?;

        self.dims = Dimensions::new(new_rows, new_cols);
        self.cells.retain(|&(r, c), _| r <= new_rows && c <= new_cols);
        Ok(())
    }

    fn fetch_grid(&self, range: &GridRange, mode: ValueRenderMode) -> Result<Grid, SheetError> {
        self.record(SheetCall::Fetch { range: *range, mode });

        let mut grid: Grid = Vec::new();
        for r in range.first_row..=range.last_row.min(self.dims.rows) {
            let mut row = Vec::new();
            for c in range.first_col..=range.last_col.min(self.dims.cols) {
                let text = match self.cells.get(&(r, c)) {
                    Some(cell) => match mode {
                        ValueRenderMode::Formula => cell.input.clone(),
                        ValueRenderMode::Unformatted => {
                            cell.evaluated.clone().unwrap_or_else(|| cell.input.clone())
                        }
                    },
                    None => String::new(),
                };
                row.push(text);
            }
            // Trailing empty cells are omitted, like the remote service does.
            while row.last().is_some_and(|v| v.is_empty()) {
                row.pop();
            }
            grid.push(row);
        }
        while grid.last().is_some_and(|r| r.is_empty()) {
            grid.pop();
        }
        Ok(grid)
    }

    fn update_cells(&mut self, updates: &[GridUpdate]) -> Result<(), SheetError> {
        self.record(SheetCall::Update { cells: updates.len() });

        if let Some(u) = updates.iter().find(|u| u.row > self.dims.rows || u.col > self.dims.cols) {
            return Err(SheetError::Validation(format!(
                "Range ('{}'!{}) exceeds grid limits. Max rows: {}, max columns: {}",
                self.title,
                u.a1(),
                self.dims.rows,
                self.dims.cols,
            )));
        }

        for u in updates {
            self.store(u.row, u.col, &u.value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_applies_rows_before_cols() {
        let mut sheet = MemoryWorksheet::new("t", 100, 26).with_max_cell_count(5_000_000);

        // 1,000,000 x 26 transiently exceeds the limit even though 1,000,000 x 2 fits.
        let err = sheet.resize(Some(1_000_000), Some(2)).unwrap_err();
        assert!(matches!(err, SheetError::Validation(_)));
        assert_eq!(sheet.current_dimensions(), Dimensions::new(100, 26));

        sheet.resize(None, Some(2)).unwrap();
        sheet.resize(Some(1_000_000), None).unwrap();
        assert_eq!(sheet.current_dimensions(), Dimensions::new(1_000_000, 2));
    }

    #[test]
    fn test_fetch_omits_trailing_empties() {
        let sheet = MemoryWorksheet::from_rows(
            "t",
            &[vec!["a", "", "c", ""], vec!["", "", "", ""], vec!["x", "", "", ""]],
        );
        let grid = sheet
            .fetch_grid(&GridRange::new(1, 1, 3, 4), ValueRenderMode::Formula)
            .unwrap();
        assert_eq!(grid, vec![vec!["a", "", "c"], vec![], vec!["x"]]);
    }

    #[test]
    fn test_update_strips_apostrophe_and_checks_bounds() {
        let mut sheet = MemoryWorksheet::new("t", 2, 2);
        sheet
            .update_cells(&[GridUpdate::new(1, 1, "'=A2"), GridUpdate::new(2, 2, "''x")])
            .unwrap();
        assert_eq!(sheet.cell(1, 1), Some("=A2"));
        assert_eq!(sheet.cell(2, 2), Some("'x"));

        let err = sheet.update_cells(&[GridUpdate::new(3, 1, "z")]).unwrap_err();
        assert!(err.to_string().contains("exceeds grid limits"));
        assert_eq!(sheet.update_calls(), vec![2, 1]);
    }

    #[test]
    fn test_evaluated_values() {
        let mut sheet = MemoryWorksheet::new("t", 1, 2);
        sheet.set_cell(1, 1, "1.113");
        sheet.set_cell(1, 2, "=A1*2");
        sheet.set_evaluated(1, 2, "2.226");

        let range = GridRange::new(1, 1, 1, 2);
        let formulas = sheet.fetch_grid(&range, ValueRenderMode::Formula).unwrap();
        let values = sheet.fetch_grid(&range, ValueRenderMode::Unformatted).unwrap();
        assert_eq!(formulas[0][1], "=A1*2");
        assert_eq!(values[0][1], "2.226");
    }
}
