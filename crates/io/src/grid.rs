//! Full-sheet grid reads.

use sheetframe_core::{Grid, SheetError, ValueRenderMode, Worksheet};

/// Fetch every cell within the sheet's declared bounds.
///
/// The result is exactly `rows x cols`: cells and rows the service leaves out
/// come back as empty strings, and nothing beyond the bounds is kept.
pub fn read_grid<W: Worksheet + ?Sized>(sheet: &W, evaluate_formulas: bool) -> Result<Grid, SheetError> {
    let dims = sheet.dimensions()?;
    let Some(range) = dims.full_range() else {
        log::debug!("Worksheet '{}' has no cells", sheet.title());
        return Ok(Vec::new());
    };

    let mode = ValueRenderMode::from_evaluate(evaluate_formulas);
    let fetched = sheet.fetch_grid(&range, mode)?;
    log::debug!(
        "Fetched {} row(s) of {}x{} worksheet '{}'",
        fetched.len(),
        dims.rows,
        dims.cols,
        sheet.title()
    );

    Ok(rectangularize(fetched, dims.rows, dims.cols))
}

fn rectangularize(mut grid: Grid, rows: usize, cols: usize) -> Grid {
    grid.truncate(rows);
    grid.resize_with(rows, Vec::new);
    for row in &mut grid {
        row.truncate(cols);
        row.resize_with(cols, String::new);
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetframe_core::{MemoryWorksheet, SheetCall};

    #[test]
    fn test_fills_omitted_cells_to_declared_bounds() {
        let mut sheet = MemoryWorksheet::from_rows("t", &[vec!["a", "", "c"], vec!["", "", ""]]);
        sheet.resize(Some(4), Some(5)).unwrap();

        let grid = read_grid(&sheet, false).unwrap();
        assert_eq!(grid.len(), 4);
        assert!(grid.iter().all(|row| row.len() == 5));
        assert_eq!(grid[0], vec!["a", "", "c", "", ""]);
        assert!(grid[3].iter().all(String::is_empty));
    }

    #[test]
    fn test_render_mode_follows_evaluate_flag() {
        let mut sheet = MemoryWorksheet::from_rows("t", &[vec!["2", "=A1*2"]]);
        sheet.set_evaluated(1, 2, "4");

        assert_eq!(read_grid(&sheet, false).unwrap(), vec![vec!["2", "=A1*2"]]);
        assert_eq!(read_grid(&sheet, true).unwrap(), vec![vec!["2", "4"]]);
        assert!(sheet.calls().contains(&SheetCall::Fetch {
            range: sheetframe_core::GridRange::new(1, 1, 1, 2),
            mode: ValueRenderMode::Unformatted,
        }));
    }

    #[test]
    fn test_empty_sheet_is_empty_grid() {
        let sheet = MemoryWorksheet::new("t", 0, 0);
        assert!(read_grid(&sheet, false).unwrap().is_empty());
        assert_eq!(sheet.calls(), vec![SheetCall::Dimensions]);
    }

    #[test]
    fn test_rectangularize_truncates_overlong_rows() {
        let grid = vec![vec!["a".to_string(), "b".to_string(), "c".to_string()]];
        assert_eq!(rectangularize(grid, 2, 2), vec![vec!["a", "b"], vec!["", ""]]);
    }
}
