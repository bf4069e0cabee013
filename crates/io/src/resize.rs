//! Growing a worksheet to hold a write.
//!
//! The service applies a new row count before a new column count within one
//! resize request and rejects the request if that intermediate size is over
//! the cell limit. Growing rows while shrinking columns can therefore fail
//! even when the final size fits; those resizes are split into a columns-only
//! request followed by a rows-only request.

use sheetframe_core::{Dimensions, SheetError, Worksheet};

/// One resize request. `None` leaves that dimension unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeStep {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
}

impl ResizeStep {
    /// Dimensions after this step is applied to `current`.
    pub fn apply(&self, current: Dimensions) -> Dimensions {
        Dimensions::new(self.rows.unwrap_or(current.rows), self.cols.unwrap_or(current.cols))
    }
}

/// True when applying `rows` against the current column count would pass
/// `max_cell_count` while `cols` shrinks the sheet.
pub fn cols_first_required(current: Dimensions, rows: usize, cols: usize, max_cell_count: u64) -> bool {
    cols < current.cols && rows as u64 * current.cols as u64 > max_cell_count
}

/// Resize requests needed so the sheet is at least `rows x cols`.
///
/// A dimension that already fits is kept as is. When both are requested and
/// the grown size would pass `max_cell_count`, the requested values are used
/// verbatim instead, which may shrink a dimension.
pub fn plan_resize(
    current: Dimensions,
    rows: Option<usize>,
    cols: Option<usize>,
    max_cell_count: u64,
) -> Vec<ResizeStep> {
    let mut desired_rows = rows.map(|r| r.max(current.rows));
    let mut desired_cols = cols.map(|c| c.max(current.cols));

    let mut cols_first = false;
    if let (Some(r), Some(c)) = (desired_rows, desired_cols) {
        if r as u64 * c as u64 > max_cell_count {
            desired_rows = rows;
            desired_cols = cols;
        }
        if let (Some(r), Some(c)) = (desired_rows, desired_cols) {
            cols_first = cols_first_required(current, r, c, max_cell_count);
        }
    }

    ordered_steps(current, desired_rows, desired_cols, cols_first)
}

/// Resize requests that set the sheet to exactly `rows x cols`, split
/// columns first when a single request would pass `max_cell_count`.
pub fn plan_exact_resize(current: Dimensions, rows: usize, cols: usize, max_cell_count: u64) -> Vec<ResizeStep> {
    let cols_first = cols_first_required(current, rows, cols, max_cell_count);
    ordered_steps(current, Some(rows), Some(cols), cols_first)
}

fn ordered_steps(
    current: Dimensions,
    rows: Option<usize>,
    cols: Option<usize>,
    cols_first: bool,
) -> Vec<ResizeStep> {
    let rows_change = rows.filter(|&r| r != current.rows);
    let cols_change = cols.filter(|&c| c != current.cols);

    match (rows_change, cols_change) {
        (None, None) => Vec::new(),
        (rows, Some(cols)) if cols_first => {
            let mut steps = vec![ResizeStep { rows: None, cols: Some(cols) }];
            if rows.is_some() {
                steps.push(ResizeStep { rows, cols: None });
            }
            steps
        }
        (rows, cols) => vec![ResizeStep { rows, cols }],
    }
}

/// Grow `sheet` so it holds at least `rows x cols`, issuing the requests from
/// [`plan_resize`] in order. Returns the requests sent.
pub fn resize_to_minimum<W: Worksheet + ?Sized>(
    sheet: &mut W,
    rows: Option<usize>,
    cols: Option<usize>,
    max_cell_count: u64,
) -> Result<Vec<ResizeStep>, SheetError> {
    let current = sheet.dimensions()?;
    let steps = plan_resize(current, rows, cols, max_cell_count);
    send_steps(sheet, current, steps, max_cell_count)
}

/// Set `sheet` to exactly `rows x cols`, issuing the requests from
/// [`plan_exact_resize`] in order. Returns the requests sent.
pub fn resize_exact<W: Worksheet + ?Sized>(
    sheet: &mut W,
    rows: usize,
    cols: usize,
    max_cell_count: u64,
) -> Result<Vec<ResizeStep>, SheetError> {
    let current = sheet.dimensions()?;
    let steps = plan_exact_resize(current, rows, cols, max_cell_count);
    send_steps(sheet, current, steps, max_cell_count)
}

fn send_steps<W: Worksheet + ?Sized>(
    sheet: &mut W,
    current: Dimensions,
    steps: Vec<ResizeStep>,
    max_cell_count: u64,
) -> Result<Vec<ResizeStep>, SheetError> {
    if steps.len() > 1 {
        let target = steps.iter().fold(current, |dims, s| s.apply(dims));
        log::debug!(
            "Resizing columns before rows: {}x{} -> {}x{} would pass {} cells",
            current.rows,
            current.cols,
            target.rows,
            target.cols,
            max_cell_count
        );
    }
    for step in &steps {
        log::debug!("Resizing worksheet '{}': rows={:?} cols={:?}", sheet.title(), step.rows, step.cols);
        sheet.resize(step.rows, step.cols)?;
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sheetframe_core::MemoryWorksheet;

    const MAX: u64 = 5_000_000;

    fn step(rows: Option<usize>, cols: Option<usize>) -> ResizeStep {
        ResizeStep { rows, cols }
    }

    #[test]
    fn test_shrinking_cols_while_growing_rows_goes_cols_first() {
        let mut sheet = MemoryWorksheet::new("t", 100, 26).with_max_cell_count(MAX);

        let steps = resize_to_minimum(&mut sheet, Some(1_000_000), Some(2), MAX).unwrap();

        assert_eq!(steps, vec![step(None, Some(2)), step(Some(1_000_000), None)]);
        assert_eq!(sheet.resize_calls(), vec![(None, Some(2)), (Some(1_000_000), None)]);
        assert_eq!(sheet.current_dimensions(), Dimensions::new(1_000_000, 2));
    }

    #[test]
    fn test_no_resize_when_already_large_enough() {
        let mut sheet = MemoryWorksheet::new("t", 100, 26);
        let steps = resize_to_minimum(&mut sheet, Some(50), Some(26), MAX).unwrap();
        assert!(steps.is_empty());
        assert!(sheet.resize_calls().is_empty());

        assert!(plan_resize(Dimensions::new(10, 10), None, None, MAX).is_empty());
    }

    #[test]
    fn test_grows_only_the_dimension_that_changes() {
        let current = Dimensions::new(100, 26);
        assert_eq!(plan_resize(current, Some(200), Some(10), MAX), vec![step(Some(200), None)]);
        assert_eq!(plan_resize(current, Some(10), Some(30), MAX), vec![step(None, Some(30))]);
        assert_eq!(plan_resize(current, Some(200), Some(30), MAX), vec![step(Some(200), Some(30))]);
        assert_eq!(plan_resize(current, None, Some(30), MAX), vec![step(None, Some(30))]);
    }

    #[test]
    fn test_over_limit_falls_back_to_requested_values() {
        // Clamping cols up to 26 would need 26M cells; the request is used as is.
        let current = Dimensions::new(100, 26);
        let steps = plan_resize(current, Some(1_000_000), Some(2), MAX);
        assert_eq!(steps.len(), 2);
        assert_eq!(
            plan_resize(current, Some(1_000_000), Some(2), u64::MAX),
            vec![step(Some(1_000_000), None)]
        );
        assert_eq!(
            steps.iter().fold(current, |dims, s| s.apply(dims)),
            Dimensions::new(1_000_000, 2)
        );
    }

    #[test]
    fn test_single_request_rejected_by_row_first_protocol() {
        // The same resize sent as one request fails, which is why it is split.
        let mut sheet = MemoryWorksheet::new("t", 100, 26).with_max_cell_count(MAX);
        assert!(sheet.resize(Some(1_000_000), Some(2)).is_err());
        assert!(cols_first_required(Dimensions::new(100, 26), 1_000_000, 2, MAX));
        assert!(!cols_first_required(Dimensions::new(100, 26), 1_000, 2, MAX));
    }

    #[test]
    fn test_exact_resize_orders_and_skips_unchanged() {
        let current = Dimensions::new(100, 26);
        assert_eq!(
            plan_exact_resize(current, 1_000_000, 2, MAX),
            vec![step(None, Some(2)), step(Some(1_000_000), None)]
        );
        // Shrinking both fits in one request.
        assert_eq!(plan_exact_resize(current, 10, 2, MAX), vec![step(Some(10), Some(2))]);
        assert_eq!(plan_exact_resize(current, 100, 5, MAX), vec![step(None, Some(5))]);
        assert!(plan_exact_resize(current, 100, 26, MAX).is_empty());

        let mut sheet = MemoryWorksheet::new("t", 100, 26).with_max_cell_count(MAX);
        resize_exact(&mut sheet, 1_000_000, 2, MAX).unwrap();
        assert_eq!(sheet.resize_calls(), vec![(None, Some(2)), (Some(1_000_000), None)]);
        assert_eq!(sheet.current_dimensions(), Dimensions::new(1_000_000, 2));
    }

    proptest! {
        #[test]
        fn no_intermediate_size_exceeds_limit(
            cur_rows in 1usize..2_000,
            cur_cols in 1usize..200,
            rows in 1usize..5_000,
            cols in 1usize..200,
            max in 1u64..400_000,
        ) {
            let current = Dimensions::new(cur_rows, cur_cols);
            prop_assume!(current.cell_count() <= max);

            let steps = plan_resize(current, Some(rows), Some(cols), max);
            let final_dims = steps.iter().fold(current, |dims, s| s.apply(dims));
            prop_assume!(final_dims.cell_count() <= max);

            prop_assert!(steps.len() <= 2);
            let mut sheet = MemoryWorksheet::new("t", cur_rows, cur_cols).with_max_cell_count(max);
            resize_to_minimum(&mut sheet, Some(rows), Some(cols), max).unwrap();
            prop_assert_eq!(sheet.current_dimensions(), final_dims);
        }

        #[test]
        fn never_shrinks_when_grown_size_fits(
            cur_rows in 1usize..500,
            cur_cols in 1usize..50,
            rows in 1usize..500,
            cols in 1usize..50,
        ) {
            let current = Dimensions::new(cur_rows, cur_cols);
            let final_dims = plan_resize(current, Some(rows), Some(cols), u64::MAX)
                .iter()
                .fold(current, |dims, s| s.apply(dims));
            prop_assert_eq!(final_dims, Dimensions::new(rows.max(cur_rows), cols.max(cur_cols)));
        }
    }
}
