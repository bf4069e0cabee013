//! The service operations sheetframe consumes from a remote worksheet.
//!
//! Implementations are blocking: each call returns only once the service has
//! answered. Callers sharing a sheet across threads or processes serialize
//! their own access.

use crate::error::SheetError;
use crate::grid::{Dimensions, Grid, GridRange, GridUpdate};

/// Which representation of a cell the service should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueRenderMode {
    /// Formula text for formula cells, entered value otherwise
    #[default]
    Formula,
    /// Value after formula evaluation, without number formatting
    Unformatted,
}

impl ValueRenderMode {
    pub fn from_evaluate(evaluate_formulas: bool) -> Self {
        if evaluate_formulas {
            ValueRenderMode::Unformatted
        } else {
            ValueRenderMode::Formula
        }
    }

    /// Wire name used by the Sheets values API.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            ValueRenderMode::Formula => "FORMULA",
            ValueRenderMode::Unformatted => "UNFORMATTED_VALUE",
        }
    }
}

pub trait Worksheet {
    /// Worksheet title (tab name).
    fn title(&self) -> &str;

    /// Current row and column count.
    fn dimensions(&self) -> Result<Dimensions, SheetError>;

    /// Set the row count, the column count, or both in one request.
    ///
    /// The service applies a new row count before a new column count and
    /// rejects the whole request if the intermediate size exceeds its cell
    /// limit.
    fn resize(&mut self, rows: Option<usize>, cols: Option<usize>) -> Result<(), SheetError>;

    /// Fetch the cells of `range`.
    ///
    /// The service may omit trailing empty rows and trailing empty cells of a
    /// row, so the result can be ragged and shorter than the range.
    fn fetch_grid(&self, range: &GridRange, mode: ValueRenderMode) -> Result<Grid, SheetError>;

    /// Submit a list of cell writes as one request.
    fn update_cells(&mut self, updates: &[GridUpdate]) -> Result<(), SheetError>;
}

impl<W: Worksheet + ?Sized> Worksheet for &mut W {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn dimensions(&self) -> Result<Dimensions, SheetError> {
        (**self).dimensions()
    }

    fn resize(&mut self, rows: Option<usize>, cols: Option<usize>) -> Result<(), SheetError> {
        (**self).resize(rows, cols)
    }

    fn fetch_grid(&self, range: &GridRange, mode: ValueRenderMode) -> Result<Grid, SheetError> {
        (**self).fetch_grid(range, mode)
    }

    fn update_cells(&mut self, updates: &[GridUpdate]) -> Result<(), SheetError> {
        (**self).update_cells(updates)
    }
}
