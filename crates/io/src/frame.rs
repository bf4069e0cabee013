//! Public read and write entrypoints.

use sheetframe_config::Settings;
use sheetframe_core::{Worksheet, SHEETS_CELL_LIMIT};
use sheetframe_engine::Table;

use crate::batch::submit;
use crate::cellrepr::{cellrepr, StringEscaping};
use crate::cleanup::{drop_empty_columns, drop_empty_rows};
use crate::error::FrameError;
use crate::grid::read_grid;
use crate::layout::{plan_updates, LayoutDirectives};
use crate::parser::{GridParser, ParseOptions, TextParser};
use crate::resize::{resize_exact, resize_to_minimum};

/// Options for [`get_as_dataframe`].
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Read evaluated values instead of formula text
    pub evaluate_formulas: bool,
    /// Drop rows in which every value is missing
    pub drop_empty_rows: bool,
    /// Drop all-missing columns with placeholder labels
    pub drop_empty_columns: bool,
    pub parse: ParseOptions,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            evaluate_formulas: false,
            drop_empty_rows: true,
            drop_empty_columns: true,
            parse: ParseOptions::default(),
        }
    }
}

impl ReadOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            evaluate_formulas: settings.evaluate_formulas,
            drop_empty_rows: settings.drop_empty_rows,
            drop_empty_columns: settings.drop_empty_columns,
            parse: ParseOptions::default(),
        }
    }

    pub fn with_parse(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }
}

/// Options for [`set_with_dataframe`].
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// 1-based anchor row of the written block
    pub row: usize,
    /// 1-based anchor column of the written block
    pub col: usize,
    pub include_index: bool,
    pub include_column_header: bool,
    /// Set the sheet to exactly the written extent instead of only growing it
    pub resize: bool,
    /// Let text starting with `=` be entered as a formula
    pub allow_formulas: bool,
    pub string_escaping: StringEscaping,
    /// Cell limit of the spreadsheet, checked before growing it
    pub max_cell_count: u64,
    /// Largest number of cells per update request; `None` sends one request
    pub cell_updates_limit: Option<usize>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            row: 1,
            col: 1,
            include_index: false,
            include_column_header: true,
            resize: false,
            allow_formulas: true,
            string_escaping: StringEscaping::Default,
            max_cell_count: SHEETS_CELL_LIMIT,
            cell_updates_limit: None,
        }
    }
}

impl WriteOptions {
    pub fn from_settings(settings: &Settings) -> Result<Self, FrameError> {
        Ok(Self {
            string_escaping: settings.string_escaping.parse()?,
            max_cell_count: settings.max_cell_count,
            cell_updates_limit: settings.cell_updates_limit,
            ..Self::default()
        })
    }

    /// Set the escaping policy by name: `"default"`, `"off"` or `"full"`.
    pub fn with_string_escaping(mut self, mode: &str) -> Result<Self, FrameError> {
        self.string_escaping = mode.parse()?;
        Ok(self)
    }

    /// Escape string values for which `f` returns true.
    pub fn with_escaping_predicate(mut self, f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.string_escaping = StringEscaping::predicate(f);
        self
    }

    fn validate(&self) -> Result<(), FrameError> {
        if self.row == 0 || self.col == 0 {
            return Err(FrameError::Config(format!(
                "anchor must be 1-based, got row {} col {}",
                self.row, self.col
            )));
        }
        if self.cell_updates_limit == Some(0) {
            return Err(FrameError::Config("cell update batch size must be at least 1".into()));
        }
        Ok(())
    }
}

/// Outcome of [`set_with_dataframe`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Cell updates submitted
    pub cells: usize,
    /// Update requests sent
    pub batches: usize,
    /// Whether any resize request was sent
    pub resized: bool,
}

/// Read the whole worksheet into a table using the default [`TextParser`].
pub fn get_as_dataframe<W: Worksheet + ?Sized>(sheet: &W, options: &ReadOptions) -> Result<Table, FrameError> {
    get_as_dataframe_with(sheet, options, &TextParser)
}

/// Read the whole worksheet into a table using `parser`.
pub fn get_as_dataframe_with<W, P>(sheet: &W, options: &ReadOptions, parser: &P) -> Result<Table, FrameError>
where
    W: Worksheet + ?Sized,
    P: GridParser + ?Sized,
{
    let grid = read_grid(sheet, options.evaluate_formulas)?;
    let mut table = parser.parse(&grid, &options.parse)?;

    if options.drop_empty_rows {
        table = drop_empty_rows(&table);
    }
    if options.drop_empty_columns {
        table = drop_empty_columns(&table);
    }
    Ok(table)
}

/// Write `table` into the worksheet with its upper-left corner at
/// (`options.row`, `options.col`), growing the sheet as needed.
///
/// The table is only read. Writes are not transactional: if a later update
/// request fails, earlier ones stay applied.
pub fn set_with_dataframe<W: Worksheet + ?Sized>(
    sheet: &mut W,
    table: &Table,
    options: &WriteOptions,
) -> Result<WriteSummary, FrameError> {
    options.validate()?;

    let layout = LayoutDirectives::for_table(table, options.include_index, options.include_column_header);
    let updates = plan_updates(table, &layout, options.row, options.col, |value| {
        cellrepr(value, options.allow_formulas, &options.string_escaping)
    });

    if updates.is_empty() {
        log::debug!("No updates to perform on worksheet.");
        return Ok(WriteSummary::default());
    }

    let last_row = options.row + layout.total_rows(table) - 1;
    let last_col = options.col + layout.total_cols(table) - 1;

    let steps = if options.resize {
        log::debug!("Resizing worksheet '{}' to {}x{}", sheet.title(), last_row, last_col);
        resize_exact(sheet, last_row, last_col, options.max_cell_count)?
    } else {
        resize_to_minimum(sheet, Some(last_row), Some(last_col), options.max_cell_count)?
    };
    let resized = !steps.is_empty();

    let batches = submit(sheet, &updates, options.cell_updates_limit)?;
    Ok(WriteSummary { cells: updates.len(), batches, resized })
}
