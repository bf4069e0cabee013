use std::fmt;

use sheetframe_core::SheetError;
use sheetframe_engine::TableError;

use crate::parser::DType;

/// Failure turning a grid of strings into a table.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A column selector or option names a column that is not present.
    UnknownColumn(String),
    /// A value does not convert to the type requested for its column.
    DtypeMismatch { column: String, value: String, dtype: DType },
    /// A header row lies past the end of the grid.
    HeaderOutOfRange { row: usize, rows: usize },
    /// An index or selected column lies past the grid width.
    ColumnOutOfRange { position: usize, width: usize },
    /// The parsed parts do not form a valid table.
    Table(TableError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColumn(name) => write!(f, "unknown column: {}", name),
            Self::DtypeMismatch { column, value, dtype } => {
                write!(f, "column {}: cannot convert {:?} to {}", column, value, dtype)
            }
            Self::HeaderOutOfRange { row, rows } => {
                write!(f, "header row {} out of range for a grid of {} row(s)", row, rows)
            }
            Self::ColumnOutOfRange { position, width } => {
                write!(f, "column {} out of range for a grid of {} column(s)", position, width)
            }
            Self::Table(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<TableError> for ParseError {
    fn from(e: TableError) -> Self {
        ParseError::Table(e)
    }
}

/// Error type for reading and writing tables.
#[derive(Debug)]
pub enum FrameError {
    /// Invalid option, raised before any remote call
    Config(String),
    /// Remote call failed
    Sheet(SheetError),
    /// An update chunk failed; chunks before it stay applied
    Batch { batch: usize, total: usize, source: SheetError },
    /// Grid could not be parsed into a table
    Parse(ParseError),
    /// Table shape violation
    Table(TableError),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Config(msg) => write!(f, "Configuration error: {}", msg),
            FrameError::Sheet(e) => write!(f, "{}", e),
            FrameError::Batch { batch, total, source } => {
                write!(f, "Update batch {} of {} failed: {}", batch, total, source)
            }
            FrameError::Parse(e) => write!(f, "Parse error: {}", e),
            FrameError::Table(e) => write!(f, "Table error: {}", e),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Config(_) => None,
            FrameError::Sheet(e) => Some(e),
            FrameError::Batch { source, .. } => Some(source),
            FrameError::Parse(e) => Some(e),
            FrameError::Table(e) => Some(e),
        }
    }
}

impl From<SheetError> for FrameError {
    fn from(e: SheetError) -> Self {
        FrameError::Sheet(e)
    }
}

impl From<ParseError> for FrameError {
    fn from(e: ParseError) -> Self {
        FrameError::Parse(e)
    }
}

impl From<TableError> for FrameError {
    fn from(e: TableError) -> Self {
        FrameError::Table(e)
    }
}
