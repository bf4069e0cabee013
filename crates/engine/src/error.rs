use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// Column count differs between the header axis and the data.
    ColumnCountMismatch { labels: usize, columns: usize },
    /// A column's length differs from the row index length.
    ColumnLengthMismatch { column: usize, expected: usize, found: usize },
    /// A multi-level label has the wrong number of components.
    LevelCountMismatch { position: usize, expected: usize, found: usize },
    /// Level names list does not match the level count.
    NameCountMismatch { levels: usize, names: usize },
    /// Multi-level axis needs at least one level.
    NoLevels,
    /// No column carries the requested label.
    UnknownColumn(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnCountMismatch { labels, columns } => {
                write!(f, "{labels} column label(s) for {columns} data column(s)")
            }
            Self::ColumnLengthMismatch { column, expected, found } => {
                write!(f, "column {column} has {found} value(s), index has {expected}")
            }
            Self::LevelCountMismatch { position, expected, found } => {
                write!(f, "label {position} has {found} level(s), expected {expected}")
            }
            Self::NameCountMismatch { levels, names } => {
                write!(f, "{names} level name(s) for {levels} level(s)")
            }
            Self::NoLevels => write!(f, "multi-level labels need at least one level"),
            Self::UnknownColumn(name) => write!(f, "unknown column: {name}"),
        }
    }
}

impl std::error::Error for TableError {}
