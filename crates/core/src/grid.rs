use serde::{Deserialize, Serialize};

/// Rectangular grid of cell strings, row-major.
pub type Grid = Vec<Vec<String>>;

/// A single cell write: 1-based row and column plus the text to enter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridUpdate {
    pub row: usize,
    pub col: usize,
    pub value: String,
}

impl GridUpdate {
    pub fn new(row: usize, col: usize, value: impl Into<String>) -> Self {
        debug_assert!(row >= 1 && col >= 1, "grid coordinates are 1-based");
        Self { row, col, value: value.into() }
    }

    /// A1-style reference for this cell (e.g. `C7`).
    pub fn a1(&self) -> String {
        format!("{}{}", col_to_letters(self.col), self.row)
    }
}

/// Sheet size in rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total cell count, widened so large sheets cannot overflow.
    pub fn cell_count(&self) -> u64 {
        self.rows as u64 * self.cols as u64
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Range covering every cell of a sheet with these dimensions.
    pub fn full_range(&self) -> Option<GridRange> {
        if self.is_empty() {
            return None;
        }
        Some(GridRange::new(1, 1, self.rows, self.cols))
    }
}

/// Inclusive 1-based rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRange {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

impl GridRange {
    pub fn new(first_row: usize, first_col: usize, last_row: usize, last_col: usize) -> Self {
        debug_assert!(first_row >= 1 && first_col >= 1);
        debug_assert!(first_row <= last_row && first_col <= last_col);
        Self { first_row, first_col, last_row, last_col }
    }

    /// Smallest range containing every update, or `None` for an empty slice.
    pub fn bounding(updates: &[GridUpdate]) -> Option<Self> {
        let first = updates.first()?;
        let mut range = GridRange::new(first.row, first.col, first.row, first.col);
        for u in &updates[1..] {
            range.first_row = range.first_row.min(u.row);
            range.first_col = range.first_col.min(u.col);
            range.last_row = range.last_row.max(u.row);
            range.last_col = range.last_col.max(u.col);
        }
        Some(range)
    }

    pub fn rows(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    pub fn cols(&self) -> usize {
        self.last_col - self.first_col + 1
    }

    /// A1 notation without a sheet prefix, e.g. `A1:K10`.
    pub fn to_a1(&self) -> String {
        format!(
            "{}{}:{}{}",
            col_to_letters(self.first_col),
            self.first_row,
            col_to_letters(self.last_col),
            self.last_row,
        )
    }

    /// A1 notation qualified with a quoted sheet title, e.g. `'Data 1'!A1:K10`.
    pub fn to_sheet_a1(&self, title: &str) -> String {
        format!("'{}'!{}", title.replace('\'', "''"), self.to_a1())
    }
}

/// Convert a 1-based column number to its letter form: 1=A, 26=Z, 27=AA.
pub fn col_to_letters(col: usize) -> String {
    debug_assert!(col >= 1);
    let mut result = String::new();
    let mut n = col.saturating_sub(1);
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_letters() {
        assert_eq!(col_to_letters(1), "A");
        assert_eq!(col_to_letters(2), "B");
        assert_eq!(col_to_letters(26), "Z");
        assert_eq!(col_to_letters(27), "AA");
        assert_eq!(col_to_letters(52), "AZ");
        assert_eq!(col_to_letters(53), "BA");
        assert_eq!(col_to_letters(702), "ZZ");
        assert_eq!(col_to_letters(703), "AAA");
    }

    #[test]
    fn test_update_a1() {
        assert_eq!(GridUpdate::new(7, 3, "x").a1(), "C7");
    }

    #[test]
    fn test_range_a1_with_quoted_title() {
        let range = GridRange::new(1, 1, 10, 11);
        assert_eq!(range.to_a1(), "A1:K10");
        assert_eq!(range.to_sheet_a1("Bob's data"), "'Bob''s data'!A1:K10");
    }

    #[test]
    fn test_bounding_range() {
        let updates = vec![
            GridUpdate::new(3, 2, "a"),
            GridUpdate::new(1, 5, "b"),
            GridUpdate::new(4, 1, "c"),
        ];
        let range = GridRange::bounding(&updates).unwrap();
        assert_eq!(range, GridRange::new(1, 1, 4, 5));
        assert_eq!(range.rows(), 4);
        assert_eq!(range.cols(), 5);
        assert!(GridRange::bounding(&[]).is_none());
    }

    #[test]
    fn test_cell_count_does_not_overflow() {
        let dims = Dimensions::new(1_000_000, 26);
        assert_eq!(dims.cell_count(), 26_000_000);
        assert!(Dimensions::new(0, 5).full_range().is_none());
        assert_eq!(Dimensions::new(2, 3).full_range(), Some(GridRange::new(1, 1, 2, 3)));
    }
}
