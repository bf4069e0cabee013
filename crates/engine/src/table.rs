use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::TableError;
use crate::value::Value;

/// Column-oriented table with a row index and a column header.
///
/// Invariants, checked on construction: the header has one entry per data
/// column, and every column has one value per index entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    index: Axis,
    columns: Axis,
    /// `data[col][row]`
    data: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(index: Axis, columns: Axis, data: Vec<Vec<Value>>) -> Result<Self, TableError> {
        if columns.len() != data.len() {
            return Err(TableError::ColumnCountMismatch { labels: columns.len(), columns: data.len() });
        }
        for (column, values) in data.iter().enumerate() {
            if values.len() != index.len() {
                return Err(TableError::ColumnLengthMismatch {
                    column,
                    expected: index.len(),
                    found: values.len(),
                });
            }
        }
        Ok(Self { index, columns, data })
    }

    /// Table with a positional row index and flat column labels.
    pub fn from_columns<L: Into<Value>>(columns: Vec<(L, Vec<Value>)>) -> Result<Self, TableError> {
        let nrows = columns.first().map_or(0, |(_, values)| values.len());
        let (labels, data): (Vec<Value>, Vec<Vec<Value>>) =
            columns.into_iter().map(|(label, values)| (label.into(), values)).unzip();
        Self::new(Axis::range(nrows), Axis::Flat { labels, name: None }, data)
    }

    /// Table from row-major values with flat column labels.
    pub fn from_rows<L: Into<Value>>(labels: Vec<L>, rows: Vec<Vec<Value>>) -> Result<Self, TableError> {
        let labels: Vec<Value> = labels.into_iter().map(Into::into).collect();
        let mut data: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); labels.len()];
        let nrows = rows.len();
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != labels.len() {
                return Err(TableError::LevelCountMismatch { position: r, expected: labels.len(), found: row.len() });
            }
            for (c, value) in row.into_iter().enumerate() {
                data[c].push(value);
            }
        }
        Self::new(Axis::range(nrows), Axis::Flat { labels, name: None }, data)
    }

    pub fn empty() -> Self {
        Self {
            index: Axis::range(0),
            columns: Axis::Flat { labels: Vec::new(), name: None },
            data: Vec::new(),
        }
    }

    pub fn with_index(self, index: Axis) -> Result<Self, TableError> {
        Self::new(index, self.columns, self.data)
    }

    pub fn with_columns(self, columns: Axis) -> Result<Self, TableError> {
        Self::new(self.index, columns, self.data)
    }

    /// Move the column labelled `label` into the row index.
    pub fn set_index(self, label: &Value) -> Result<Self, TableError> {
        let position = self
            .columns
            .position(label)
            .ok_or_else(|| TableError::UnknownColumn(label.to_string()))?;

        let keep: Vec<usize> = (0..self.ncols()).filter(|&c| c != position).collect();
        let columns = self.columns.take(&keep);
        let mut data = self.data;
        let labels = data.remove(position);
        let index = Axis::Flat { labels, name: Some(label.to_string()) };
        Self::new(index, columns, data)
    }

    pub fn nrows(&self) -> usize {
        self.index.len()
    }

    pub fn ncols(&self) -> usize {
        self.data.len()
    }

    /// (rows, columns), not counting labels.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    pub fn is_empty(&self) -> bool {
        self.nrows() == 0 || self.ncols() == 0
    }

    pub fn index(&self) -> &Axis {
        &self.index
    }

    pub fn columns(&self) -> &Axis {
        &self.columns
    }

    pub fn column(&self, col: usize) -> &[Value] {
        &self.data[col]
    }

    pub fn column_by_label(&self, label: &Value) -> Option<&[Value]> {
        self.columns.position(label).map(|c| self.data[c].as_slice())
    }

    pub fn value(&self, row: usize, col: usize) -> &Value {
        &self.data[col][row]
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: Value) {
        self.data[col][row] = value;
    }

    pub fn row(&self, row: usize) -> impl Iterator<Item = &Value> + '_ {
        self.data.iter().map(move |column| &column[row])
    }

    /// True if every value in the row is missing.
    pub fn is_row_null(&self, row: usize) -> bool {
        self.row(row).all(Value::is_null)
    }

    /// True if every value in the column is missing.
    pub fn is_column_null(&self, col: usize) -> bool {
        self.data[col].iter().all(Value::is_null)
    }

    /// Rows at `positions`, in that order. Index level metadata is carried over as is.
    pub fn take_rows(&self, positions: &[usize]) -> Table {
        Table {
            index: self.index.take(positions),
            columns: self.columns.clone(),
            data: self
                .data
                .iter()
                .map(|column| positions.iter().map(|&p| column[p].clone()).collect())
                .collect(),
        }
    }

    /// Columns at `positions`, in that order. Header level metadata is carried over as is.
    pub fn take_columns(&self, positions: &[usize]) -> Table {
        Table {
            index: self.index.clone(),
            columns: self.columns.take(positions),
            data: positions.iter().map(|&p| self.data[p].clone()).collect(),
        }
    }

    /// Replace the row index with one rebuilt from its current entries.
    pub fn rebuild_index(&mut self) {
        self.index = self.index.rebuild();
    }

    /// Replace the column header with one rebuilt from its current entries.
    pub fn rebuild_columns(&mut self) {
        self.columns = self.columns.rebuild();
    }

    /// Same labels and values, ignoring axis names and label representation.
    ///
    /// Missing values compare equal to each other.
    pub fn same_content(&self, other: &Table) -> bool {
        self.shape() == other.shape()
            && self.index.same_labels(&other.index)
            && self.columns.same_labels(&other.columns)
            && self.data.iter().zip(&other.data).all(|(a, b)| {
                a.iter().zip(b).all(|(x, y)| (x.is_null() && y.is_null()) || x == y)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("name", vec![Value::from("a"), Value::from("b"), Value::from("c")]),
            ("score", vec![Value::Int(1), Value::Null, Value::Float(2.5)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape_and_access() {
        let table = sample();
        assert_eq!(table.shape(), (3, 2));
        assert_eq!(table.value(2, 1), &Value::Float(2.5));
        assert_eq!(table.column_by_label(&Value::from("name")).unwrap()[1], Value::from("b"));
        assert_eq!(table.index(), &Axis::range(3));
    }

    #[test]
    fn test_new_checks_lengths() {
        let err = Table::new(Axis::range(2), Axis::flat(vec!["x"]), vec![vec![Value::Int(1)]]).unwrap_err();
        assert_eq!(err, TableError::ColumnLengthMismatch { column: 0, expected: 2, found: 1 });

        let err = Table::new(Axis::range(0), Axis::flat(vec!["x", "y"]), vec![vec![]]).unwrap_err();
        assert_eq!(err, TableError::ColumnCountMismatch { labels: 2, columns: 1 });
    }

    #[test]
    fn test_set_index_moves_column() {
        let table = sample().set_index(&Value::from("name")).unwrap();
        assert_eq!(table.shape(), (3, 1));
        assert_eq!(table.index(), &Axis::named(vec!["a", "b", "c"], "name"));
        assert_eq!(table.columns(), &Axis::flat(vec!["score"]));

        let err = sample().set_index(&Value::from("missing")).unwrap_err();
        assert_eq!(err, TableError::UnknownColumn("missing".into()));
    }

    #[test]
    fn test_row_and_column_nullness() {
        let table = Table::from_rows(
            vec!["a", "b"],
            vec![vec![Value::Null, Value::Null], vec![Value::Int(1), Value::Null]],
        )
        .unwrap();
        assert!(table.is_row_null(0));
        assert!(!table.is_row_null(1));
        assert!(table.is_column_null(1));
        assert!(!table.is_column_null(0));
    }

    #[test]
    fn test_take_rows_and_same_content() {
        let table = sample();
        let taken = table.take_rows(&[0, 2]);
        assert_eq!(taken.nrows(), 2);
        assert_eq!(taken.index(), &Axis::flat(vec![0i64, 2]));

        let renamed = sample().with_index(Axis::named(vec![0i64, 1, 2], "n")).unwrap();
        assert_ne!(renamed, table);
        assert!(renamed.same_content(&table));
        assert!(!taken.same_content(&table));
    }

    #[test]
    fn test_empty() {
        let table = Table::empty();
        assert_eq!(table.shape(), (0, 0));
        assert!(table.is_empty());
    }
}
