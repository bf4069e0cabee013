//! Grid of strings to table.
//!
//! [`TextParser`] reads column labels from the header rows, index labels from
//! the index columns, and infers a type per column (int, then float, then
//! bool, falling back to text). Header cells left blank get `Unnamed: {col}`
//! placeholders (`Unnamed: {col}_level_{level}` for multi-level headers), and
//! repeated single-level names are made unique as `name`, `name.1`, ...
//!
//! Options that name a column (dtype, converters, date parsing, usecols)
//! match a single-level label's text, or the top-level component of a
//! multi-level label. Index levels are matched by their level name.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use sheetframe_engine::{Axis, Table, Value};

use crate::error::ParseError;

/// Cell texts read as missing when NA filtering is on.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%m/%d/%Y %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y"];

/// Requested column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Int,
    Float,
    Text,
    Bool,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::Int => write!(f, "int"),
            DType::Float => write!(f, "float"),
            DType::Text => write!(f, "text"),
            DType::Bool => write!(f, "bool"),
        }
    }
}

/// Which rows hold column labels, counted after skipped rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    /// No header; columns are numbered (or prefixed, see [`ParseOptions::prefix`])
    None,
    /// One row per column level. Rows between them are discarded.
    Rows(Vec<usize>),
}

impl Default for Header {
    fn default() -> Self {
        Header::Rows(vec![0])
    }
}

/// Column subset to keep. Index columns are always kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseCols {
    Names(Vec<String>),
    Positions(Vec<usize>),
}

/// Grid rows to ignore before anything else is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipRows {
    First(usize),
    Rows(Vec<usize>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParseDates {
    #[default]
    Off,
    /// Parse every index level
    Index,
    /// Parse the named columns
    Columns(Vec<String>),
}

/// Per-column function over the raw cell text. Takes precedence over NA
/// filtering and type inference for its column.
#[derive(Clone)]
pub struct Converter(Arc<dyn Fn(&str) -> Value + Send + Sync>);

impl Converter {
    pub fn new(f: impl Fn(&str) -> Value + Send + Sync + 'static) -> Self {
        Converter(Arc::new(f))
    }

    pub fn apply(&self, raw: &str) -> Value {
        (self.0)(raw)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converter(..)")
    }
}

/// Options for [`GridParser::parse`].
///
/// With several header rows and an index, a first data row whose data cells
/// are all empty but whose index cells are not is read as the index level
/// names, even if it was written as a data row.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub header: Header,
    /// Grid positions of the index columns, outermost level first
    pub index_col: Option<Vec<usize>>,
    pub usecols: Option<UseCols>,
    pub dtype: HashMap<String, DType>,
    pub converters: HashMap<String, Converter>,
    pub na_filter: bool,
    /// Extra NA texts on top of [`DEFAULT_NA_VALUES`]
    pub na_values: Vec<String>,
    pub skiprows: Option<SkipRows>,
    pub nrows: Option<usize>,
    pub parse_dates: ParseDates,
    /// chrono format for date parsing; common formats are tried when unset
    pub date_format: Option<String>,
    /// Column name prefix when there is no header
    pub prefix: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            header: Header::default(),
            index_col: None,
            usecols: None,
            dtype: HashMap::new(),
            converters: HashMap::new(),
            na_filter: true,
            na_values: Vec::new(),
            skiprows: None,
            nrows: None,
            parse_dates: ParseDates::Off,
            date_format: None,
            prefix: None,
        }
    }
}

impl ParseOptions {
    /// Header made of the first `levels` rows; `0` means no header.
    pub fn header_levels(mut self, levels: usize) -> Self {
        self.header = if levels == 0 { Header::None } else { Header::Rows((0..levels).collect()) };
        self
    }

    pub fn header_rows(mut self, rows: Vec<usize>) -> Self {
        self.header = Header::Rows(rows);
        self
    }

    pub fn no_header(mut self) -> Self {
        self.header = Header::None;
        self
    }

    /// Index made of the first `levels` columns; `0` means no index.
    pub fn index_levels(mut self, levels: usize) -> Self {
        self.index_col = if levels == 0 { None } else { Some((0..levels).collect()) };
        self
    }

    pub fn index_col(mut self, cols: Vec<usize>) -> Self {
        self.index_col = Some(cols);
        self
    }

    pub fn usecols(mut self, usecols: UseCols) -> Self {
        self.usecols = Some(usecols);
        self
    }

    pub fn dtype(mut self, column: &str, dtype: DType) -> Self {
        self.dtype.insert(column.to_string(), dtype);
        self
    }

    pub fn converter(mut self, column: &str, f: impl Fn(&str) -> Value + Send + Sync + 'static) -> Self {
        self.converters.insert(column.to_string(), Converter::new(f));
        self
    }

    pub fn na_filter(mut self, enabled: bool) -> Self {
        self.na_filter = enabled;
        self
    }

    pub fn na_values<S: Into<String>>(mut self, values: Vec<S>) -> Self {
        self.na_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn skiprows(mut self, skip: SkipRows) -> Self {
        self.skiprows = Some(skip);
        self
    }

    pub fn nrows(mut self, n: usize) -> Self {
        self.nrows = Some(n);
        self
    }

    pub fn parse_dates(mut self, parse_dates: ParseDates) -> Self {
        self.parse_dates = parse_dates;
        self
    }

    pub fn date_format(mut self, format: &str) -> Self {
        self.date_format = Some(format.to_string());
        self
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }
}

/// Turns a rectangular grid of cell strings into a table.
pub trait GridParser {
    fn parse(&self, grid: &[Vec<String>], options: &ParseOptions) -> Result<Table, ParseError>;
}

/// Default [`GridParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextParser;

impl GridParser for TextParser {
    fn parse(&self, grid: &[Vec<String>], options: &ParseOptions) -> Result<Table, ParseError> {
        let rows = skip_rows(grid, options.skiprows.as_ref());
        if rows.is_empty() {
            return Ok(Table::empty());
        }
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);

        let header_rows: Vec<usize> = match &options.header {
            Header::None => Vec::new(),
            Header::Rows(h) => {
                let mut h = h.clone();
                h.sort_unstable();
                h.dedup();
                h
            }
        };
        if let Some(&last) = header_rows.last() {
            if last >= rows.len() {
                return Err(ParseError::HeaderOutOfRange { row: last, rows: rows.len() });
            }
        }
        let mut data_start = header_rows.last().map_or(0, |h| h + 1);

        let index_cols = options.index_col.clone().unwrap_or_default();
        if let Some(&bad) = index_cols.iter().find(|&&p| p >= width) {
            return Err(ParseError::ColumnOutOfRange { position: bad, width });
        }
        let data_cols: Vec<usize> = (0..width).filter(|p| !index_cols.contains(p)).collect();

        // Column labels, one tuple per data column
        let mut labels: Vec<Vec<Value>> = match header_rows.len() {
            0 => data_cols
                .iter()
                .map(|&j| match &options.prefix {
                    Some(prefix) => vec![Value::Text(format!("{}{}", prefix, j))],
                    None => vec![Value::Int(j as i64)],
                })
                .collect(),
            1 => {
                let h = header_rows[0];
                let names = data_cols.iter().map(|&j| match cell(&rows, h, j) {
                    "" => format!("Unnamed: {}", j),
                    text => text.to_string(),
                });
                dedupe_names(names).into_iter().map(|n| vec![Value::Text(n)]).collect()
            }
            _ => data_cols
                .iter()
                .map(|&j| {
                    header_rows
                        .iter()
                        .enumerate()
                        .map(|(level, &h)| match cell(&rows, h, j) {
                            "" => Value::Text(format!("Unnamed: {}_level_{}", j, level)),
                            text => Value::from(text),
                        })
                        .collect()
                })
                .collect(),
        };

        // Level names
        let mut column_names: Vec<Option<String>> = vec![None; header_rows.len().max(1)];
        let mut index_names: Vec<Option<String>> = vec![None; index_cols.len()];
        if header_rows.len() == 1 {
            for (k, &p) in index_cols.iter().enumerate() {
                index_names[k] = non_empty(cell(&rows, header_rows[0], p));
            }
        } else if header_rows.len() > 1 && !index_cols.is_empty() {
            for (level, &h) in header_rows.iter().enumerate() {
                column_names[level] = non_empty(cell(&rows, h, index_cols[0]));
            }
            if data_start < rows.len() && is_index_names_row(&rows, data_start, &index_cols, &data_cols) {
                for (k, &p) in index_cols.iter().enumerate() {
                    index_names[k] = non_empty(cell(&rows, data_start, p));
                }
                data_start += 1;
            }
        }

        // Column subset
        let selected: Vec<usize> = match &options.usecols {
            None => (0..data_cols.len()).collect(),
            Some(UseCols::Names(names)) => {
                for name in names {
                    if !labels.iter().any(|l| selector_key(l) == *name) {
                        return Err(ParseError::UnknownColumn(name.clone()));
                    }
                }
                (0..data_cols.len()).filter(|&i| names.contains(&selector_key(&labels[i]))).collect()
            }
            Some(UseCols::Positions(positions)) => {
                if let Some(&bad) = positions.iter().find(|&&p| p >= width) {
                    return Err(ParseError::ColumnOutOfRange { position: bad, width });
                }
                (0..data_cols.len()).filter(|&i| positions.contains(&data_cols[i])).collect()
            }
        };

        let data_end = match options.nrows {
            Some(n) => rows.len().min(data_start + n),
            None => rows.len(),
        };
        let raw_column = |p: usize| -> Vec<&str> { (data_start..data_end).map(|r| cell(&rows, r, p)).collect() };

        let na = na_set(options);
        let nrows = data_end.saturating_sub(data_start);

        let mut data = Vec::with_capacity(selected.len());
        for &i in &selected {
            let key = selector_key(&labels[i]);
            let values = convert_column(&raw_column(data_cols[i]), Some(key.as_str()), options, &na)?;
            let values = match &options.parse_dates {
                ParseDates::Columns(names) if names.contains(&key) => parse_date_values(values, options),
                _ => values,
            };
            data.push(values);
        }
        let labels: Vec<Vec<Value>> = selected.iter().map(|&i| std::mem::take(&mut labels[i])).collect();

        let mut index_levels = Vec::with_capacity(index_cols.len());
        for (k, &p) in index_cols.iter().enumerate() {
            let values = convert_column(&raw_column(p), index_names[k].as_deref(), options, &na)?;
            let values = match options.parse_dates {
                ParseDates::Index => parse_date_values(values, options),
                _ => values,
            };
            index_levels.push(values);
        }

        let index = match index_levels.len() {
            0 => Axis::range(nrows),
            1 => Axis::Flat {
                labels: index_levels.pop().unwrap_or_default(),
                name: index_names.pop().flatten(),
            },
            _ => {
                let tuples = (0..nrows)
                    .map(|r| index_levels.iter().map(|level| level[r].clone()).collect())
                    .collect();
                Axis::multi(tuples, index_names)?
            }
        };

        let columns = if header_rows.len() > 1 {
            Axis::multi(labels, column_names)?
        } else {
            Axis::Flat { labels: labels.into_iter().flatten().collect(), name: None }
        };

        log::debug!("Parsed {} row(s) x {} column(s)", nrows, data.len());
        Ok(Table::new(index, columns, data)?)
    }
}

// ── Internal helpers ────────────────────────────────────────────────

fn skip_rows<'a>(grid: &'a [Vec<String>], skip: Option<&SkipRows>) -> Vec<&'a [String]> {
    grid.iter()
        .enumerate()
        .filter(|(i, _)| match skip {
            None => true,
            Some(SkipRows::First(n)) => i >= n,
            Some(SkipRows::Rows(skipped)) => !skipped.contains(i),
        })
        .map(|(_, row)| row.as_slice())
        .collect()
}

fn cell<'a>(rows: &[&'a [String]], r: usize, c: usize) -> &'a str {
    rows[r].get(c).map_or("", String::as_str)
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Name used by column-selecting options.
fn selector_key(label: &[Value]) -> String {
    label.first().map(Value::to_string).unwrap_or_default()
}

/// A row right below a multi-level header that holds only index level names.
fn is_index_names_row(rows: &[&[String]], r: usize, index_cols: &[usize], data_cols: &[usize]) -> bool {
    data_cols.iter().all(|&p| cell(rows, r, p).is_empty())
        && index_cols.iter().any(|&p| !cell(rows, r, p).is_empty())
}

fn dedupe_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let names: Vec<String> = names.collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        if taken.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let suffix = next_suffix.entry(name.clone()).or_insert(1);
        let mut candidate = format!("{}.{}", name, suffix);
        while taken.contains(&candidate) {
            *suffix += 1;
            candidate = format!("{}.{}", name, suffix);
        }
        *suffix += 1;
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

fn na_set(options: &ParseOptions) -> HashSet<&str> {
    DEFAULT_NA_VALUES
        .iter()
        .copied()
        .chain(options.na_values.iter().map(String::as_str))
        .collect()
}

fn convert_column(
    raw: &[&str],
    key: Option<&str>,
    options: &ParseOptions,
    na: &HashSet<&str>,
) -> Result<Vec<Value>, ParseError> {
    if let Some(converter) = key.and_then(|k| options.converters.get(k)) {
        return Ok(raw.iter().map(|s| converter.apply(s)).collect());
    }

    let is_na = |s: &str| options.na_filter && na.contains(s);

    match key.and_then(|k| options.dtype.get(k)) {
        Some(&dtype) => raw
            .iter()
            .map(|&s| {
                if is_na(s) {
                    return Ok(Value::Null);
                }
                cast(s, dtype).ok_or_else(|| ParseError::DtypeMismatch {
                    column: key.unwrap_or_default().to_string(),
                    value: s.to_string(),
                    dtype,
                })
            })
            .collect(),
        None => Ok(infer(raw, is_na)),
    }
}

fn cast(s: &str, dtype: DType) -> Option<Value> {
    match dtype {
        DType::Int => s.parse::<i64>().ok().map(Value::Int),
        DType::Float => s.parse::<f64>().ok().map(Value::Float),
        DType::Bool => parse_bool(s).map(Value::Bool),
        DType::Text => Some(Value::from(s)),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}

/// Narrowest type every non-missing cell converts to.
fn infer(raw: &[&str], is_na: impl Fn(&str) -> bool) -> Vec<Value> {
    let present: Vec<&str> = raw.iter().copied().filter(|s| !is_na(s)).collect();

    let dtype = [DType::Int, DType::Float, DType::Bool]
        .into_iter()
        .find(|&dtype| present.iter().all(|s| cast(s, dtype).is_some()))
        .unwrap_or(DType::Text);

    raw.iter()
        .map(|&s| {
            if is_na(s) {
                Value::Null
            } else {
                cast(s, dtype).unwrap_or_else(|| Value::from(s))
            }
        })
        .collect()
}

/// Dates for a column whose text values all parse; the column is left as is
/// otherwise.
fn parse_date_values(values: Vec<Value>, options: &ParseOptions) -> Vec<Value> {
    let format = options.date_format.as_deref();
    let parsed: Option<Vec<Value>> = values
        .iter()
        .map(|v| match v {
            Value::Null => Some(Value::Null),
            Value::Text(s) => parse_date(s, format),
            Value::Date(_) | Value::DateTime(_) => Some(v.clone()),
            _ => None,
        })
        .collect();
    parsed.unwrap_or(values)
}

fn parse_date(s: &str, format: Option<&str>) -> Option<Value> {
    match format {
        Some(f) => NaiveDateTime::parse_from_str(s, f)
            .map(Value::DateTime)
            .or_else(|_| NaiveDate::parse_from_str(s, f).map(Value::Date))
            .ok(),
        None => DATETIME_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
            .map(Value::DateTime)
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                    .map(Value::Date)
            }),
    }
}
