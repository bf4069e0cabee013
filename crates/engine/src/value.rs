use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use sheetframe_core::format_float;

/// A single typed table value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Missing value. A `Float(NaN)` is treated the same way.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Non-scalar cell content; written as its display string.
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_)) && !self.is_null()
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Hashable identity used when grouping labels into levels.
    pub(crate) fn key(&self) -> ValueKey {
        match self {
            Value::Null => ValueKey::Null,
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Int(n) => ValueKey::Int(*n),
            Value::Float(f) if f.is_nan() => ValueKey::Null,
            Value::Float(f) => ValueKey::Float(OrderedFloat(*f)),
            Value::Text(s) => ValueKey::Text(s.clone()),
            Value::Date(d) => ValueKey::Date(*d),
            Value::DateTime(dt) => ValueKey::DateTime(*dt),
            Value::List(items) => ValueKey::List(items.iter().map(Value::key).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    List(Vec<ValueKey>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(true) => write!(f, "TRUE"),
            Value::Bool(false) => write!(f, "FALSE"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) if n.is_nan() => Ok(()),
            Value::Float(n) => write!(f, "{}", format_float(*n)),
            Value::Text(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match item {
                        Value::Text(s) => write!(f, "'{}'", s)?,
                        Value::Null => write!(f, "None")?,
                        other => write!(f, "{}", other)?,
                    }
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_detection() {
        assert!(Value::Null.is_null());
        assert!(Value::Float(f64::NAN).is_null());
        assert!(!Value::Float(0.0).is_null());
        assert!(!Value::Text(String::new()).is_null());
        assert!(!Value::Float(f64::NAN).is_numeric());
        assert!(Value::Int(3).is_numeric());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(3e50).to_string(), "3e50");
        assert_eq!(Value::Bool(true).to_string(), "TRUE");
        assert_eq!(
            Value::Date(NaiveDate::from_ymd_opt(2017, 3, 4).unwrap()).to_string(),
            "2017-03-04"
        );
    }

    #[test]
    fn test_list_display() {
        assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "[1, 2, 3]");
        assert_eq!(
            Value::List(vec![Value::from("a"), Value::Null]).to_string(),
            "['a', None]"
        );
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn test_nan_keys_group_with_null() {
        assert_eq!(Value::Float(f64::NAN).key(), Value::Null.key());
        assert_ne!(Value::Int(1).key(), Value::Float(1.0).key());
    }
}
