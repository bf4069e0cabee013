//! Cell text for a single table value.
//!
//! Two independent escapes can prefix a value with an apostrophe, which the
//! service consumes and which forces the rest of the cell to be literal text:
//! formula escaping (`allow_formulas == false` and the text starts with `=`)
//! and the string escaping policy. Formula escaping wins and is never doubled.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use sheetframe_core::format_float;
use sheetframe_engine::Value;

use crate::error::FrameError;

/// When to prefix a string value with an apostrophe.
#[derive(Clone, Default)]
pub enum StringEscaping {
    /// Only values that already start with an apostrophe
    #[default]
    Default,
    /// Never
    Off,
    /// Every non-empty string
    Full,
    /// Values for which the predicate returns true
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl StringEscaping {
    pub fn predicate(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        StringEscaping::Predicate(Arc::new(f))
    }

    fn should_escape(&self, text: &str) -> bool {
        match self {
            StringEscaping::Default => text.starts_with('\''),
            StringEscaping::Off => false,
            StringEscaping::Full => true,
            StringEscaping::Predicate(f) => f(text),
        }
    }
}

impl fmt::Debug for StringEscaping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringEscaping::Default => write!(f, "Default"),
            StringEscaping::Off => write!(f, "Off"),
            StringEscaping::Full => write!(f, "Full"),
            StringEscaping::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

impl FromStr for StringEscaping {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(StringEscaping::Default),
            "off" => Ok(StringEscaping::Off),
            "full" => Ok(StringEscaping::Full),
            other => Err(FrameError::Config(format!(
                "string_escaping must be \"default\", \"off\", \"full\" or a predicate, got {:?}",
                other
            ))),
        }
    }
}

/// Text to submit for `value`.
pub fn cellrepr(value: &Value, allow_formulas: bool, string_escaping: &StringEscaping) -> String {
    if value.is_null() {
        return String::new();
    }

    // Numbers go out in minimal decimal form and are never escaped.
    match value {
        Value::Int(n) => return n.to_string(),
        Value::Float(n) => return format_float(*n),
        _ => {}
    }

    let text = value.to_string();
    if text.is_empty() {
        return text;
    }
    if !allow_formulas && text.starts_with('=') {
        return format!("'{}", text);
    }
    if string_escaping.should_escape(&text) {
        return format!("'{}", text);
    }
    text
}
