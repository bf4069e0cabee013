use std::fmt;

/// Error type for worksheet operations.
///
/// Every remote failure surfaces as one of these and is passed through to the
/// caller unchanged; nothing in sheetframe retries or compensates.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetError {
    /// No credentials configured
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// Service rejected the request (4xx with message), including resizes
    /// that would exceed the sheet's cell limit
    Validation(String),
    /// Malformed response payload
    Parse(String),
    /// Local file I/O error
    Io(String),
    /// Spreadsheet or worksheet does not exist
    NotFound(String),
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetError::NotAuthenticated => write!(f, "Not authenticated: no sheets token configured"),
            SheetError::Network(msg) => write!(f, "Network error: {}", msg),
            SheetError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            SheetError::Validation(msg) => write!(f, "{}", msg),
            SheetError::Parse(msg) => write!(f, "Parse error: {}", msg),
            SheetError::Io(msg) => write!(f, "I/O error: {}", msg),
            SheetError::NotFound(what) => write!(f, "Not found: {}", what),
        }
    }
}

impl std::error::Error for SheetError {}
