//! Google Sheets client.
//!
//! Implements `sheetframe_core::Worksheet` over the Sheets v4 REST API, plus
//! the lookups needed to get hold of a worksheet: by spreadsheet id and tab
//! title, or by spreadsheet name through the Drive v3 files listing.
//!
//! No retries. Every failed request surfaces as a `SheetError`.

mod auth;
mod client;
mod worksheet;

pub use auth::{Credentials, auth_file_path, load_auth, load_auth_from, save_auth, save_auth_to, delete_auth};
pub use client::{SheetsClient, SpreadsheetInfo, WorksheetInfo};
pub use worksheet::RemoteWorksheet;
