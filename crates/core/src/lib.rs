//! Grid-side primitives shared by every sheetframe crate.
//!
//! Coordinates here are always 1-based, matching the remote sheet's own
//! addressing. Nothing in this crate knows about tables or labels.

pub mod error;
pub mod grid;
pub mod memory;
pub mod number;
pub mod worksheet;

pub use error::SheetError;
pub use grid::{col_to_letters, Dimensions, Grid, GridRange, GridUpdate};
pub use memory::{MemoryWorksheet, SheetCall, SHEETS_CELL_LIMIT};
pub use number::format_float;
pub use worksheet::{ValueRenderMode, Worksheet};
