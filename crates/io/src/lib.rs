//! Moving tables in and out of worksheets.
//!
//! Writing: layout -> cell text -> resize -> batched update.
//! Reading: full grid fetch -> parser -> empty row/column cleanup.

pub mod batch;
pub mod cellrepr;
pub mod cleanup;
pub mod error;
pub mod frame;
pub mod grid;
pub mod layout;
pub mod parser;
pub mod resize;

pub use batch::submit;
pub use cellrepr::{cellrepr, StringEscaping};
pub use cleanup::{drop_empty_columns, drop_empty_rows, is_unnamed_label};
pub use error::{FrameError, ParseError};
pub use frame::{
    get_as_dataframe, get_as_dataframe_with, set_with_dataframe, ReadOptions, WriteOptions, WriteSummary,
};
pub use grid::read_grid;
pub use layout::{plan_updates, LayoutDirectives};
pub use parser::{
    Converter, DType, GridParser, Header, ParseDates, ParseOptions, SkipRows, TextParser, UseCols,
    DEFAULT_NA_VALUES,
};
pub use resize::{
    cols_first_required, plan_exact_resize, plan_resize, resize_exact, resize_to_minimum, ResizeStep,
};
