//! In-memory table model: typed values, an optional row index and column
//! header, either of which may carry several label levels.

pub mod axis;
pub mod error;
pub mod table;
pub mod value;

pub use axis::{Axis, MultiIndex};
pub use error::TableError;
pub use table::Table;
pub use value::Value;
