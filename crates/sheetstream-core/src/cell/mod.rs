//! Cell types and the concurrent cell store

mod coord;
mod store;
mod value;

pub use coord::{column_to_letters, letters_to_column, CellCoord, CellRect, CellRectIter};
pub use store::{Bounds, Cell, CellStore, RowMap};
pub use value::{CellValue, SharedString};
