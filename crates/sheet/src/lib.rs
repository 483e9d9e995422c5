//! `marksync-sheet` — sheet addressing and the local sheet of record.
//!
//! No network dependencies. The CLI hands a [`SheetStore`] and a
//! [`SheetLayout`] to the sync operations; everything here is plain
//! row/column bookkeeping.

pub mod addr;
pub mod layout;
pub mod store;

pub use addr::{index_to_letters, letters_to_index, parse_column, AddrError};
pub use layout::{ProjectConfig, SheetLayout};
pub use store::{CsvSheet, SheetError, SheetStore};
