//! Tabular export for RepoSheet result tables.
//!
//! Two serializations of the same fixed four-column schema:
//! - [`csv`] — delimited text with a header row (plus a parser for it)
//! - [`xlsx`] — a single-sheet spreadsheet

pub mod csv;
pub mod xlsx;

pub use csv::{csv_string, parse_csv, write_csv};
pub use xlsx::{write_xlsx, xlsx_bytes};
