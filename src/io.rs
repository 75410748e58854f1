//! Table file I/O.
//!
//! - [`table_file`]: the line-oriented `count` + `key weight` format used for both the input
//!   tables and the ranked result.
//! - [`number`]: the textual rendering of result values.

pub mod number;
pub mod table_file;

pub use table_file::{parse_table, read_table, render_ranked, write_ranked};
