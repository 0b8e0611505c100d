//! Input reader and output writer (C13/C14, §4.9): the only code that
//! touches the filesystem for array data.

pub mod reader;
pub mod writer;

pub use reader::{read_input_file, read_partial_file};
pub use writer::write_rows;
