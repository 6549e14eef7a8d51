//! CSV input and output.
//!
//! Datasets are CSV files with a header row; the last column is the class
//! label, written as a class symbol or a numeric code. Missing cells hold
//! the configured missing token.

mod reader;
mod writer;

pub use reader::load_dataset;
pub use writer::write_completed;
