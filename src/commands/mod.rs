//! Report commands
//!
//! Each command is a method on [`Session`](crate::areas::session::Session) that runs
//! the engine and writes a terminal report. Colour is applied here and nowhere else:
//!
//! - `files`: tree comparison table
//! - `code`: side-by-side diff of two files
//! - `links`: per-URL link report for one file
//! - `table`: the text grid both tables are drawn with

pub mod code;
pub mod files;
pub mod links;
pub mod table;
