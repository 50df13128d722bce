//! Comparison engine
//!
//! This module contains the types and algorithms behind every report:
//!
//! - `classify`: decides which files are text assets worth diffing and link-checking
//! - `compare`: the tree comparator and the table it produces
//! - `core`: shared utilities (pager wrapper)
//! - `diff`: Myers' edit script and the two-column wrap/pad renderer
//! - `links`: URL extraction and link validation

pub mod classify;
pub mod compare;
pub mod core;
pub mod diff;
pub mod links;
