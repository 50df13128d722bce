//! Tree comparison
//!
//! - `tree_comparator`: walks two sites and builds the comparison table
//! - `tree_entry`: one annotated row per relative path
//! - `cancellation`: cooperative stop signal checked between entries

pub mod cancellation;
pub mod tree_comparator;
pub mod tree_entry;

pub use cancellation::CancellationToken;
pub use tree_comparator::{Checks, CompareOptions, TreeComparator};
pub use tree_entry::{ComparisonTable, Outcome, Presence, TreeEntry};
