//! Line diffing and side-by-side rendering
//!
//! - `line_op`: one operation of an edit script
//! - `edit_script`: Myers' diff over two line sequences
//! - `renderer`: turns an edit script into two row-synchronised, wrapped columns
//!
//! Equality is decided on the exact line text (terminator included); tab expansion
//! and wrapping only happen while rendering.

pub mod edit_script;
pub mod line_op;
pub mod renderer;

pub use edit_script::{compute_edit_script, split_lines};
pub use line_op::LineOp;
pub use renderer::{DiffResult, LineDiffRenderer, Origin, RenderedColumn, Row, render};

/// Diff two in-memory texts and render them at `column_width`.
pub fn compare_texts(left: &str, right: &str, column_width: usize) -> DiffResult {
    let left_lines = split_lines(left);
    let right_lines = split_lines(right);
    let ops = compute_edit_script(&left_lines, &right_lines);

    render(&ops, column_width)
}
