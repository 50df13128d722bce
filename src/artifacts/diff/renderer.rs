//! Two-column rendering of an edit script
//!
//! Every logical line is expanded (tabs to four spaces), stripped of its terminator
//! and cut into physical rows at most `column_width` display columns wide (wide
//! glyphs count for two). Only the first
//! physical row of a logical line carries its line number.
//!
//! After each operation the shorter column is padded with blank rows, so both
//! columns always hold the same number of rows at every operation boundary, no
//! matter how the two sides wrap.
//!
//! Rows carry an [`Origin`] tag instead of colour codes; colouring is left to the
//! presentation layer.

use crate::artifacts::diff::line_op::{LineOp, strip_terminator};
use unicode_width::UnicodeWidthChar;

pub const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Common,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Content {
        line_number: Option<usize>,
        origin: Origin,
        text: String,
    },
    Padding,
}

impl Row {
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Row::Content { line_number, .. } => *line_number,
            Row::Padding => None,
        }
    }

    pub fn origin(&self) -> Option<Origin> {
        match self {
            Row::Content { origin, .. } => Some(*origin),
            Row::Padding => None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Row::Content { text, .. } => text,
            Row::Padding => "",
        }
    }

    pub fn is_padding(&self) -> bool {
        matches!(self, Row::Padding)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedColumn {
    rows: Vec<Row>,
}

impl RenderedColumn {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    fn push_line(&mut self, line_number: usize, origin: Origin, chunks: Vec<String>) {
        for (idx, text) in chunks.into_iter().enumerate() {
            self.rows.push(Row::Content {
                line_number: (idx == 0).then_some(line_number),
                origin,
                text,
            });
        }
    }

    fn pad_to(&mut self, rows: usize) {
        while self.rows.len() < rows {
            self.rows.push(Row::Padding);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    pub identical: bool,
    pub left: RenderedColumn,
    pub right: RenderedColumn,
}

/// Incremental renderer; [`render`] drives it over a whole script.
#[derive(Debug, Clone)]
pub struct LineDiffRenderer {
    column_width: usize,
    left_line: usize,
    right_line: usize,
    changed: bool,
    left: RenderedColumn,
    right: RenderedColumn,
}

impl LineDiffRenderer {
    pub fn new(column_width: usize) -> Self {
        LineDiffRenderer {
            column_width: column_width.max(1),
            left_line: 1,
            right_line: 1,
            changed: false,
            left: RenderedColumn::default(),
            right: RenderedColumn::default(),
        }
    }

    pub fn left(&self) -> &RenderedColumn {
        &self.left
    }

    pub fn right(&self) -> &RenderedColumn {
        &self.right
    }

    pub fn push(&mut self, op: &LineOp) {
        match op {
            LineOp::Common { left, right } => {
                self.left
                    .push_line(self.left_line, Origin::Common, self.wrap(left));
                self.right
                    .push_line(self.right_line, Origin::Common, self.wrap(right));
                self.left_line += 1;
                self.right_line += 1;
            }
            LineOp::Removed { text } => {
                self.changed = true;
                self.left
                    .push_line(self.left_line, Origin::Removed, self.wrap(text));
                self.left_line += 1;
            }
            LineOp::Added { text } => {
                self.changed = true;
                self.right
                    .push_line(self.right_line, Origin::Added, self.wrap(text));
                self.right_line += 1;
            }
        }

        let rows = self.left.len().max(self.right.len());
        self.left.pad_to(rows);
        self.right.pad_to(rows);
    }

    pub fn finish(self) -> DiffResult {
        DiffResult {
            identical: !self.changed,
            left: self.left,
            right: self.right,
        }
    }

    fn wrap(&self, line: &str) -> Vec<String> {
        wrap_line(line, self.column_width)
    }
}

/// Render a full edit script.
///
/// Identical inputs short-circuit: `identical` is set and both columns stay empty.
pub fn render(ops: &[LineOp], column_width: usize) -> DiffResult {
    if ops.iter().all(|op| !op.is_change()) {
        return DiffResult {
            identical: true,
            left: RenderedColumn::default(),
            right: RenderedColumn::default(),
        };
    }

    let mut renderer = LineDiffRenderer::new(column_width);
    for op in ops {
        renderer.push(op);
    }

    renderer.finish()
}

pub fn expand_tabs(text: &str) -> String {
    text.replace('\t', &" ".repeat(TAB_WIDTH))
}

/// Cut one logical line into rows at most `width` display columns wide.
///
/// An empty line still occupies one row. A glyph wider than `width` gets a row
/// of its own.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut used = 0;

    for ch in expand_tabs(strip_terminator(line)).chars() {
        let columns = ch.width().unwrap_or(0);
        if used + columns > width && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            used = 0;
        }
        row.push(ch);
        used += columns;
    }
    rows.push(row);

    rows
}
