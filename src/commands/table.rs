//! Plain text grid used by the report commands
//!
//! Widths are display columns of the unstyled text, colour is applied while writing,
//! so padding stays correct whether or not the terminal gets escape codes.

use colored::{Color, Colorize};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    text: String,
    color: Option<Color>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    spans: Vec<Span>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Cell::default().push(text, None)
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Cell::default().push(text, Some(color))
    }

    pub fn push(mut self, text: impl Into<String>, color: Option<Color>) -> Self {
        self.spans.push(Span {
            text: text.into(),
            color,
        });
        self
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    fn width(&self) -> usize {
        self.spans.iter().map(|span| span.text.width()).sum()
    }

    fn paint(&self) -> String {
        self.spans
            .iter()
            .map(|span| match span.color {
                Some(color) => span.text.color(color).to_string(),
                None => span.text.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Columns are centred unless realigned with [`Table::align`].
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers = headers.into_iter().map(Into::into).collect::<Vec<_>>();
        let aligns = vec![Align::Center; headers.len()];

        Table {
            headers,
            aligns,
            rows: Vec::new(),
        }
    }

    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.aligns.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Short rows are filled with empty cells, extra cells are dropped.
    pub fn add_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::default());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                self.rows
                    .iter()
                    .map(|row| row[idx].width())
                    .chain(std::iter::once(header.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
        let widths = self.widths();
        let border = widths
            .iter()
            .map(|width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+");
        let border = format!("+{border}+");

        writeln!(writer, "{border}")?;
        let header = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(text, width)| {
                let cell = Cell::colored(text.clone(), Color::BrightWhite);
                pad(&cell, *width, Align::Center)
            })
            .collect::<Vec<_>>();
        writeln!(writer, "| {} |", header.join(" | "))?;
        writeln!(writer, "{border}")?;

        for row in &self.rows {
            let cells = row
                .iter()
                .zip(&widths)
                .zip(&self.aligns)
                .map(|((cell, width), align)| pad(cell, *width, *align))
                .collect::<Vec<_>>();
            writeln!(writer, "| {} |", cells.join(" | "))?;
        }
        writeln!(writer, "{border}")?;

        Ok(())
    }
}

fn pad(cell: &Cell, width: usize, align: Align) -> String {
    let slack = width.saturating_sub(cell.width());
    let (before, after) = match align {
        Align::Left => (0, slack),
        Align::Center => (slack / 2, slack - slack / 2),
    };

    format!("{}{}{}", " ".repeat(before), cell.paint(), " ".repeat(after))
}
