use crate::areas::session::Session;
use crate::areas::site::OpenSite;
use crate::artifacts::diff::{DiffResult, Origin, RenderedColumn, Row, compare_texts};
use crate::commands::table::{Align, Cell, Table};
use crate::errors::{CompareFailure, ConfigurationError, RootProblem, Side};
use colored::Color;
use std::io::Write;

#[derive(Debug, Clone)]
pub struct CodeOptions {
    pub left: String,
    pub right: String,
    /// Overrides the configured column width.
    pub width: Option<usize>,
}

impl Session {
    /// Diff two single files side by side.
    pub fn code(&self, opts: &CodeOptions) -> anyhow::Result<DiffResult> {
        let (left, right) = self.open_sites(&opts.left, &opts.right)?;

        let errors = [
            (Side::Left, &left, &opts.left),
            (Side::Right, &right, &opts.right),
        ]
        .into_iter()
        .filter(|(_, site, _)| !site.provider.is_file(&site.root))
        .map(|(side, _, spec)| ConfigurationError::new(side, spec.as_str(), RootProblem::NotAFile))
        .collect::<Vec<_>>();
        if !errors.is_empty() {
            return Err(CompareFailure::new(errors).into());
        }

        let left_text = read(&left)?;
        let right_text = read(&right)?;
        let width = opts.width.unwrap_or(self.settings().column_width);

        let result = compare_texts(&left_text, &right_text, width);
        tracing::debug!(
            identical = result.identical,
            rows = result.left.len(),
            "compared {} with {}",
            opts.left,
            opts.right
        );

        self.print_code_diff(&opts.left, &opts.right, &result)?;
        Ok(result)
    }

    pub fn print_code_diff(
        &self,
        left: &str,
        right: &str,
        result: &DiffResult,
    ) -> anyhow::Result<()> {
        if result.identical {
            writeln!(self.writer(), "Files are identical!")?;
            return Ok(());
        }

        let gutter = gutter_width(&result.left).max(gutter_width(&result.right));
        let mut grid = Table::new([format!("Path 1: {left}"), format!("Path 2: {right}")])
            .align(0, Align::Left)
            .align(1, Align::Left);

        for (l, r) in result.left.iter().zip(result.right.iter()) {
            grid.add_row(vec![code_cell(l, gutter), code_cell(r, gutter)]);
        }

        grid.write_to(&mut *self.writer())?;
        Ok(())
    }
}

fn read(site: &OpenSite) -> anyhow::Result<String> {
    site.provider.read_to_string(&site.root)
}

fn gutter_width(column: &RenderedColumn) -> usize {
    column
        .iter()
        .filter_map(Row::line_number)
        .max()
        .map(|number| number.to_string().len())
        .unwrap_or(1)
}

/// Only the line number is coloured; the code itself and continuation rows stay plain.
fn code_cell(row: &Row, gutter: usize) -> Cell {
    match (row.line_number(), row.origin()) {
        (Some(number), Some(origin)) => {
            let color = match origin {
                Origin::Added => Color::Green,
                Origin::Removed => Color::Red,
                Origin::Common => Color::BrightWhite,
            };
            Cell::colored(format!("{number:>gutter$}"), color)
                .push(format!(" {}", row.text()), None)
        }
        _ => Cell::plain(format!("{:gutter$} {}", "", row.text())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn gutter_fits_the_largest_line_number() {
        let result = compare_texts(
            &"x\n".repeat(12),
            &format!("{}y\n", "x\n".repeat(11)),
            80,
        );

        assert_eq!(gutter_width(&result.left), 2);
    }

    #[test]
    fn continuation_rows_have_a_blank_gutter() {
        let first = Row::Content {
            line_number: Some(7),
            origin: Origin::Added,
            text: "abc".to_string(),
        };
        let continued = Row::Content {
            line_number: None,
            origin: Origin::Added,
            text: "def".to_string(),
        };

        assert_eq!(code_cell(&first, 2).text(), " 7 abc");
        assert_eq!(code_cell(&continued, 2).text(), "   def");
        assert_eq!(code_cell(&Row::Padding, 2).text(), "   ");
    }
}
