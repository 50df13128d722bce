use crate::areas::session::Session;
use crate::artifacts::classify::ExtensionClassifier;
use crate::artifacts::compare::{
    CancellationToken, Checks, CompareOptions, ComparisonTable, Outcome, Presence, TreeComparator,
    TreeEntry,
};
use crate::commands::table::{Align, Cell, Table};
use crate::errors::Side;
use chrono::DateTime;
use colored::Color;
use std::io::Write;
use std::path::Component;

const NOT_AVAILABLE: &str = "N/A";
const UNAVAILABLE: &str = "ERROR";
const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

#[derive(Debug, Clone)]
pub struct FilesOptions {
    pub left: String,
    pub right: String,
    pub checks: Checks,
    pub cancel: Option<CancellationToken>,
}

impl Session {
    /// Compare two sites and print the drift table.
    pub fn files(&self, opts: &FilesOptions) -> anyhow::Result<ComparisonTable> {
        let table = self.compare_sites(opts)?;

        self.print_comparison(&table)?;
        if !table.is_complete() {
            writeln!(self.writer(), "Comparison cancelled, the table above is partial.")?;
        }

        Ok(table)
    }

    pub fn compare_sites(&self, opts: &FilesOptions) -> anyhow::Result<ComparisonTable> {
        let (left, right) = self.open_sites(&opts.left, &opts.right)?;

        let options = CompareOptions {
            checks: opts.checks,
            classifier: ExtensionClassifier::new(&self.settings().extensions),
            column_width: self.settings().column_width,
            link_workers: self.settings().links.workers,
            cancel: opts.cancel.clone(),
        };
        let comparator = TreeComparator::new(options, self.validator())?;

        let table = comparator.compare(
            left.provider.as_ref(),
            right.provider.as_ref(),
            &left.root,
            &right.root,
        )?;

        Ok(table)
    }

    pub fn print_comparison(&self, table: &ComparisonTable) -> anyhow::Result<()> {
        let checks = table.checks();
        let mut grid = Table::new(headers(checks)).align(0, Align::Left);

        for entry in table {
            grid.add_row(row(entry, checks));
        }

        grid.write_to(&mut *self.writer())?;
        Ok(())
    }
}

fn headers(checks: Checks) -> Vec<&'static str> {
    let mut headers = vec!["Filename", "Found"];
    if checks.contains(Checks::CONTENT) {
        headers.push("Code Match");
    }
    if checks.contains(Checks::LINKS) {
        headers.extend(["Links Failed (PROD.)", "Links Failed (DEV.)"]);
    }
    headers.extend([
        "Prod. Size (in Bytes)",
        "Dev. Size (in Bytes)",
        "Prod. Modified",
        "Dev. Modified",
    ]);
    headers
}

fn presence_color(presence: Presence) -> Color {
    match presence {
        Presence::Both => Color::Green,
        Presence::LeftOnly => Color::Yellow,
        Presence::RightOnly => Color::Blue,
    }
}

fn row(entry: &TreeEntry, checks: Checks) -> Vec<Cell> {
    let presence = entry.presence();
    let mut cells = vec![filename_cell(entry), found_cell(presence)];

    if checks.contains(Checks::CONTENT) {
        cells.push(code_match_cell(&entry.code_match));
    }
    if checks.contains(Checks::LINKS) {
        cells.push(link_failures_cell(entry.link_failures(Side::Left)));
        cells.push(link_failures_cell(entry.link_failures(Side::Right)));
    }

    let size_color = metadata_color(presence, entry.size_mismatch);
    let time_color = metadata_color(presence, entry.time_mismatch);
    for side in [Side::Left, Side::Right] {
        cells.push(optional_cell(entry.size(side).map(|size| size.to_string()), size_color));
    }
    for side in [Side::Left, Side::Right] {
        cells.push(optional_cell(entry.mtime(side).map(ctime), time_color));
    }

    cells
}

/// Ancestor directories are green where the other side has them too, the file
/// name takes the presence colour.
fn filename_cell(entry: &TreeEntry) -> Cell {
    let color = presence_color(entry.presence());
    let components = entry
        .relative_path
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>();

    let Some((name, dirs)) = components.split_last() else {
        return Cell::default();
    };

    let cell = dirs
        .iter()
        .zip(entry.segment_matches.iter().chain(std::iter::repeat(&true)))
        .fold(Cell::default(), |cell, (dir, matches)| {
            let dir_color = if *matches { Color::Green } else { color };
            cell.push(format!("{dir}/"), Some(dir_color))
        });

    cell.push(name.clone(), Some(color))
}

fn found_cell(presence: Presence) -> Cell {
    let label = match presence {
        Presence::Both => "BOTH",
        Presence::LeftOnly => Side::Left.label(),
        Presence::RightOnly => Side::Right.label(),
    };

    Cell::colored(label, presence_color(presence))
}

fn code_match_cell(outcome: &Outcome<bool>) -> Cell {
    match outcome {
        Outcome::Value(true) => Cell::colored("TRUE", Color::Green),
        Outcome::Value(false) => Cell::colored("FALSE", Color::Red),
        Outcome::Unavailable => Cell::colored(UNAVAILABLE, Color::Red),
        Outcome::NotApplicable => Cell::plain(NOT_AVAILABLE),
    }
}

fn link_failures_cell(outcome: &Outcome<usize>) -> Cell {
    match outcome {
        Outcome::Value(0) => Cell::colored("0", Color::Green),
        Outcome::Value(failures) => Cell::colored(failures.to_string(), Color::Red),
        Outcome::Unavailable => Cell::colored(UNAVAILABLE, Color::Red),
        Outcome::NotApplicable => Cell::plain(NOT_AVAILABLE),
    }
}

fn metadata_color(presence: Presence, mismatch: bool) -> Color {
    match (presence, mismatch) {
        (Presence::Both, true) => Color::Red,
        (Presence::Both, false) => Color::Green,
        _ => Color::BrightWhite,
    }
}

fn optional_cell(value: Option<String>, color: Color) -> Cell {
    match value {
        Some(value) => Cell::colored(value, color),
        None => Cell::plain(NOT_AVAILABLE),
    }
}

/// `Mon Jan  1 12:00:00 2024`, in UTC.
pub fn ctime(epoch_seconds: i64) -> String {
    DateTime::from_timestamp(epoch_seconds, 0)
        .map(|time| time.format(CTIME_FORMAT).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1_704_110_400, "Mon Jan  1 12:00:00 2024")]
    #[case(0, "Thu Jan  1 00:00:00 1970")]
    fn mtimes_render_like_ctime(#[case] epoch: i64, #[case] expected: &str) {
        assert_eq!(ctime(epoch), expected);
    }

    #[test]
    fn optional_columns_follow_the_checks() {
        assert_eq!(headers(Checks::empty()).len(), 6);
        assert_eq!(headers(Checks::CONTENT)[2], "Code Match");
        assert_eq!(
            headers(Checks::all()),
            vec![
                "Filename",
                "Found",
                "Code Match",
                "Links Failed (PROD.)",
                "Links Failed (DEV.)",
                "Prod. Size (in Bytes)",
                "Dev. Size (in Bytes)",
                "Prod. Modified",
                "Dev. Modified",
            ]
        );
    }

    #[test]
    fn one_sided_rows_fill_missing_cells() {
        let mut entry = TreeEntry::new("img/logo.png");
        entry.present_left = true;
        entry.size_left = Some(4);
        entry.mtime_left = Some(0);
        entry.segment_matches = vec![false];

        let cells = row(&entry, Checks::all())
            .iter()
            .map(Cell::text)
            .collect::<Vec<_>>();

        assert_eq!(
            cells,
            vec![
                "img/logo.png",
                "PROD.",
                "N/A",
                "N/A",
                "N/A",
                "4",
                "N/A",
                "Thu Jan  1 00:00:00 1970",
                "N/A",
            ]
        );
    }
}
