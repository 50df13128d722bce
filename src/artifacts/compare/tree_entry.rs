use crate::artifacts::compare::tree_comparator::Checks;
use crate::errors::Side;
use std::path::{Path, PathBuf};

/// Result of an optional per-entry check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Outcome<T> {
    /// The check was not requested, or does not apply to this entry.
    #[default]
    NotApplicable,
    /// The check applied but could not be carried out (unreadable file, failed validator).
    Unavailable,
    Value(T),
}

impl<T> Outcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, Outcome::NotApplicable)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::NotApplicable => Outcome::NotApplicable,
            Outcome::Unavailable => Outcome::Unavailable,
            Outcome::Value(value) => Outcome::Value(f(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Both,
    LeftOnly,
    RightOnly,
}

impl Presence {
    pub fn from_sides(left: bool, right: bool) -> Option<Self> {
        match (left, right) {
            (true, true) => Some(Presence::Both),
            (true, false) => Some(Presence::LeftOnly),
            (false, true) => Some(Presence::RightOnly),
            (false, false) => None,
        }
    }
}

/// One row of a comparison: everything known about a relative path on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub relative_path: PathBuf,
    pub present_left: bool,
    pub present_right: bool,
    pub size_left: Option<u64>,
    pub size_right: Option<u64>,
    pub mtime_left: Option<i64>,
    pub mtime_right: Option<i64>,
    pub size_mismatch: bool,
    pub time_mismatch: bool,
    pub code_match: Outcome<bool>,
    pub link_failures_left: Outcome<usize>,
    pub link_failures_right: Outcome<usize>,
    /// One flag per ancestor directory: whether that directory exists on the other side.
    pub segment_matches: Vec<bool>,
}

impl TreeEntry {
    pub fn new(relative_path: impl Into<PathBuf>) -> Self {
        TreeEntry {
            relative_path: relative_path.into(),
            present_left: false,
            present_right: false,
            size_left: None,
            size_right: None,
            mtime_left: None,
            mtime_right: None,
            size_mismatch: false,
            time_mismatch: false,
            code_match: Outcome::NotApplicable,
            link_failures_left: Outcome::NotApplicable,
            link_failures_right: Outcome::NotApplicable,
            segment_matches: Vec::new(),
        }
    }

    pub fn presence(&self) -> Presence {
        match (self.present_left, self.present_right) {
            (true, false) => Presence::LeftOnly,
            (false, true) => Presence::RightOnly,
            _ => Presence::Both,
        }
    }

    pub fn is_present(&self, side: Side) -> bool {
        match side {
            Side::Left => self.present_left,
            Side::Right => self.present_right,
        }
    }

    pub fn size(&self, side: Side) -> Option<u64> {
        match side {
            Side::Left => self.size_left,
            Side::Right => self.size_right,
        }
    }

    pub fn mtime(&self, side: Side) -> Option<i64> {
        match side {
            Side::Left => self.mtime_left,
            Side::Right => self.mtime_right,
        }
    }

    pub fn link_failures(&self, side: Side) -> &Outcome<usize> {
        match side {
            Side::Left => &self.link_failures_left,
            Side::Right => &self.link_failures_right,
        }
    }

    /// Any drift at all: one-sided, metadata mismatch, content or link problems.
    pub fn has_drift(&self) -> bool {
        let links_failed =
            |outcome: &Outcome<usize>| matches!(outcome, Outcome::Value(n) if *n > 0);

        self.presence() != Presence::Both
            || self.size_mismatch
            || self.time_mismatch
            || self.code_match == Outcome::Value(false)
            || links_failed(&self.link_failures_left)
            || links_failed(&self.link_failures_right)
    }
}

/// Rows of a comparison in display order: the left tree's pre-order, then the
/// right-only paths in the right tree's pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonTable {
    entries: Vec<TreeEntry>,
    checks: Checks,
    complete: bool,
}

impl ComparisonTable {
    pub fn new(entries: Vec<TreeEntry>, checks: Checks, complete: bool) -> Self {
        ComparisonTable {
            entries,
            checks,
            complete,
        }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, relative_path: impl AsRef<Path>) -> Option<&TreeEntry> {
        let relative_path = relative_path.as_ref();

        self.entries
            .iter()
            .find(|entry| entry.relative_path == relative_path)
    }

    /// Which optional checks ran; decides the optional table columns.
    pub fn checks(&self) -> Checks {
        self.checks
    }

    /// False when the comparison was cancelled before both walks finished.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl<'t> IntoIterator for &'t ComparisonTable {
    type Item = &'t TreeEntry;
    type IntoIter = std::slice::Iter<'t, TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn presence_follows_sides() {
        let mut entry = TreeEntry::new("a.html");
        entry.present_left = true;
        assert_eq!(entry.presence(), Presence::LeftOnly);

        entry.present_right = true;
        assert_eq!(entry.presence(), Presence::Both);
        assert_eq!(Presence::from_sides(false, false), None);
    }

    #[test]
    fn drift_covers_every_annotation() {
        let mut entry = TreeEntry::new("a.html");
        entry.present_left = true;
        entry.present_right = true;
        entry.code_match = Outcome::Value(true);
        entry.link_failures_left = Outcome::Value(0);
        entry.link_failures_right = Outcome::Unavailable;
        assert!(!entry.has_drift());

        entry.link_failures_right = Outcome::Value(2);
        assert!(entry.has_drift());
    }

    #[test]
    fn outcome_value_and_map() {
        assert_eq!(Outcome::Value(3).map(|n| n * 2), Outcome::Value(6));
        assert_eq!(Outcome::<usize>::Unavailable.map(|n| n * 2), Outcome::Unavailable);
        assert_eq!(Outcome::Value(true).value(), Some(&true));
        assert!(!Outcome::<bool>::NotApplicable.is_applicable());
    }

    #[test]
    fn table_lookup_by_relative_path() {
        let table = ComparisonTable::new(
            vec![TreeEntry::new("img/logo.png"), TreeEntry::new("index.html")],
            Checks::empty(),
            true,
        );

        assert_eq!(table.len(), 2);
        assert!(table.get("index.html").is_some());
        assert!(table.get("other.html").is_none());
    }
}
