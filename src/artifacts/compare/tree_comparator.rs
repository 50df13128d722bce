use crate::areas::site::{SiteProvider, SiteStat};
use crate::artifacts::classify::ExtensionClassifier;
use crate::artifacts::compare::cancellation::CancellationToken;
use crate::artifacts::compare::tree_entry::{ComparisonTable, Outcome, TreeEntry};
use crate::artifacts::diff::compare_texts;
use crate::artifacts::links::{LinkScanner, LinkValidator};
use crate::config::DEFAULT_COLUMN_WIDTH;
use crate::errors::{CompareFailure, ConfigurationError, RootProblem, Side};
use bitflags::bitflags;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct Checks: u8 {
        const CONTENT = 0b01;
        const LINKS = 0b10;
    }
}

#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub checks: Checks,
    pub classifier: ExtensionClassifier,
    pub column_width: usize,
    pub link_workers: usize,
    pub cancel: Option<CancellationToken>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            checks: Checks::empty(),
            classifier: ExtensionClassifier::default(),
            column_width: DEFAULT_COLUMN_WIDTH,
            link_workers: 1,
            cancel: None,
        }
    }
}

impl CompareOptions {
    pub fn with_checks(checks: Checks) -> Self {
        CompareOptions {
            checks,
            ..Self::default()
        }
    }
}

/// One side of a comparison.
#[derive(Clone, Copy)]
struct Tree<'t> {
    side: Side,
    provider: &'t dyn SiteProvider,
    root: &'t Path,
}

impl Tree<'_> {
    fn full_path(&self, relative: &Path) -> PathBuf {
        if relative.as_os_str().is_empty() {
            self.root.to_path_buf()
        } else {
            self.root.join(relative)
        }
    }

    fn check_root(&self) -> Option<ConfigurationError> {
        let problem = if !self.provider.exists(self.root) {
            RootProblem::Missing
        } else if !self.provider.is_directory(self.root) {
            RootProblem::NotADirectory
        } else {
            return None;
        };

        Some(ConfigurationError::new(
            self.side,
            self.root.display().to_string(),
            problem,
        ))
    }
}

#[derive(Default)]
struct WalkState {
    processed: HashSet<PathBuf>,
    entries: Vec<TreeEntry>,
    cancelled: bool,
}

/// Walks two site trees and annotates every file path found on either side.
pub struct TreeComparator<'c> {
    options: CompareOptions,
    validator: &'c dyn LinkValidator,
    scanner: Option<LinkScanner>,
}

impl<'c> TreeComparator<'c> {
    pub fn new(options: CompareOptions, validator: &'c dyn LinkValidator) -> anyhow::Result<Self> {
        let scanner = if options.checks.contains(Checks::LINKS) {
            Some(LinkScanner::new(options.link_workers)?)
        } else {
            None
        };

        Ok(TreeComparator {
            options,
            validator,
            scanner,
        })
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Compare the tree under `root_left` with the tree under `root_right`.
    ///
    /// Both roots are validated before anything else is touched; if either is
    /// unusable the comparison does not start and every failing side is reported.
    pub fn compare(
        &self,
        left: &dyn SiteProvider,
        right: &dyn SiteProvider,
        root_left: &Path,
        root_right: &Path,
    ) -> Result<ComparisonTable, CompareFailure> {
        let trees = [
            Tree {
                side: Side::Left,
                provider: left,
                root: root_left,
            },
            Tree {
                side: Side::Right,
                provider: right,
                root: root_right,
            },
        ];

        let errors = trees.iter().filter_map(Tree::check_root).collect::<Vec<_>>();
        if !errors.is_empty() {
            for error in &errors {
                tracing::warn!("{error}");
            }
            return Err(CompareFailure::new(errors));
        }

        tracing::info!(
            left = %left.location(),
            right = %right.location(),
            checks = ?self.options.checks,
            "comparing {} with {}",
            root_left.display(),
            root_right.display()
        );

        let mut state = WalkState::default();
        for side in [Side::Left, Side::Right] {
            self.walk(&trees, side, Path::new(""), &mut state);
            if state.cancelled {
                break;
            }
        }

        let complete = !state.cancelled;
        tracing::info!(rows = state.entries.len(), complete, "comparison finished");

        Ok(ComparisonTable::new(
            state.entries,
            self.options.checks,
            complete,
        ))
    }

    fn is_cancelled(&self) -> bool {
        self.options
            .cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    fn walk(&self, trees: &[Tree; 2], side: Side, relative_dir: &Path, state: &mut WalkState) {
        let this = select(trees, side);
        let dir = this.full_path(relative_dir);

        let mut names = match this.provider.list(&dir) {
            Ok(names) => names,
            Err(error) => {
                tracing::warn!(side = %side, dir = %dir.display(), "skipping directory: {error:#}");
                return;
            }
        };
        names.sort();

        for name in names {
            if self.is_cancelled() {
                tracing::info!("comparison cancelled");
                state.cancelled = true;
                return;
            }

            let relative = relative_dir.join(&name);
            let path = this.full_path(&relative);
            if this.provider.is_directory(&path) {
                if this.provider.is_link(&path) {
                    tracing::debug!(
                        side = %side,
                        path = %path.display(),
                        "not following linked directory"
                    );
                    continue;
                }
                self.walk(trees, side, &relative, state);
                if state.cancelled {
                    return;
                }
                continue;
            }

            if !state.processed.insert(relative.clone()) {
                continue;
            }

            let entry = self.build_entry(trees, side, relative);
            state.entries.push(entry);
        }
    }

    fn build_entry(&self, trees: &[Tree; 2], found_on: Side, relative: PathBuf) -> TreeEntry {
        let [left, right] = trees;
        let mut entry = TreeEntry::new(relative);

        let (present_left, stat_left) = look_up(left, &entry.relative_path, found_on == Side::Left);
        let (present_right, stat_right) =
            look_up(right, &entry.relative_path, found_on == Side::Right);

        entry.present_left = present_left;
        entry.present_right = present_right;
        entry.size_left = stat_left.map(|stat| stat.size);
        entry.size_right = stat_right.map(|stat| stat.size);
        entry.mtime_left = stat_left.map(|stat| stat.mtime);
        entry.mtime_right = stat_right.map(|stat| stat.mtime);

        if let (Some(l), Some(r)) = (stat_left, stat_right) {
            entry.size_mismatch = l.size != r.size;
            entry.time_mismatch = l.mtime != r.mtime;
        }

        entry.segment_matches = self.segment_matches(trees, &entry);

        let eligible = self.options.classifier.is_code_path(&entry.relative_path);
        let both = present_left && present_right;
        let wants_content = self.options.checks.contains(Checks::CONTENT) && eligible && both;
        let wants_links = self.scanner.is_some() && eligible;

        let text_left = if wants_content || (wants_links && present_left) {
            read_text(left, &entry.relative_path)
        } else {
            Outcome::NotApplicable
        };
        let text_right = if wants_content || (wants_links && present_right) {
            read_text(right, &entry.relative_path)
        } else {
            Outcome::NotApplicable
        };

        entry.code_match = match (&text_left, &text_right) {
            _ if !wants_content => Outcome::NotApplicable,
            (Outcome::Value(l), Outcome::Value(r)) => {
                Outcome::Value(compare_texts(l, r, self.options.column_width).identical)
            }
            _ => Outcome::Unavailable,
        };

        if wants_links {
            entry.link_failures_left = self.count_link_failures(&text_left, &entry.relative_path);
            entry.link_failures_right =
                self.count_link_failures(&text_right, &entry.relative_path);
        }

        tracing::debug!(
            path = %entry.relative_path.display(),
            presence = ?entry.presence(),
            size_mismatch = entry.size_mismatch,
            time_mismatch = entry.time_mismatch,
            code_match = ?entry.code_match,
            "compared entry"
        );

        entry
    }

    fn segment_matches(&self, trees: &[Tree; 2], entry: &TreeEntry) -> Vec<bool> {
        let ancestors = entry
            .relative_path
            .parent()
            .map(|parent| {
                let mut prefixes = parent
                    .ancestors()
                    .filter(|prefix| !prefix.as_os_str().is_empty())
                    .collect::<Vec<_>>();
                prefixes.reverse();
                prefixes
            })
            .unwrap_or_default();

        let missing_side = match (entry.present_left, entry.present_right) {
            (true, false) => Side::Right,
            (false, true) => Side::Left,
            _ => return vec![true; ancestors.len()],
        };

        let other = select(trees, missing_side);
        ancestors
            .into_iter()
            .map(|prefix| other.provider.is_directory(&other.full_path(prefix)))
            .collect()
    }

    fn count_link_failures(&self, text: &Outcome<String>, relative: &Path) -> Outcome<usize> {
        let Some(scanner) = &self.scanner else {
            return Outcome::NotApplicable;
        };

        match text {
            Outcome::Value(text) => match scanner.count_failures(text, self.validator) {
                Ok(failures) => Outcome::Value(failures),
                Err(error) => {
                    tracing::warn!(path = %relative.display(), "link check failed: {error:#}");
                    Outcome::Unavailable
                }
            },
            Outcome::Unavailable => Outcome::Unavailable,
            Outcome::NotApplicable => Outcome::NotApplicable,
        }
    }
}

fn select<'a, 't>(trees: &'a [Tree<'t>; 2], side: Side) -> &'a Tree<'t> {
    match side {
        Side::Left => &trees[0],
        Side::Right => &trees[1],
    }
}

/// Presence and metadata of `relative` on one side. The side the path was listed
/// on is present by construction; the other side is asked.
fn look_up(tree: &Tree, relative: &Path, listed: bool) -> (bool, Option<SiteStat>) {
    let path = tree.full_path(relative);

    match tree.provider.stat(&path) {
        Ok(Some(stat)) => (true, Some(stat)),
        Ok(None) => (listed, None),
        Err(error) => {
            tracing::warn!(
                side = %tree.side,
                path = %relative.display(),
                "metadata unavailable: {error:#}"
            );
            (listed || tree.provider.is_file(&path), None)
        }
    }
}

fn read_text(tree: &Tree, relative: &Path) -> Outcome<String> {
    match tree.provider.read_to_string(&tree.full_path(relative)) {
        Ok(text) => Outcome::Value(text),
        Err(error) => {
            tracing::warn!(
                side = %tree.side,
                path = %relative.display(),
                "content unavailable: {error:#}"
            );
            Outcome::Unavailable
        }
    }
}
