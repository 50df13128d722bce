//! Error types callers are expected to match on
//!
//! Plumbing code returns `anyhow::Result`; the types here describe the one failure
//! class that aborts a whole comparison: a root that cannot be used on one or both
//! sides.

use std::fmt;
use thiserror::Error;

/// Which of the two compared trees something refers to.
///
/// The left tree is the production site, the right tree the development copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "PROD.",
            Side::Right => "DEV.",
        }
    }

    pub fn other(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootProblem {
    Missing,
    NotADirectory,
    NotAFile,
    Unreachable(String),
}

impl fmt::Display for RootProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootProblem::Missing => write!(f, "does not exist"),
            RootProblem::NotADirectory => write!(f, "does not point to a directory"),
            RootProblem::NotAFile => write!(f, "does not point to a file"),
            RootProblem::Unreachable(reason) => write!(f, "is unreachable: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{side} path {root:?} {problem}")]
pub struct ConfigurationError {
    pub side: Side,
    pub root: String,
    pub problem: RootProblem,
}

impl ConfigurationError {
    pub fn new(side: Side, root: impl Into<String>, problem: RootProblem) -> Self {
        ConfigurationError {
            side,
            root: root.into(),
            problem,
        }
    }
}

/// Every configuration error found before a comparison was started.
///
/// Both sides are always checked, so a failure may name one or two sides.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct CompareFailure {
    errors: Vec<ConfigurationError>,
}

impl CompareFailure {
    pub fn new(errors: Vec<ConfigurationError>) -> Self {
        CompareFailure { errors }
    }

    pub fn errors(&self) -> &[ConfigurationError] {
        &self.errors
    }

    pub fn failed_sides(&self) -> Vec<Side> {
        self.errors.iter().map(|error| error.side).collect()
    }

    pub fn names_side(&self, side: Side) -> bool {
        self.errors.iter().any(|error| error.side == side)
    }
}

impl fmt::Display for CompareFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self
            .errors
            .iter()
            .map(|error| error.to_string())
            .collect::<Vec<_>>();
        write!(f, "{}", messages.join("\n"))
    }
}
