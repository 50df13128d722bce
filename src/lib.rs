//! Site drift detection
//!
//! `sitecmp` compares a production site tree against a development copy and reports
//! what drifted between them: files missing on either side, size and modification
//! time mismatches, differing text content, and broken links inside text assets.
//!
//! The crate is split the same way the binary uses it:
//!
//! - `areas`: where the two trees live (local filesystem, FTP endpoint) and the
//!   `Session` that drives commands against them
//! - `artifacts`: the comparison engine (edit scripts, side-by-side rendering,
//!   tree comparison, link scanning)
//! - `commands`: presentation of engine results as terminal reports
//! - `config`, `errors`, `logging`: ambient plumbing

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
pub mod logging;
