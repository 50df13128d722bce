use crate::common::site::{RecordingSite, ScriptedValidator};
use pretty_assertions::assert_eq;
use sitecmp::artifacts::compare::{CompareOptions, TreeComparator};
use sitecmp::errors::{RootProblem, Side};
use std::path::Path;

#[test]
fn reject_missing_left_root_without_walking_it() -> Result<(), Box<dyn std::error::Error>> {
    let prod = RecordingSite::default();
    let dev = RecordingSite::rooted("/dev").file("/dev/index.html", "<p/>", 1);
    let validator = ScriptedValidator::default();

    let comparator = TreeComparator::new(CompareOptions::default(), &validator)?;
    let result = comparator.compare(&prod, &dev, Path::new("/prod"), Path::new("/dev"));

    let failure = match result {
        Ok(table) => panic!("expected a configuration error, got {} rows", table.len()),
        Err(failure) => failure,
    };
    assert_eq!(failure.failed_sides(), vec![Side::Left]);
    assert_eq!(failure.errors()[0].problem, RootProblem::Missing);
    assert_eq!(prod.calls(), vec!["exists /prod"]);
    assert!(!dev.calls().iter().any(|call| call.starts_with("list")));

    Ok(())
}

#[test]
fn report_both_unusable_roots() -> Result<(), Box<dyn std::error::Error>> {
    let prod = RecordingSite::rooted("/prod").file("/prod/site.html", "x", 1);
    let dev = RecordingSite::default();
    let validator = ScriptedValidator::default();

    let comparator = TreeComparator::new(CompareOptions::default(), &validator)?;
    let failure = comparator
        .compare(&prod, &dev, Path::new("/prod/site.html"), Path::new("/dev"))
        .err()
        .ok_or("both roots should be rejected")?;

    assert_eq!(failure.failed_sides(), vec![Side::Left, Side::Right]);
    assert_eq!(failure.errors()[0].problem, RootProblem::NotADirectory);
    assert_eq!(failure.errors()[1].problem, RootProblem::Missing);

    Ok(())
}
