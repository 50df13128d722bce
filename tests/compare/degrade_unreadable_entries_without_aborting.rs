use crate::common::site::{RecordingSite, ScriptedValidator};
use pretty_assertions::assert_eq;
use sitecmp::artifacts::compare::{Checks, CompareOptions, Outcome, TreeComparator};
use std::path::Path;

#[test]
fn degrade_unreadable_entries_without_aborting() -> Result<(), Box<dyn std::error::Error>> {
    let prod = RecordingSite::rooted("/prod")
        .file("/prod/a.html", "<p>a</p>\n", 1)
        .file("/prod/b.html", "<p>b</p>\n", 1)
        .file("/prod/c.html", "<p>c</p>\n", 1)
        .unreadable("/prod/b.html");
    let dev = RecordingSite::rooted("/dev")
        .file("/dev/a.html", "<p>a</p>\n", 1)
        .file("/dev/b.html", "<p>b</p>\n", 1)
        .file("/dev/c.html", "<p>C</p>\n", 1);
    let validator = ScriptedValidator::default();

    let comparator = TreeComparator::new(CompareOptions::with_checks(Checks::all()), &validator)?;
    let table = comparator.compare(&prod, &dev, Path::new("/prod"), Path::new("/dev"))?;

    let outcomes = table
        .iter()
        .map(|entry| {
            (
                entry.relative_path.display().to_string(),
                entry.code_match.clone(),
                entry.link_failures_left.clone(),
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(
        outcomes,
        vec![
            ("a.html".to_string(), Outcome::Value(true), Outcome::Value(0)),
            ("b.html".to_string(), Outcome::Unavailable, Outcome::Unavailable),
            ("c.html".to_string(), Outcome::Value(false), Outcome::Value(0)),
        ]
    );
    assert!(table.is_complete());

    Ok(())
}
