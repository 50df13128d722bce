use crate::common::site::{RecordingSite, ScriptedValidator};
use pretty_assertions::assert_eq;
use sitecmp::artifacts::compare::{Checks, CompareOptions, Outcome, TreeComparator};
use std::path::Path;

#[test]
fn count_failing_links_per_side() -> Result<(), Box<dyn std::error::Error>> {
    let prod = RecordingSite::rooted("/prod").file(
        "/prod/links.html",
        concat!(
            "<a href=\"https://example.org/ok\">ok</a>\n",
            "<a href=\"https://example.org/missing\">missing</a>\n",
        ),
        10,
    );
    let dev = RecordingSite::rooted("/dev").file(
        "/dev/links.html",
        "<a href=\"https://example.org/ok\">ok</a>\n",
        10,
    );
    let validator = ScriptedValidator::default()
        .with("https://example.org/ok", 200)
        .with("https://example.org/missing", 404);

    let options = CompareOptions {
        link_workers: 2,
        ..CompareOptions::with_checks(Checks::LINKS)
    };
    let comparator = TreeComparator::new(options, &validator)?;
    let table = comparator.compare(&prod, &dev, Path::new("/prod"), Path::new("/dev"))?;

    let entry = table.get("links.html").ok_or("links.html row is missing")?;
    assert_eq!(entry.link_failures_left, Outcome::Value(1));
    assert_eq!(entry.link_failures_right, Outcome::Value(0));
    assert_eq!(entry.code_match, Outcome::NotApplicable);

    Ok(())
}

#[test]
fn network_errors_count_as_failures() -> Result<(), Box<dyn std::error::Error>> {
    let prod = RecordingSite::rooted("/prod").file(
        "/prod/app.js",
        "fetch('https://api.invalid/v1');\nfetch(\"https://example.org/ok\");\n",
        10,
    );
    let dev = RecordingSite::rooted("/dev");
    let validator = ScriptedValidator::default().with("https://example.org/ok", 301);

    let comparator =
        TreeComparator::new(CompareOptions::with_checks(Checks::LINKS), &validator)?;
    let table = comparator.compare(&prod, &dev, Path::new("/prod"), Path::new("/dev"))?;

    let entry = table.get("app.js").ok_or("app.js row is missing")?;
    assert_eq!(entry.link_failures_left, Outcome::Value(1));
    assert_eq!(entry.link_failures_right, Outcome::NotApplicable);

    Ok(())
}
