use crate::common::command::sites_dir;
use crate::common::file::{set_mtime, write_generated_files};
use crate::common::site::ScriptedValidator;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sitecmp::areas::local_site::LocalSite;
use sitecmp::artifacts::compare::{Checks, CompareOptions, TreeComparator};
use std::collections::HashSet;

#[rstest]
fn produce_identical_tables_for_unchanged_trees(
    sites_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let prod = sites_dir.path().join("prod");
    let dev = sites_dir.path().join("dev");

    let mut written = write_generated_files(&prod.join("pages"), 4, "html");
    written.extend(write_generated_files(&prod.join("pages").join("nested"), 2, "css"));
    written.extend(write_generated_files(&dev.join("pages"), 3, "html"));
    written.extend(write_generated_files(&dev, 2, "txt"));
    for file in &written {
        set_mtime(&file.path, 1_600_000_000, 0);
    }

    let validator = ScriptedValidator::default();
    let comparator =
        TreeComparator::new(CompareOptions::with_checks(Checks::CONTENT), &validator)?;
    let site = LocalSite::new();

    let first = comparator.compare(&site, &site, &prod, &dev)?;
    let second = comparator.compare(&site, &site, &prod, &dev)?;

    assert_eq!(first, second);

    let expected = written
        .iter()
        .filter_map(|file| {
            file.path
                .strip_prefix(&prod)
                .or_else(|_| file.path.strip_prefix(&dev))
                .ok()
                .map(|relative| relative.to_path_buf())
        })
        .collect::<HashSet<_>>();
    assert_eq!(first.len(), expected.len());

    let unique = first
        .iter()
        .map(|entry| entry.relative_path.clone())
        .collect::<HashSet<_>>();
    assert_eq!(unique.len(), first.len());

    Ok(())
}
