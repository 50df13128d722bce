use crate::common::command::sites_dir;
use crate::common::file::{FileSpec, write_file, write_mirrored};
use crate::common::site::ScriptedValidator;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sitecmp::areas::local_site::LocalSite;
use sitecmp::artifacts::compare::{CompareOptions, TreeComparator};
use std::os::unix::fs::symlink;

#[rstest]
fn skip_directories_reached_through_symlinks(
    sites_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let prod = sites_dir.path().join("prod");
    let dev = sites_dir.path().join("dev");

    write_mirrored(
        &[prod.as_path(), dev.as_path()],
        "index.html",
        "<p>home</p>\n",
        1_700_000_000,
    );
    write_file(FileSpec::new(prod.join("css").join("main.css"), "a {}\n".to_string()));
    symlink(&prod, prod.join("loop"))?;
    symlink(prod.join("css"), dev.join("css"))?;

    let validator = ScriptedValidator::default();
    let comparator = TreeComparator::new(CompareOptions::default(), &validator)?;
    let table = comparator.compare(&LocalSite::new(), &LocalSite::new(), &prod, &dev)?;

    let paths = table
        .iter()
        .map(|entry| entry.relative_path.display().to_string())
        .collect::<Vec<_>>();
    assert_eq!(paths, vec!["css/main.css", "index.html"]);

    Ok(())
}
