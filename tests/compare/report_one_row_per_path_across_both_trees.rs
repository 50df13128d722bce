use crate::common::command::sites_dir;
use crate::common::file::{FileSpec, set_mtime, write_file};
use crate::common::site::ScriptedValidator;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sitecmp::areas::local_site::LocalSite;
use sitecmp::artifacts::compare::{CompareOptions, Presence, TreeComparator};

#[rstest]
fn report_one_row_per_path_across_both_trees(
    sites_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let prod = sites_dir.path().join("prod");
    let dev = sites_dir.path().join("dev");

    for (path, content) in [
        (prod.join("index.html"), "<h1>Home</h1>\n"),
        (prod.join("img").join("logo.png"), "PNG"),
        (dev.join("index.html"), "<h1>Home, reworked</h1>\n"),
        (dev.join("other.html"), "<p>new page</p>\n"),
    ] {
        write_file(FileSpec::new(path.clone(), content.to_string()));
        set_mtime(&path, 1_700_000_000, 0);
    }

    let validator = ScriptedValidator::default();
    let comparator = TreeComparator::new(CompareOptions::default(), &validator)?;
    let table = comparator.compare(&LocalSite::new(), &LocalSite::new(), &prod, &dev)?;

    let rows = table
        .iter()
        .map(|entry| (entry.relative_path.display().to_string(), entry.presence()))
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        vec![
            ("img/logo.png".to_string(), Presence::LeftOnly),
            ("index.html".to_string(), Presence::Both),
            ("other.html".to_string(), Presence::RightOnly),
        ]
    );

    let index = table.get("index.html").ok_or("index.html row is missing")?;
    assert!(index.size_mismatch);
    assert!(!index.time_mismatch);
    assert_eq!(index.size_left, Some(14));
    assert_eq!(index.size_right, Some(24));

    let logo = table.get("img/logo.png").ok_or("logo row is missing")?;
    assert_eq!(logo.size_right, None);
    assert_eq!(logo.mtime_right, None);
    assert_eq!(logo.segment_matches, vec![false]);

    Ok(())
}
