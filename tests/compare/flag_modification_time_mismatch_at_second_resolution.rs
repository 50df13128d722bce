use crate::common::command::sites_dir;
use crate::common::file::{FileSpec, set_mtime, write_file};
use crate::common::site::ScriptedValidator;
use assert_fs::TempDir;
use rstest::rstest;
use sitecmp::areas::local_site::LocalSite;
use sitecmp::artifacts::compare::{CompareOptions, TreeComparator};

#[rstest]
#[case(1_700_000_000, 100, 1_700_000_000, 900_000_000, false)]
#[case(1_700_000_000, 0, 1_700_000_001, 0, true)]
fn flag_modification_time_mismatch_at_second_resolution(
    sites_dir: TempDir,
    #[case] prod_seconds: i64,
    #[case] prod_nanos: u32,
    #[case] dev_seconds: i64,
    #[case] dev_nanos: u32,
    #[case] mismatch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let prod = sites_dir.path().join("prod").join("style.css");
    let dev = sites_dir.path().join("dev").join("style.css");
    write_file(FileSpec::new(prod.clone(), "body {}\n".to_string()));
    write_file(FileSpec::new(dev.clone(), "body {}\n".to_string()));
    set_mtime(&prod, prod_seconds, prod_nanos);
    set_mtime(&dev, dev_seconds, dev_nanos);

    let validator = ScriptedValidator::default();
    let comparator = TreeComparator::new(CompareOptions::default(), &validator)?;
    let table = comparator.compare(
        &LocalSite::new(),
        &LocalSite::new(),
        &sites_dir.path().join("prod"),
        &sites_dir.path().join("dev"),
    )?;

    let entry = table.get("style.css").ok_or("style.css row is missing")?;
    assert_eq!(entry.time_mismatch, mismatch);
    assert!(!entry.size_mismatch);

    Ok(())
}
