use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

/// A scratch directory holding a `prod` and a `dev` site.
#[fixture]
pub fn sites_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::create_dir_all(dir.path().join("prod")).expect("Failed to create prod site");
    std::fs::create_dir_all(dir.path().join("dev")).expect("Failed to create dev site");
    dir
}

pub fn run_sitecmp_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("sitecmp").expect("Failed to find sitecmp binary");
    cmd.envs(vec![("NO_PAGER", "1"), ("NO_COLOR", "1"), ("CLICOLOR", "0")]);
    cmd.env_remove("SITECMP_LOG");
    cmd.env_remove("RUST_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}
