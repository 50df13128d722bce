//! Site abstraction
//!
//! A site is a rooted tree of directories and files. The comparator only ever talks
//! to a site through [`SiteProvider`], so local and remote trees are compared the
//! same way. Paths handed to a provider are full paths in that provider's namespace
//! (the root joined with a relative path).

use crate::areas::ftp_site::{FtpSite, FtpTarget};
use crate::areas::local_site::LocalSite;
use crate::config::Settings;
use crate::errors::RootProblem;
use anyhow::Context;
use derive_new::new;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Size and whole-second modification time of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct SiteStat {
    pub size: u64,
    pub mtime: i64,
}

pub trait SiteProvider {
    /// Human-readable location, used in logs and report headers.
    fn location(&self) -> String;

    /// Names of the direct children of `dir`.
    fn list(&self, dir: &Path) -> anyhow::Result<Vec<String>>;

    fn is_directory(&self, path: &Path) -> bool;

    /// Whether `path` itself is a symbolic link. Linked directories are not walked.
    fn is_link(&self, _path: &Path) -> bool {
        false
    }

    fn exists(&self, path: &Path) -> bool;

    /// `Ok(None)` when there is no file at `path`.
    fn stat(&self, path: &Path) -> anyhow::Result<Option<SiteStat>>;

    fn open_read(&self, path: &Path) -> anyhow::Result<Box<dyn Read + '_>>;

    fn read_to_string(&self, path: &Path) -> anyhow::Result<String> {
        let mut bytes = Vec::new();
        self.open_read(path)?
            .read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        String::from_utf8(bytes)
            .with_context(|| format!("File is not valid UTF-8: {}", path.display()))
    }

    /// A file is present when something exists at `path` and it is not a directory.
    fn is_file(&self, path: &Path) -> bool {
        self.exists(path) && !self.is_directory(path)
    }
}

/// A CLI site argument: a local path or an `ftp://` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSpec {
    Local(PathBuf),
    Ftp(FtpTarget),
}

impl SiteSpec {
    pub fn parse(spec: &str) -> anyhow::Result<Self> {
        if spec.starts_with("ftp://") {
            Ok(SiteSpec::Ftp(FtpTarget::parse(spec)?))
        } else {
            Ok(SiteSpec::Local(PathBuf::from(spec.replace('\\', "/"))))
        }
    }
}

/// A connected site and the root to compare from.
pub struct OpenSite {
    pub provider: Box<dyn SiteProvider>,
    pub root: PathBuf,
}

impl OpenSite {
    /// Open the site behind `spec`. Connection problems are reported as an
    /// unreachable root; whether the root exists is checked by the comparator.
    pub fn open(spec: &str, settings: &Settings) -> Result<Self, RootProblem> {
        let spec = SiteSpec::parse(spec).map_err(|e| RootProblem::Unreachable(e.to_string()))?;

        match spec {
            SiteSpec::Local(root) => Ok(OpenSite {
                provider: Box::new(LocalSite::new()),
                root,
            }),
            SiteSpec::Ftp(target) => {
                let root = PathBuf::from(&target.path);
                let site = FtpSite::connect(&target, &settings.ftp)
                    .map_err(|e| RootProblem::Unreachable(format!("{e:#}")))?;

                Ok(OpenSite {
                    provider: Box::new(site),
                    root,
                })
            }
        }
    }
}
