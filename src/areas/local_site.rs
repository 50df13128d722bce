use crate::areas::site::{SiteProvider, SiteStat};
use anyhow::Context;
use filetime::FileTime;
use std::io::{BufReader, Read};
use std::path::Path;
use walkdir::WalkDir;

/// A site on the local filesystem; paths are used as given.
#[derive(Debug, Default)]
pub struct LocalSite;

impl LocalSite {
    pub fn new() -> Self {
        LocalSite
    }
}

impl SiteProvider for LocalSite {
    fn location(&self) -> String {
        "local filesystem".to_string()
    }

    fn list(&self, dir: &Path) -> anyhow::Result<Vec<String>> {
        if !dir.is_dir() {
            anyhow::bail!("The specified path is not a directory: {:?}", dir);
        }

        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| {
                let entry =
                    entry.with_context(|| format!("Failed to list directory: {:?}", dir))?;
                Ok(entry.file_name().to_string_lossy().into_owned())
            })
            .collect()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_link(&self, path: &Path) -> bool {
        path.symlink_metadata()
            .is_ok_and(|metadata| metadata.file_type().is_symlink())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn stat(&self, path: &Path) -> anyhow::Result<Option<SiteStat>> {
        if !path.exists() {
            return Ok(None);
        }

        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to get metadata for file: {:?}", path))?;
        if metadata.is_dir() {
            return Ok(None);
        }

        let mtime = FileTime::from_last_modification_time(&metadata).unix_seconds();

        Ok(Some(SiteStat::new(metadata.len(), mtime)))
    }

    fn open_read(&self, path: &Path) -> anyhow::Result<Box<dyn Read + '_>> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open file: {:?}", path))?;

        Ok(Box::new(BufReader::new(file)))
    }
}
