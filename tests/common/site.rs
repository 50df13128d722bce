use sitecmp::areas::site::{SiteProvider, SiteStat};
use sitecmp::artifacts::links::{LinkStatus, LinkValidator};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};

/// In-memory site that records every call made against it.
#[derive(Debug, Default)]
pub struct RecordingSite {
    files: BTreeMap<PathBuf, (Vec<u8>, i64)>,
    dirs: BTreeSet<PathBuf>,
    unreadable: HashSet<PathBuf>,
    calls: RefCell<Vec<String>>,
}

impl RecordingSite {
    pub fn rooted(root: &str) -> Self {
        let mut site = RecordingSite::default();
        site.dirs.insert(PathBuf::from(root));
        site
    }

    pub fn file(mut self, path: &str, content: &str, mtime: i64) -> Self {
        let path = PathBuf::from(path);
        for dir in path.ancestors().skip(1) {
            if dir.as_os_str().len() > 1 {
                self.dirs.insert(dir.to_path_buf());
            }
        }
        self.files.insert(path, (content.as_bytes().to_vec(), mtime));
        self
    }

    /// The file lists and stats fine but every read fails.
    pub fn unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(PathBuf::from(path));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: &str, path: &Path) {
        self.calls
            .borrow_mut()
            .push(format!("{call} {}", path.display()));
    }
}

impl SiteProvider for RecordingSite {
    fn location(&self) -> String {
        "recording".to_string()
    }

    fn list(&self, dir: &Path) -> anyhow::Result<Vec<String>> {
        self.record("list", dir);
        Ok(self
            .files
            .keys()
            .chain(self.dirs.iter())
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.record("is_directory", path);
        self.dirs.contains(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.record("exists", path);
        self.dirs.contains(path) || self.files.contains_key(path)
    }

    fn stat(&self, path: &Path) -> anyhow::Result<Option<SiteStat>> {
        self.record("stat", path);
        Ok(self
            .files
            .get(path)
            .map(|(content, mtime)| SiteStat::new(content.len() as u64, *mtime)))
    }

    fn open_read(&self, path: &Path) -> anyhow::Result<Box<dyn Read + '_>> {
        self.record("open_read", path);
        if self.unreadable.contains(path) {
            anyhow::bail!("permission denied: {}", path.display());
        }
        match self.files.get(path) {
            Some((content, _)) => Ok(Box::new(content.as_slice())),
            None => anyhow::bail!("no such file: {}", path.display()),
        }
    }
}

/// Answers from a fixed table; unknown URLs are network errors.
#[derive(Debug, Default)]
pub struct ScriptedValidator {
    codes: HashMap<String, u16>,
}

impl ScriptedValidator {
    pub fn with(mut self, url: &str, code: u16) -> Self {
        self.codes.insert(url.to_string(), code);
        self
    }
}

impl LinkValidator for ScriptedValidator {
    fn check(&self, url: &str) -> anyhow::Result<LinkStatus> {
        match self.codes.get(url) {
            Some(code) => Ok(LinkStatus::from_code(*code)),
            None => Ok(LinkStatus::network_error("no route to host")),
        }
    }
}
