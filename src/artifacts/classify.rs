//! Text asset classification
//!
//! Only files whose name ends with an allowed extension get content and link checks.
//! Mirrored sites often carry a version fragment after the real name
//! (`report.html@v2`); everything from the first `@` on is ignored before matching.

use std::path::Path;

pub const DEFAULT_EXTENSIONS: phf::Set<&'static str> = phf::phf_set! {
    ".html", ".css", ".js", ".php", ".xml", ".ts", ".sql", ".json", ".py",
};

const VERSION_SEPARATOR: char = '@';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionClassifier {
    extensions: Vec<String>,
}

impl Default for ExtensionClassifier {
    fn default() -> Self {
        ExtensionClassifier::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl ExtensionClassifier {
    /// Extensions are matched case-insensitively; a missing leading dot is added.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| ext.len() > 1)
            .collect::<Vec<_>>();
        extensions.sort();
        extensions.dedup();

        ExtensionClassifier { extensions }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_code(&self, file_name: &str) -> bool {
        let name = strip_version_fragment(file_name).to_lowercase();

        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    /// Classify by the last component of `path`.
    pub fn is_code_path(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.is_code(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

pub fn strip_version_fragment(file_name: &str) -> &str {
    file_name
        .split_once(VERSION_SEPARATOR)
        .map(|(name, _)| name)
        .unwrap_or(file_name)
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();

    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}
