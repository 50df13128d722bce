//! Runtime settings
//!
//! Settings come from an optional TOML file; every key has a default so an empty or
//! absent file is valid. CLI flags are applied on top by the binary.
//!
//! ```toml
//! extensions = [".html", ".css", ".js"]
//! column_width = 120
//!
//! [links]
//! timeout_secs = 5
//! workers = 8
//!
//! [ftp]
//! timeout_secs = 60
//! ```

use crate::artifacts::classify::DEFAULT_EXTENSIONS;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "sitecmp.toml";
pub const DEFAULT_COLUMN_WIDTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub extensions: Vec<String>,
    pub column_width: usize,
    pub links: LinkSettings,
    pub ftp: FtpSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkSettings {
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub workers: usize,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FtpSettings {
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let mut extensions = DEFAULT_EXTENSIONS
            .iter()
            .map(|ext| ext.to_string())
            .collect::<Vec<_>>();
        extensions.sort();

        Settings {
            extensions,
            column_width: DEFAULT_COLUMN_WIDTH,
            links: LinkSettings::default(),
            ftp: FtpSettings::default(),
        }
    }
}

impl Default for LinkSettings {
    fn default() -> Self {
        LinkSettings {
            timeout_secs: 10,
            max_redirects: 10,
            workers: 4,
            user_agent: format!("sitecmp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for FtpSettings {
    fn default() -> Self {
        FtpSettings { timeout_secs: 30 }
    }
}

impl Settings {
    /// Load settings from `path`, or from `sitecmp.toml` in the working directory when
    /// no path is given and that file exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Settings::default(),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.column_width == 0 {
            anyhow::bail!("column_width must be at least 1");
        }
        if self.links.workers == 0 {
            anyhow::bail!("links.workers must be at least 1");
        }
        if self.extensions.is_empty() {
            anyhow::bail!("extensions must list at least one extension");
        }
        if self.extensions.iter().any(|ext| ext.trim().is_empty()) {
            anyhow::bail!("extensions must not contain empty entries");
        }

        Ok(())
    }
}
