use crate::areas::session::Session;
use crate::areas::site::OpenSite;
use crate::artifacts::links::{FoundLink, LinkClass, LinkScanner, LinkStatus};
use colored::{Color, Colorize};
use std::io::Write;

#[derive(Debug, Clone)]
pub struct LinksOptions {
    pub path: String,
}

impl Session {
    /// Report every URL in one file together with its validation result.
    pub fn links(&self, opts: &LinksOptions) -> anyhow::Result<Vec<(FoundLink, LinkStatus)>> {
        let site = OpenSite::open(&opts.path, self.settings())
            .map_err(|problem| anyhow::anyhow!("Path {:?} {}", opts.path, problem))?;
        if !site.provider.is_file(&site.root) {
            anyhow::bail!("Path {:?} does not point to a file", opts.path);
        }

        let text = site.provider.read_to_string(&site.root)?;
        let scanner = LinkScanner::new(self.settings().links.workers)?;
        let checked = scanner.check_links(&text, self.validator())?;

        self.print_links(&checked)?;
        Ok(checked)
    }

    pub fn print_links(&self, checked: &[(FoundLink, LinkStatus)]) -> anyhow::Result<()> {
        if checked.is_empty() {
            writeln!(self.writer(), "No links found!")?;
            return Ok(());
        }

        for (link, status) in checked {
            writeln!(self.writer(), "URL found on line {}: {}", link.line, link.url)?;
            writeln!(self.writer(), "The URL above is {}", describe(status))?;
        }

        Ok(())
    }
}

fn describe(status: &LinkStatus) -> String {
    let color = match status.class {
        LinkClass::Ok | LinkClass::Redirect => Color::Green,
        LinkClass::ClientError | LinkClass::AccessDenied => Color::Yellow,
        LinkClass::Broken | LinkClass::NetworkError => Color::Red,
    };

    status.describe().color(color).to_string()
}
