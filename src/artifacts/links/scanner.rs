use crate::artifacts::links::validator::{LinkStatus, LinkValidator};
use rayon::prelude::*;
use regex::Regex;

/// `http://` or `https://` up to whitespace, a quote, or a bracket.
const URL_REGEX: &str = r#"https?://[^\s"'<>()\[\]{}]+"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundLink {
    /// 1-based line the URL was found on
    pub line: usize,
    pub url: String,
}

#[derive(Debug)]
pub struct LinkScanner {
    pattern: Regex,
    pool: rayon::ThreadPool,
}

impl LinkScanner {
    /// `workers` bounds how many URLs are validated at the same time.
    pub fn new(workers: usize) -> anyhow::Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|idx| format!("sitecmp-links-{idx}"))
            .build()?;

        Ok(LinkScanner {
            pattern: Regex::new(URL_REGEX)?,
            pool,
        })
    }

    pub fn find_links(&self, text: &str) -> Vec<FoundLink> {
        text.lines()
            .enumerate()
            .flat_map(|(idx, line)| {
                self.pattern.find_iter(line).map(move |found| FoundLink {
                    line: idx + 1,
                    url: found.as_str().to_string(),
                })
            })
            .collect()
    }

    /// Validate every link in `text`, returning each link with its status in
    /// document order.
    pub fn check_links(
        &self,
        text: &str,
        validator: &dyn LinkValidator,
    ) -> anyhow::Result<Vec<(FoundLink, LinkStatus)>> {
        let links = self.find_links(text);

        let statuses = self.pool.install(|| {
            links
                .par_iter()
                .map(|link| validator.check(&link.url))
                .collect::<anyhow::Result<Vec<_>>>()
        })?;

        Ok(links.into_iter().zip(statuses).collect())
    }

    pub fn count_failures(
        &self,
        text: &str,
        validator: &dyn LinkValidator,
    ) -> anyhow::Result<usize> {
        let checked = self.check_links(text, validator)?;

        Ok(checked
            .iter()
            .filter(|(_, status)| status.is_failure())
            .count())
    }
}
