//! Report output
//!
//! Comparison tables and side-by-side diffs easily outgrow a screen. [`ReportSink`]
//! decides once per run whether a report is paged through `minus` or written
//! straight to stdout, and hands commands a plain `Write` either way.

use derive_new::new;
use is_terminal::IsTerminal;
use minus::Pager;
use std::ffi::OsString;
use std::io::{self, Write};

const NO_PAGER_ENV: &str = "NO_PAGER";

/// Paging applies only to an interactive stdout, and `NO_PAGER` (any value) turns it off.
pub fn wants_pager(stdout_is_terminal: bool, no_pager: Option<OsString>) -> bool {
    stdout_is_terminal && no_pager.is_none()
}

pub enum ReportSink {
    Pager(Pager),
    Stdout,
}

impl ReportSink {
    pub fn detect() -> Self {
        if wants_pager(
            io::stdout().is_terminal(),
            std::env::var_os(NO_PAGER_ENV),
        ) {
            ReportSink::Pager(Pager::new())
        } else {
            ReportSink::Stdout
        }
    }

    pub fn writer(&self) -> Box<dyn Write> {
        match self {
            ReportSink::Pager(pager) => Box::new(PagerWriter::new(pager.clone())),
            ReportSink::Stdout => Box::new(io::stdout()),
        }
    }

    /// Show the collected report. Blocks until the user leaves the pager.
    pub fn finish(self) -> anyhow::Result<()> {
        if let ReportSink::Pager(pager) = self {
            minus::page_all(pager)?;
        }
        Ok(())
    }
}

/// `Write` adapter over a `minus` pager.
///
/// The pager takes `&str`, while table rows reach it in arbitrary byte chunks, so
/// a glyph cut between two writes is held back until its remaining bytes arrive.
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
    #[new(default)]
    pending: Vec<u8>,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);

        let checked = std::str::from_utf8(&self.pending).map(str::len);
        let complete = match checked {
            Ok(len) => len,
            // only the tail is cut short
            Err(error) if error.error_len().is_none() => error.valid_up_to(),
            Err(error) => {
                self.pending.truncate(self.pending.len() - buf.len());
                return Err(io::Error::new(io::ErrorKind::InvalidData, error));
            }
        };

        let text = std::str::from_utf8(&self.pending[..complete])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(text).map_err(io::Error::other)?;
        self.pending.drain(..complete);

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "report ends inside a UTF-8 sequence",
            ))
        }
    }
}
