use crate::config::LinkSettings;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkClass {
    Ok,
    Redirect,
    ClientError,
    AccessDenied,
    Broken,
    NetworkError,
}

/// Result of checking one URL.
///
/// A request that never produced a response has no status code at all, so a
/// network failure can never be confused with a real HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStatus {
    pub status_code: Option<u16>,
    pub class: LinkClass,
    pub detail: Option<String>,
}

impl LinkStatus {
    pub fn from_code(code: u16) -> Self {
        let class = match code {
            0..=299 => LinkClass::Ok,
            300..=399 => LinkClass::Redirect,
            400 => LinkClass::ClientError,
            401..=403 => LinkClass::AccessDenied,
            _ => LinkClass::Broken,
        };

        LinkStatus {
            status_code: Some(code),
            class,
            detail: None,
        }
    }

    pub fn network_error(detail: impl Into<String>) -> Self {
        LinkStatus {
            status_code: None,
            class: LinkClass::NetworkError,
            detail: Some(detail.into()),
        }
    }

    /// Client/server errors and network errors count as failures.
    pub fn is_failure(&self) -> bool {
        !matches!(self.class, LinkClass::Ok | LinkClass::Redirect)
    }

    pub fn describe(&self) -> String {
        let code = self
            .status_code
            .map(|code| code.to_string())
            .unwrap_or_default();

        match self.class {
            LinkClass::Ok => format!("working (code: {code})"),
            LinkClass::Redirect => format!("working and redirecting (code: {code})"),
            LinkClass::ClientError => format!("working, Bad Request (code: {code})"),
            LinkClass::AccessDenied => format!("working, but denied access (code: {code})"),
            LinkClass::Broken => format!("broken (code: {code})"),
            LinkClass::NetworkError => format!(
                "giving a connection error: {}",
                self.detail.as_deref().unwrap_or("request failed")
            ),
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Checks whether a single URL is reachable.
///
/// `Err` means the validator itself could not do its job; an unreachable URL is an
/// `Ok(LinkStatus)` with [`LinkClass::NetworkError`].
pub trait LinkValidator: Send + Sync {
    fn check(&self, url: &str) -> anyhow::Result<LinkStatus>;
}

/// HEAD-request validator following a bounded number of redirects.
#[derive(Debug, Clone)]
pub struct HttpLinkValidator {
    client: reqwest::blocking::Client,
}

impl HttpLinkValidator {
    pub fn new(settings: &LinkSettings) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(settings.max_redirects))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(HttpLinkValidator { client })
    }
}

impl LinkValidator for HttpLinkValidator {
    fn check(&self, url: &str) -> anyhow::Result<LinkStatus> {
        let status = match self.client.head(url).send() {
            Ok(response) => LinkStatus::from_code(response.status().as_u16()),
            Err(error) => LinkStatus::network_error(error.to_string()),
        };

        tracing::debug!(url, status = ?status.status_code, class = ?status.class, "checked link");
        Ok(status)
    }
}
