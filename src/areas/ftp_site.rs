//! Sites behind an FTP endpoint
//!
//! One control connection per site, passive-mode data connections per transfer.
//! Listing uses `NLST`, directory detection a `CWD` round trip, existence and size
//! `SIZE`, modification time `MDTM`, and content `RETR`.

use crate::areas::site::{SiteProvider, SiteStat};
use crate::config::FtpSettings;
use anyhow::Context;
use bytes::{Buf, Bytes};
use chrono::NaiveDateTime;
use std::cell::RefCell;
use std::fmt;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

const FTP_PORT: u16 = 21;
const ANONYMOUS_USER: &str = "anonymous";
const ANONYMOUS_PASSWORD: &str = "anonymous@";
const MDTM_FORMAT: &str = "%Y%m%d%H%M%S";

/// Where to connect, parsed from `ftp://[user[:password]@]host[:port][/path]`.
#[derive(Clone, PartialEq, Eq)]
pub struct FtpTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub path: String,
}

impl FtpTarget {
    pub fn parse(url: &str) -> anyhow::Result<Self> {
        let rest = url
            .strip_prefix("ftp://")
            .ok_or_else(|| anyhow::anyhow!("Not an ftp:// URL: {url}"))?;

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };

        let (credentials, host_port) = match authority.rsplit_once('@') {
            Some((credentials, host_port)) => (Some(credentials), host_port),
            None => (None, authority),
        };

        let (user, password) = match credentials {
            Some(credentials) => match credentials.split_once(':') {
                Some((user, password)) => (user.to_string(), password.to_string()),
                None => (credentials.to_string(), String::new()),
            },
            None => (ANONYMOUS_USER.to_string(), ANONYMOUS_PASSWORD.to_string()),
        };

        let (host, port) = match host_port.rsplit_once(':') {
            Some((host, port)) => (
                host,
                port.parse::<u16>()
                    .with_context(|| format!("Invalid port in {url}"))?,
            ),
            None => (host_port, FTP_PORT),
        };

        if host.is_empty() {
            anyhow::bail!("Missing host in {url}");
        }

        let path = match path.trim_end_matches('/') {
            "" => "/".to_string(),
            trimmed => trimmed.to_string(),
        };

        Ok(FtpTarget {
            host: host.to_string(),
            port,
            user,
            password,
            path,
        })
    }
}

impl fmt::Debug for FtpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpTarget")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for FtpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ftp://{}@{}:{}{}", self.user, self.host, self.port, self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Reply {
    code: u16,
    text: String,
}

impl Reply {
    fn is(&self, codes: &[u16]) -> bool {
        codes.contains(&self.code)
    }

    fn message(&self) -> &str {
        self.text.get(4..).unwrap_or("").trim()
    }

    fn expect(self, command: &str, codes: &[u16]) -> anyhow::Result<Self> {
        if self.is(codes) {
            Ok(self)
        } else {
            anyhow::bail!("{} failed: {} {}", command, self.code, self.message())
        }
    }
}

struct Control {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    timeout: Duration,
    /// Replies the server still owes; anything but zero means the stream is out of step.
    pending: usize,
}

impl Control {
    /// Connect, log in and switch to binary transfers.
    fn open(target: &FtpTarget, timeout: Duration) -> anyhow::Result<Self> {
        let mut control = Control::connect(target, timeout)?;
        control.login(&target.user, &target.password)?;
        control.send("TYPE I")?.expect("TYPE I", &[200])?;
        Ok(control)
    }

    fn connect(target: &FtpTarget, timeout: Duration) -> anyhow::Result<Self> {
        let addr = (target.host.as_str(), target.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| anyhow::anyhow!("Could not resolve {}", target.host))?;

        let stream = TcpStream::connect_timeout(&addr, timeout)
            .with_context(|| format!("Failed to connect to {addr}"))?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;

        let mut control = Control {
            reader: BufReader::new(stream.try_clone()?),
            writer: stream,
            timeout,
            pending: 1,
        };

        control.read_reply()?.expect("connect", &[220])?;
        Ok(control)
    }

    fn login(&mut self, user: &str, password: &str) -> anyhow::Result<()> {
        let reply = self.send(&format!("USER {user}"))?;
        if reply.is(&[230]) {
            return Ok(());
        }
        reply.expect("USER", &[331, 332])?;

        self.send(&format!("PASS {password}"))?
            .expect("PASS", &[230, 202])?;
        Ok(())
    }

    fn send(&mut self, command: &str) -> anyhow::Result<Reply> {
        if command.starts_with("PASS ") {
            tracing::trace!("ftp > PASS ****");
        } else {
            tracing::trace!("ftp > {command}");
        }

        self.pending += 1;
        self.writer.write_all(command.as_bytes())?;
        self.writer.write_all(b"\r\n")?;
        self.writer.flush()?;

        let reply = self.read_reply()?;
        tracing::trace!("ftp < {} {}", reply.code, reply.message());
        Ok(reply)
    }

    /// Read one reply, following `NNN-` continuation lines up to the closing `NNN `.
    fn read_reply(&mut self) -> anyhow::Result<Reply> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            anyhow::bail!("FTP connection closed");
        }

        let code = reply_code(&line)?;
        let mut text = line.clone();

        if line.as_bytes().get(3) == Some(&b'-') {
            loop {
                line.clear();
                if self.reader.read_line(&mut line)? == 0 {
                    anyhow::bail!("FTP connection closed inside a multi-line reply");
                }
                text.push_str(&line);
                if is_closing_line(&line, code) {
                    break;
                }
            }
        }

        self.pending = self.pending.saturating_sub(1);
        Ok(Reply { code, text })
    }

    fn in_step(&self) -> bool {
        self.pending == 0
    }

    fn open_data(&mut self) -> anyhow::Result<TcpStream> {
        let reply = self.send("PASV")?.expect("PASV", &[227])?;
        let addr = parse_pasv(&reply.text)
            .ok_or_else(|| anyhow::anyhow!("Malformed PASV reply: {}", reply.message()))?;

        let stream = TcpStream::connect_timeout(&SocketAddr::V4(addr), self.timeout)
            .with_context(|| format!("Failed to open data connection to {addr}"))?;
        stream.set_read_timeout(Some(self.timeout))?;
        Ok(stream)
    }

    /// Run a command that answers over a data connection and collect the payload.
    fn transfer(&mut self, command: &str) -> anyhow::Result<Vec<u8>> {
        let mut data = self.open_data()?;
        self.send(command)?.expect(command, &[125, 150])?;
        self.pending += 1;

        let mut payload = Vec::new();
        let received = data.read_to_end(&mut payload);
        drop(data);

        // the closing reply is owed even when the payload never arrived
        let closing = self.read_reply();
        received.with_context(|| format!("{command} transfer failed"))?;
        closing?.expect(command, &[226, 250])?;
        Ok(payload)
    }

    fn pwd(&mut self) -> anyhow::Result<String> {
        let reply = self.send("PWD")?.expect("PWD", &[257])?;

        reply
            .text
            .split('"')
            .nth(1)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Malformed PWD reply: {}", reply.message()))
    }

    fn size(&mut self, path: &str) -> anyhow::Result<Option<u64>> {
        let reply = self.send(&format!("SIZE {path}"))?;
        if reply.is(&[550]) {
            return Ok(None);
        }

        let reply = reply.expect("SIZE", &[213])?;
        let size = reply
            .message()
            .parse::<u64>()
            .with_context(|| format!("Malformed SIZE reply: {}", reply.message()))?;
        Ok(Some(size))
    }

    fn mdtm(&mut self, path: &str) -> anyhow::Result<i64> {
        let reply = self.send(&format!("MDTM {path}"))?.expect("MDTM", &[213])?;

        parse_mdtm(reply.message())
    }
}

/// A remote site reached over FTP.
///
/// All calls share one control connection, so the provider is used from one
/// thread at a time. A call that leaves the connection waiting on a reply (a
/// transfer that timed out, a reply cut short) drops it, and the next call logs
/// in again.
pub struct FtpSite {
    target: FtpTarget,
    timeout: Duration,
    control: RefCell<Option<Control>>,
}

impl FtpSite {
    pub fn connect(target: &FtpTarget, settings: &FtpSettings) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(settings.timeout_secs.max(1));
        let control = Control::open(target, timeout)?;

        tracing::info!(site = %target, "connected");

        Ok(FtpSite {
            target: target.clone(),
            timeout,
            control: RefCell::new(Some(control)),
        })
    }

    fn remote(path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }

    fn with_control<T>(
        &self,
        op: impl FnOnce(&mut Control) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let mut slot = self.control.borrow_mut();
        let mut control = match slot.take() {
            Some(control) => control,
            None => {
                tracing::debug!(site = %self.target, "reconnecting");
                Control::open(&self.target, self.timeout)?
            }
        };

        let result = op(&mut control);
        if control.in_step() {
            *slot = Some(control);
        } else {
            tracing::warn!(site = %self.target, "control connection out of step, dropping it");
        }

        result
    }
}

impl SiteProvider for FtpSite {
    fn location(&self) -> String {
        self.target.to_string()
    }

    fn list(&self, dir: &Path) -> anyhow::Result<Vec<String>> {
        let listing =
            self.with_control(|control| control.transfer(&format!("NLST {}", Self::remote(dir))))?;

        Ok(parse_nlst(&String::from_utf8_lossy(&listing)))
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.with_control(|control| {
            let original = control.pwd()?;
            let entered = control.send(&format!("CWD {}", Self::remote(path)))?;
            if !entered.is(&[250]) {
                return Ok(false);
            }
            control
                .send(&format!("CWD {original}"))?
                .expect("CWD", &[250])?;
            Ok(true)
        })
        .unwrap_or(false)
    }

    fn exists(&self, path: &Path) -> bool {
        let sized = self
            .with_control(|control| control.size(&Self::remote(path)))
            .map(|size| size.is_some())
            .unwrap_or(false);

        sized || self.is_directory(path)
    }

    fn stat(&self, path: &Path) -> anyhow::Result<Option<SiteStat>> {
        let remote = Self::remote(path);

        self.with_control(|control| match control.size(&remote)? {
            Some(size) => {
                let mtime = control.mdtm(&remote)?;
                Ok(Some(SiteStat::new(size, mtime)))
            }
            None => Ok(None),
        })
    }

    fn open_read(&self, path: &Path) -> anyhow::Result<Box<dyn Read + '_>> {
        let data =
            self.with_control(|control| control.transfer(&format!("RETR {}", Self::remote(path))))?;

        Ok(Box::new(Bytes::from(data).reader()))
    }
}

impl Drop for FtpSite {
    fn drop(&mut self) {
        if let Some(control) = self.control.get_mut() {
            let _ = control.send("QUIT");
        }
    }
}

fn reply_code(line: &str) -> anyhow::Result<u16> {
    line.get(..3)
        .filter(|code| code.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| anyhow::anyhow!("Malformed FTP reply: {}", line.trim_end()))
}

fn is_closing_line(line: &str, code: u16) -> bool {
    line.len() >= 4 && line.as_bytes()[3] == b' ' && reply_code(line).ok() == Some(code)
}

/// Parse `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2)`.
fn parse_pasv(reply: &str) -> Option<SocketAddrV4> {
    let start = reply.find('(')?;
    let end = reply[start..].find(')')? + start;

    let nums = reply[start + 1..end]
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    match nums.as_slice() {
        [h1, h2, h3, h4, p1, p2] => Some(SocketAddrV4::new(
            Ipv4Addr::new(*h1, *h2, *h3, *h4),
            u16::from(*p1) * 256 + u16::from(*p2),
        )),
        _ => None,
    }
}

/// Parse an `MDTM` timestamp (`YYYYMMDDhhmmss[.fff]`, UTC) into epoch seconds.
fn parse_mdtm(value: &str) -> anyhow::Result<i64> {
    let digits = value
        .get(..14)
        .ok_or_else(|| anyhow::anyhow!("Malformed MDTM value: {value}"))?;

    let time = NaiveDateTime::parse_from_str(digits, MDTM_FORMAT)
        .with_context(|| format!("Malformed MDTM value: {value}"))?;
    Ok(time.and_utc().timestamp())
}

/// `NLST` answers with one name per line, sometimes prefixed with the listed path.
fn parse_nlst(listing: &str) -> Vec<String> {
    let mut names = listing
        .lines()
        .map(str::trim)
        .filter_map(|line| line.rsplit('/').next())
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
        .collect::<Vec<_>>();

    names.sort();
    names.dedup();
    names
}
