//! Where the compared trees live
//!
//! This module contains everything that touches a site's storage:
//!
//! - `site`: the `SiteProvider` seam and opening a site from a CLI argument
//! - `local_site`: sites on the local filesystem
//! - `ftp_site`: sites behind an FTP endpoint
//! - `session`: high-level command coordination and report output

pub mod ftp_site;
pub mod local_site;
pub mod session;
pub mod site;
