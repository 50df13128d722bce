//! Link checking
//!
//! - `scanner`: finds `http(s)://` URLs in text and counts the ones that fail
//! - `validator`: the `LinkValidator` seam and its HTTP implementation

pub mod scanner;
pub mod validator;

pub use scanner::{FoundLink, LinkScanner};
pub use validator::{HttpLinkValidator, LinkClass, LinkStatus, LinkValidator};
