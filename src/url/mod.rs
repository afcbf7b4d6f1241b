//! URL handling module for Lame-Sitemapper
//!
//! This module decides which addresses belong to a crawl and what form they take:
//! host and resource normalization, same-domain scope, and the scheme-insensitive
//! key used to deduplicate visited addresses.
//!
//! Every function here is pure. Malformed input comes back as an [`UrlError`] so that
//! workers can drop it without any locking or unwinding.
//!
//! [`UrlError`]: crate::UrlError

mod domain;
mod normalize;

use serde::Deserialize;
use std::net::IpAddr;

// Re-export main functions
pub use domain::{dedup_key, same_domain};
pub use normalize::{normalize_host, normalize_resource};
pub(crate) use normalize::with_default_scheme;

/// Schemes a crawl is allowed to follow
pub const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// Decides whether a host name is acceptable as a crawl target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostPolicy {
    /// The host must end in a suffix from the public suffix list and have a
    /// registrable label in front of it. IP literals are rejected.
    #[default]
    PublicSuffix,
    /// Any syntactically valid host is accepted (loopback servers, intranets)
    Any,
}

impl HostPolicy {
    /// Returns true if `host` may be crawled under this policy
    ///
    /// # Examples
    ///
    /// ```
    /// use lame_sitemapper::url::HostPolicy;
    ///
    /// assert!(HostPolicy::PublicSuffix.accepts("www.example.com"));
    /// assert!(!HostPolicy::PublicSuffix.accepts("www.example.wrong"));
    /// assert!(HostPolicy::Any.accepts("127.0.0.1"));
    /// ```
    pub fn accepts(&self, host: &str) -> bool {
        match self {
            Self::Any => !host.is_empty(),
            Self::PublicSuffix => {
                let bare = host.trim_start_matches('[').trim_end_matches(']');
                if bare.parse::<IpAddr>().is_ok() {
                    return false;
                }

                psl::domain(host.as_bytes())
                    .map(|domain| domain.suffix().is_known())
                    .unwrap_or(false)
            }
        }
    }
}
