//! Lame-Sitemapper: a single-host site mapper
//!
//! This crate crawls one web host from a seed address and builds a tree of the pages
//! reachable on that host, recording the anchors, images, links and scripts of every
//! scraped page and the reason traversal stopped at every other one.

pub mod config;
pub mod crawler;
pub mod page;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for crawl runs
///
/// Only setup failures surface here. Per-address problems (malformed links, transport
/// errors, policy exclusions, duplicates) are absorbed into the page tree.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed address {seed}: {source}")]
    InvalidSeed { seed: String, source: UrlError },

    #[error("Unable to fetch robots.txt for {host}")]
    RobotsUnavailable { host: String },

    #[error("Unable to fetch starting url {url}")]
    SeedUnreachable { url: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl CrawlError {
    /// Process exit code reported for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::RobotsUnavailable { .. } => 1,
            Self::SeedUnreachable { .. } => 2,
            Self::Config(_) | Self::InvalidSeed { .. } | Self::Reqwest(_) => 3,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Host is not a registrable domain: {0}")]
    UnregistrableHost(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOptions, CrawlOutcome, Crawler};
pub use page::{Page, StopReasons};
pub use url::{normalize_host, normalize_resource, same_domain, HostPolicy};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let robots = CrawlError::RobotsUnavailable {
            host: "http://www.example.com/".to_string(),
        };
        let seed = CrawlError::SeedUnreachable {
            url: "http://www.example.com/".to_string(),
        };
        let invalid = CrawlError::InvalidSeed {
            seed: "ftp://example.com".to_string(),
            source: UrlError::InvalidScheme("ftp".to_string()),
        };

        assert_eq!(robots.exit_code(), 1);
        assert_eq!(seed.exit_code(), 2);
        assert_eq!(invalid.exit_code(), 3);
    }
}
