use crate::url::HostPolicy;
use serde::Deserialize;

/// Main configuration structure for Lame-Sitemapper
///
/// Every key has a default, so an empty file (or no file at all) is a valid
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Depth at which traversal stops; the seed is at depth 0
    pub max_depth: usize,

    /// Number of concurrent scraper workers
    pub scraper_threads: usize,

    /// Whether robots.txt is fetched and honored
    pub use_robots: bool,

    /// Which hosts count as valid crawl targets
    pub host_policy: HostPolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            scraper_threads: 1,
            use_robots: true,
            host_policy: HostPolicy::PublicSuffix,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// User-Agent header, also the agent matched against robots.txt
    pub user_agent: String,

    /// Total request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Redirect hops followed before a fetch fails
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
        }
    }
}
