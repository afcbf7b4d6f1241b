//! Robots.txt handling module
//!
//! A crawl fetches the host's robots.txt once, before any page is requested, and
//! consults it for every address that passes the domain check. The file is fetched
//! through the same [`Fetch`] gateway as pages, so tests can serve it from fixtures.
//!
//! If the file declares a `Crawl-delay` for our agent, page fetches are spaced by at
//! least that much across all workers.

mod parser;

pub use parser::RobotsRules;

use crate::crawler::{Fetch, FetchFailure, FetchMethod};
use crate::CrawlError;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

/// Robots.txt rules bound to one crawl host and user agent
#[derive(Debug)]
pub struct RobotsGate {
    rules: RobotsRules,
    user_agent: String,
    crawl_delay: Option<Duration>,
    next_slot: Mutex<Option<Instant>>,
}

impl RobotsGate {
    /// Creates a gate from already fetched rules
    pub fn new(rules: RobotsRules, user_agent: &str) -> Self {
        let crawl_delay = rules.crawl_delay(user_agent).filter(|delay| !delay.is_zero());

        Self {
            rules,
            user_agent: user_agent.to_string(),
            crawl_delay,
            next_slot: Mutex::new(None),
        }
    }

    /// Fetches `<host>/robots.txt` and builds a gate from it
    ///
    /// An empty file allows everything. Any other fetch failure is fatal for the
    /// crawl, since honoring robots.txt was requested and the rules are unknown.
    pub async fn fetch(fetcher: &dyn Fetch, host: &Url, user_agent: &str) -> crate::Result<Self> {
        let unavailable = || CrawlError::RobotsUnavailable {
            host: host.to_string(),
        };

        let location = host.join("/robots.txt").map_err(|_| unavailable())?;
        let rules = match fetcher.fetch(&location, FetchMethod::Get).await {
            Ok(response) => {
                tracing::debug!("loaded {} ({} bytes)", location, response.body.len());
                RobotsRules::from_content(&response.body)
            }
            // an empty robots.txt allows everything
            Err(FetchFailure::EmptyBody) => {
                tracing::debug!("{} is empty", location);
                RobotsRules::allow_all()
            }
            Err(failure) => {
                tracing::error!("unable to fetch {}: {}", location, failure);
                return Err(unavailable());
            }
        };

        Ok(Self::new(rules, user_agent))
    }

    /// Returns true if robots.txt forbids fetching `url`
    pub fn disallowed(&self, url: &Url) -> bool {
        !self.rules.is_allowed(url.as_str(), &self.user_agent)
    }

    /// Crawl delay in effect for this crawl, if any
    pub fn crawl_delay(&self) -> Option<Duration> {
        self.crawl_delay
    }

    /// Waits until the next fetch slot allowed by `Crawl-delay`
    ///
    /// Returns immediately when no delay applies. Slots are handed out in order, so
    /// concurrent callers end up spaced by the delay.
    pub async fn wait_turn(&self) {
        let Some(delay) = self.crawl_delay else {
            return;
        };

        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next_slot.map_or(now, |next| next.max(now));
            *next_slot = Some(slot + delay);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}
