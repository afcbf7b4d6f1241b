//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl setup and the collect loop that coordinates the
//! scraper workers:
//! - Normalizing the seed and resolving a redirected start address
//! - Loading robots.txt
//! - Spawning the worker pool
//! - Filing pages into the tree and queueing their anchors
//! - Detecting completion and stopping the workers

use crate::config::Config;
use crate::crawler::frontier::Frontier;
use crate::crawler::recursive::crawl_recursive;
use crate::crawler::tree::PageArena;
use crate::crawler::worker::{run_worker, ScrapeContext, ScrapeEvent, Task};
use crate::crawler::{Fetch, FetchMethod, HttpFetcher};
use crate::page::Page;
use crate::robots::RobotsGate;
use crate::url::{normalize_host, normalize_resource, with_default_scheme, HostPolicy};
use crate::{ConfigError, ConfigResult, CrawlError};
use dashmap::DashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Instrument;
use url::Url;

/// Knobs for a single crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Fetch robots.txt and skip the addresses it forbids
    pub use_robots: bool,

    /// Depth at which traversal stops (the seed is depth 0); at least 1
    pub max_depth: usize,

    /// Number of scraper workers; at least 1
    pub worker_count: usize,

    pub host_policy: HostPolicy,

    /// Agent matched against robots.txt groups
    pub user_agent: String,
}

impl CrawlOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            use_robots: config.crawler.use_robots,
            max_depth: config.crawler.max_depth,
            worker_count: config.crawler.scraper_threads,
            host_policy: config.crawler.host_policy,
            user_agent: config.http.user_agent.clone(),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_depth < 1 {
            return Err(ConfigError::Validation("max depth must be >= 1".to_string()));
        }
        if self.worker_count < 1 {
            return Err(ConfigError::Validation("worker count must be >= 1".to_string()));
        }
        Ok(())
    }
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Root of the page tree; `None` if the seed itself produced no page
    pub root: Option<Page>,

    /// Normalized start address, after any redirect of the seed
    pub start_url: Url,
}

impl CrawlOutcome {
    /// Number of pages in the tree
    pub fn page_count(&self) -> usize {
        self.root.as_ref().map_or(0, Page::count)
    }
}

/// Crawls one host starting from a seed address
///
/// # Example
///
/// ```no_run
/// use lame_sitemapper::{Config, Crawler};
///
/// # async fn example() -> Result<(), lame_sitemapper::CrawlError> {
/// let crawler = Crawler::from_config(&Config::default())?;
/// let outcome = crawler.run("www.example.com").await?;
/// for page in outcome.root.iter().flat_map(|root| root.iter()) {
///     println!("{}", page.path());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Crawler {
    fetcher: Arc<dyn Fetch>,
    options: CrawlOptions,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn Fetch>, options: CrawlOptions) -> Self {
        Self { fetcher, options }
    }

    /// Creates a crawler backed by an [`HttpFetcher`]
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let fetcher = HttpFetcher::new(&config.http)?;
        Ok(Self::new(Arc::new(fetcher), CrawlOptions::from_config(config)))
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// Runs the crawl with the worker pool
    ///
    /// # Crawl Flow
    ///
    /// 1. Normalize the seed into a host and a start address
    /// 2. Load robots.txt, if enabled (failure → [`CrawlError::RobotsUnavailable`])
    /// 3. HEAD the start address (failure → [`CrawlError::SeedUnreachable`]); if it
    ///    redirects, the crawl continues from the redirect target, under the target
    ///    host's robots.txt when the host changed
    /// 4. Spawn the workers and collect their pages until all work is done
    /// 5. Stop the workers and assemble the page tree
    ///
    /// Children of a page appear in the order their fetches completed, so sibling
    /// order varies between runs when more than one worker is used.
    pub async fn run(&self, seed: &str) -> crate::Result<CrawlOutcome> {
        let (ctx, start_url) = self.prepare(seed).await?;
        let root = self.crawl_pool(ctx, &start_url).await;
        Ok(CrawlOutcome { root, start_url })
    }

    /// Runs the crawl depth-first on the calling task
    ///
    /// Setup and per-address behavior match [`Crawler::run`]; children appear in the
    /// order their anchors occur in the markup. `worker_count` is ignored.
    pub async fn run_recursive(&self, seed: &str) -> crate::Result<CrawlOutcome> {
        let (ctx, start_url) = self.prepare(seed).await?;
        let root = crawl_recursive(&ctx, &start_url).await;
        Ok(CrawlOutcome { root, start_url })
    }

    async fn prepare(&self, seed: &str) -> crate::Result<(ScrapeContext, Url)> {
        self.options.validate()?;
        let policy = self.options.host_policy;

        let invalid = |seed: &str, source| CrawlError::InvalidSeed {
            seed: seed.to_string(),
            source,
        };

        let mut host = normalize_host(seed, policy).map_err(|e| invalid(seed, e))?;
        let mut start_url =
            normalize_resource(&host, &with_default_scheme(seed.trim()), policy).map_err(|e| invalid(seed, e))?;

        let mut robots = self.load_robots(&host).await?;

        let head = self
            .fetcher
            .fetch(&start_url, FetchMethod::Head)
            .await
            .map_err(|failure| {
                tracing::error!("unable to fetch starting url {}: {}", start_url, failure);
                CrawlError::SeedUnreachable {
                    url: start_url.to_string(),
                }
            })?;

        if head.redirected() {
            let effective = head.effective_url.as_str();
            let redirected_host = normalize_host(effective, policy).map_err(|e| invalid(effective, e))?;
            start_url = normalize_resource(&redirected_host, effective, policy).map_err(|e| invalid(effective, e))?;
            tracing::info!("starting url redirected to {}", start_url);

            if redirected_host != host {
                robots = self.load_robots(&redirected_host).await?;
                host = redirected_host;
            }
        }

        let ctx = ScrapeContext {
            host,
            fetcher: Arc::clone(&self.fetcher),
            robots,
            visited: Arc::new(DashSet::new()),
            max_depth: self.options.max_depth,
            host_policy: policy,
        };

        Ok((ctx, start_url))
    }

    /// Fetches the rules for `host` when robots.txt is honored
    async fn load_robots(&self, host: &Url) -> crate::Result<Option<Arc<RobotsGate>>> {
        if !self.options.use_robots {
            return Ok(None);
        }

        let gate = RobotsGate::fetch(self.fetcher.as_ref(), host, &self.options.user_agent).await?;
        if let Some(delay) = gate.crawl_delay() {
            tracing::info!("robots.txt requests a crawl delay of {:?}", delay);
        }
        Ok(Some(Arc::new(gate)))
    }

    /// Collect loop
    ///
    /// The crawl is done when the frontier is empty, every worker is parked and the
    /// result channel is drained. Only this loop pushes tasks, and workers send their
    /// result before parking again, so that state cannot change once observed.
    async fn crawl_pool(&self, ctx: ScrapeContext, start_url: &Url) -> Option<Page> {
        let workers = self.options.worker_count;
        let ctx = Arc::new(ctx);
        let frontier = Arc::new(Frontier::new());
        let (results_tx, mut results) = mpsc::unbounded_channel();

        frontier.push(Task {
            address: start_url.to_string(),
            depth: 0,
            parent: None,
        });

        tracing::debug!("starting {} scrapers", workers);
        let handles: Vec<_> = (0..workers)
            .map(|id| {
                let worker = run_worker(Arc::clone(&ctx), Arc::clone(&frontier), results_tx.clone());
                tokio::spawn(worker.instrument(tracing::info_span!("scraper", id)))
            })
            .collect();
        drop(results_tx);

        let mut arena = PageArena::default();

        loop {
            if frontier.is_idle(workers) {
                match results.try_recv() {
                    Ok(event) => {
                        attach(event, &mut arena, &frontier);
                        continue;
                    }
                    Err(_) => break,
                }
            }

            tokio::select! {
                event = results.recv() => match event {
                    Some(event) => attach(event, &mut arena, &frontier),
                    None => break,
                },
                _ = frontier.parked_changed() => {}
            }
        }

        tracing::debug!("all scrapers idle, stopping");
        frontier.close();
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("scraper task failed: {}", e);
            }
        }

        arena.into_tree()
    }
}

/// Files a page under its parent and queues its anchors one level deeper
fn attach(event: ScrapeEvent, arena: &mut PageArena, frontier: &Frontier<Task>) {
    let ScrapeEvent { page, depth, parent } = event;
    log_created(&page, depth);

    let id = arena.insert(page, parent);
    for address in arena.get(id).map(Page::anchors).unwrap_or_default() {
        frontier.push(Task {
            address: address.clone(),
            depth: depth + 1,
            parent: Some(id),
        });
    }

    if arena.len() % 100 == 0 {
        tracing::info!("Progress: {} pages, {} addresses queued", arena.len(), frontier.len());
    }
}

pub(crate) fn log_created(page: &Page, depth: usize) {
    if page.is_scraped() {
        tracing::info!(
            depth,
            "created at {}: a({}), img({}), link({}), script({})",
            page.path(),
            page.anchors().len(),
            page.images().len(),
            page.links().len(),
            page.scripts().len()
        );
    } else {
        tracing::info!(depth, "created at {}: {}", page.path(), page.status());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.crawler.scraper_threads = 4;
        config.crawler.max_depth = 2;
        config.crawler.use_robots = false;
        config.http.user_agent = "TestBot".to_string();

        let options = CrawlOptions::from_config(&config);
        assert_eq!(options.worker_count, 4);
        assert_eq!(options.max_depth, 2);
        assert!(!options.use_robots);
        assert_eq!(options.user_agent, "TestBot");
        assert_eq!(options.host_policy, HostPolicy::PublicSuffix);
    }

    #[test]
    fn test_options_validation() {
        assert!(CrawlOptions::default().validate().is_ok());

        let zero_depth = CrawlOptions {
            max_depth: 0,
            ..CrawlOptions::default()
        };
        assert!(zero_depth.validate().is_err());

        let zero_workers = CrawlOptions {
            worker_count: 0,
            ..CrawlOptions::default()
        };
        assert!(zero_workers.validate().is_err());
    }

    #[test]
    fn test_crawler_from_config() {
        let crawler = Crawler::from_config(&Config::default()).unwrap();
        assert_eq!(crawler.options(), &CrawlOptions::default());
    }

    #[test]
    fn test_attach_queues_anchors_one_level_deeper() {
        let frontier = Frontier::new();
        let mut arena = PageArena::default();

        let mut page = Page::new(Url::parse("http://www.example.com/").unwrap());
        page.set_extracted(crate::crawler::Extracted {
            anchors: vec!["/a".to_string(), "/b".to_string()],
            ..Default::default()
        });
        attach(
            ScrapeEvent {
                page,
                depth: 0,
                parent: None,
            },
            &mut arena,
            &frontier,
        );

        assert_eq!(arena.len(), 1);
        assert_eq!(frontier.len(), 2);
    }

    // End-to-end crawls are covered in tests/crawl_tests.rs
}
