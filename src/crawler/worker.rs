//! Scraper worker
//!
//! A worker turns one frontier task into at most one [`Page`]:
//!
//! 1. Normalize the address against the crawl host (malformed → dropped)
//! 2. Claim it in the visited index (already claimed → dropped)
//! 3. Policy gate: external domain, robots.txt, depth limit
//! 4. GET the page (failure → not accessible)
//! 5. Content-Type check (not HTML → not html)
//! 6. On redirect, correct the path, re-claim and re-run the policy gate
//! 7. Extract anchors, images, links and scripts

use crate::crawler::frontier::Frontier;
use crate::crawler::tree::PageId;
use crate::crawler::{extract_attributes, Fetch, FetchMethod};
use crate::page::Page;
use crate::robots::RobotsGate;
use crate::url::{dedup_key, normalize_resource, same_domain, HostPolicy};
use dashmap::DashSet;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

/// An address waiting in the frontier
#[derive(Debug, Clone)]
pub(crate) struct Task {
    /// Raw address as found in the parent's markup
    pub address: String,
    pub depth: usize,
    /// Page whose markup contained the address; `None` for the seed
    pub parent: Option<PageId>,
}

/// A page produced by a worker, on its way to the coordinator
#[derive(Debug)]
pub(crate) struct ScrapeEvent {
    pub page: Page,
    pub depth: usize,
    pub parent: Option<PageId>,
}

/// Everything a worker needs to scrape a task, shared by all workers of a crawl
pub(crate) struct ScrapeContext {
    pub host: Url,
    pub fetcher: Arc<dyn Fetch>,
    pub robots: Option<Arc<RobotsGate>>,
    pub visited: Arc<DashSet<String>>,
    pub max_depth: usize,
    pub host_policy: HostPolicy,
}

impl ScrapeContext {
    /// Claims `url` in the visited index; false if it was already claimed
    fn claim(&self, url: &Url) -> bool {
        self.visited.insert(dedup_key(url))
    }

    /// Marks the page with the first stop reason that applies; true if none did
    fn admit(&self, page: &mut Page, depth: usize) -> bool {
        if !same_domain(&self.host, page.path()) {
            tracing::debug!("stopping at {}, external domain", page.path());
            page.set_external_domain(true);
            return false;
        }

        if let Some(robots) = &self.robots {
            if robots.disallowed(page.path()) {
                tracing::debug!("stopping at {}, forbidden by robots.txt", page.path());
                page.set_robots_forbidden(true);
                return false;
            }
        }

        if depth >= self.max_depth {
            tracing::debug!("stopping at {}, depth {} reached", page.path(), depth);
            page.set_depth_reached(true);
            return false;
        }

        true
    }
}

/// Scrapes one address found at `depth`
///
/// Returns `None` for malformed and already claimed addresses; every other outcome is
/// a page, either fully scraped or carrying the reason traversal stopped there.
pub(crate) async fn scrape(ctx: &ScrapeContext, address: &str, depth: usize) -> Option<Page> {
    let url = match normalize_resource(&ctx.host, address, ctx.host_policy) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("skipping {:?}: {}", address, e);
            return None;
        }
    };

    if !ctx.claim(&url) {
        tracing::trace!("already seen {}", url);
        return None;
    }

    let mut page = Page::new(url);
    if !ctx.admit(&mut page, depth) {
        return Some(page);
    }

    if let Some(robots) = &ctx.robots {
        robots.wait_turn().await;
    }

    let response = match ctx.fetcher.fetch(page.path(), FetchMethod::Get).await {
        Ok(response) => response,
        Err(failure) => {
            tracing::debug!("stopping at {}, {}", page.path(), failure);
            page.set_not_accessible(true);
            return Some(page);
        }
    };

    if !response.is_html() {
        tracing::debug!(
            "stopping at {}, content type {}",
            page.path(),
            response.content_type.as_deref().unwrap_or_default()
        );
        page.set_not_html(true);
        return Some(page);
    }

    if response.redirected() {
        let target = match normalize_resource(&ctx.host, response.effective_url.as_str(), ctx.host_policy) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!("unable to follow redirect {} -> {}: {}", page.path(), response.effective_url, e);
                return Some(page);
            }
        };

        tracing::debug!("redirected {} -> {}", page.path(), target);
        let same_resource = dedup_key(&target) == dedup_key(page.path());
        page.redirect_to(target);

        if !same_resource && !ctx.claim(page.path()) {
            tracing::trace!("already seen {}", page.path());
            return None;
        }
        if !ctx.admit(&mut page, depth) {
            return Some(page);
        }
    }

    page.set_extracted(extract_attributes(&response.body));
    Some(page)
}

/// Worker loop: scrape tasks until the frontier is closed
///
/// Results are sent before the next `pop`, which the coordinator's idle check relies
/// on.
pub(crate) async fn run_worker(
    ctx: Arc<ScrapeContext>,
    frontier: Arc<Frontier<Task>>,
    results: UnboundedSender<ScrapeEvent>,
) {
    tracing::debug!("running");

    while let Some(task) = frontier.pop().await {
        let Some(page) = scrape(&ctx, &task.address, task.depth).await else {
            continue;
        };

        let event = ScrapeEvent {
            page,
            depth: task.depth,
            parent: task.parent,
        };
        if results.send(event).is_err() {
            break;
        }
    }

    tracing::debug!("received finish message");
}
