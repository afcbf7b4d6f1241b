//! Single-task, depth-first crawl
//!
//! Visits each scraped page's anchors in markup order before moving to the next
//! sibling. Pages are produced by the same [`scrape`] step as the worker pool, so for
//! a given site both strategies find the same set of pages; only sibling order and
//! which of two equivalent addresses claims a page first may differ.

use crate::crawler::coordinator::log_created;
use crate::crawler::worker::{scrape, ScrapeContext};
use crate::page::Page;
use std::future::Future;
use std::pin::Pin;
use url::Url;

type Visit<'a> = Pin<Box<dyn Future<Output = Option<Page>> + Send + 'a>>;

pub(crate) async fn crawl_recursive(ctx: &ScrapeContext, start_url: &Url) -> Option<Page> {
    visit(ctx, start_url.to_string(), 0).await
}

fn visit(ctx: &ScrapeContext, address: String, depth: usize) -> Visit<'_> {
    Box::pin(async move {
        let mut page = scrape(ctx, &address, depth).await?;
        log_created(&page, depth);

        for anchor in page.anchors().to_vec() {
            if let Some(child) = visit(ctx, anchor, depth + 1).await {
                page.push_child(child);
            }
        }

        Some(page)
    })
}
