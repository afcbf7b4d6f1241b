//! In-memory site used by the integration tests
//!
//! A [`FixtureSite`] serves canned pages for one or more hosts through the crawler's
//! [`Fetch`] trait, so crawls run without sockets and with exact control over
//! redirects, content types and failures.

#![allow(dead_code)]

use async_trait::async_trait;
use lame_sitemapper::crawler::{Fetch, FetchFailure, FetchMethod, Fetched};
use lame_sitemapper::Page;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

pub const HOST: &str = "http://www.example.com/";

#[derive(Debug, Clone)]
enum Route {
    Body { content_type: String, body: String },
    Redirect(Url),
    Fail(FetchFailure),
}

/// Canned responses keyed by absolute URL; anything unknown is a 404
///
/// Like `HttpFetcher`, a GET of an empty body fails with [`FetchFailure::EmptyBody`].
#[derive(Debug)]
pub struct FixtureSite {
    base: Url,
    routes: HashMap<String, Route>,
    requests: Mutex<Vec<(FetchMethod, String)>>,
}

impl FixtureSite {
    pub fn new(base: &str) -> Self {
        Self {
            base: Url::parse(base).unwrap(),
            routes: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn url(&self, path: &str) -> Url {
        self.base.join(path).unwrap()
    }

    fn route(mut self, path: &str, route: Route) -> Self {
        let key = self.url(path).to_string();
        self.routes.insert(key, route);
        self
    }

    /// Serves `body` as `text/html`
    pub fn page(self, path: &str, body: &str) -> Self {
        self.typed(path, "text/html; charset=utf-8", body)
    }

    /// Serves an HTML page made of one anchor per entry of `anchors`
    pub fn links(self, path: &str, anchors: &[&str]) -> Self {
        let body: String = anchors
            .iter()
            .map(|href| format!(r#"<a href="{}">link</a>"#, href))
            .collect();
        self.page(path, &format!("<html><body>{}</body></html>", body))
    }

    pub fn typed(self, path: &str, content_type: &str, body: &str) -> Self {
        self.route(
            path,
            Route::Body {
                content_type: content_type.to_string(),
                body: body.to_string(),
            },
        )
    }

    pub fn robots(self, content: &str) -> Self {
        self.typed("/robots.txt", "text/plain", content)
    }

    /// Redirects `path` to `to`, which may be relative
    pub fn redirect(self, path: &str, to: &str) -> Self {
        let target = self.url(to);
        self.route(path, Route::Redirect(target))
    }

    pub fn failing(self, path: &str, failure: FetchFailure) -> Self {
        self.route(path, Route::Fail(failure))
    }

    /// Number of requests made for `path`
    pub fn hits(&self, path: &str) -> usize {
        let key = self.url(path).to_string();
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, url)| *url == key)
            .count()
    }

    pub fn requested(&self, method: FetchMethod, path: &str) -> bool {
        let key = self.url(path).to_string();
        self.requests
            .lock()
            .unwrap()
            .iter()
            .any(|(m, url)| *m == method && *url == key)
    }
}

#[async_trait]
impl Fetch for FixtureSite {
    async fn fetch(&self, url: &Url, method: FetchMethod) -> Result<Fetched, FetchFailure> {
        // give other workers a chance to interleave
        tokio::task::yield_now().await;

        let mut current = url.clone();
        let mut redirect_count = 0;

        loop {
            self.requests
                .lock()
                .unwrap()
                .push((method, current.to_string()));

            match self.routes.get(current.as_str()).cloned() {
                Some(Route::Redirect(next)) => {
                    redirect_count += 1;
                    if redirect_count > 10 {
                        return Err(FetchFailure::TooManyRedirects(10));
                    }
                    current = next;
                }
                Some(Route::Body { content_type, body }) => {
                    let body = match method {
                        FetchMethod::Get if body.is_empty() => return Err(FetchFailure::EmptyBody),
                        FetchMethod::Get => body,
                        FetchMethod::Head => String::new(),
                    };
                    return Ok(Fetched {
                        body,
                        status_code: 200,
                        effective_url: current,
                        redirect_count,
                        content_type: Some(content_type),
                    });
                }
                Some(Route::Fail(failure)) => return Err(failure),
                None => return Err(FetchFailure::Status(404)),
            }
        }
    }
}

/// Calls `visit` with every page of the tree and its depth
pub fn walk(root: &Page, visit: &mut impl FnMut(&Page, usize)) {
    fn inner(page: &Page, depth: usize, visit: &mut impl FnMut(&Page, usize)) {
        visit(page, depth);
        for child in page.children() {
            inner(child, depth + 1, visit);
        }
    }
    inner(root, 0, visit);
}

/// Sorted `(path, status bits)` pairs of every page in the tree
pub fn status_multiset(root: &Page) -> Vec<(String, u8)> {
    let mut pages: Vec<(String, u8)> = root
        .iter()
        .map(|page| (page.path().to_string(), page.status().bits()))
        .collect();
    pages.sort();
    pages
}

/// Asserts the invariants every crawl result must satisfy
pub fn assert_tree_invariants(root: &Page, max_depth: usize) {
    walk(root, &mut |page, depth| {
        assert!(depth <= max_depth, "{} found below max depth", page.path());

        if !page.is_scraped() {
            assert!(page.children().is_empty(), "{} has children", page.path());
            assert!(page.anchors().is_empty(), "{} has anchors", page.path());
            assert!(page.images().is_empty(), "{} has images", page.path());
            assert!(page.links().is_empty(), "{} has links", page.path());
            assert!(page.scripts().is_empty(), "{} has scripts", page.path());
        }

        if depth == max_depth {
            assert!(!page.is_scraped(), "{} scraped at max depth", page.path());
        } else {
            assert!(!page.depth_reached(), "{} stopped early", page.path());
        }
    });
}

/// A site whose pages each have a single shortest depth, so the resulting tree's page
/// set does not depend on the traversal strategy
///
/// ```text
/// /            -> /a /b /c, external, mailto, duplicate fragment, pdf
/// /a           -> /a/1 /shared /            (back link to the root)
/// /b           -> /b/1 /shared /missing     (/b/1 is forbidden by robots.txt)
/// /c           -> /shared?y=2&x=1 /c/1      (/c/1 redirects to /c/one)
/// layer 2      -> /deep/1 /deep/2 /deep/3
/// ```
pub fn layered_site() -> FixtureSite {
    FixtureSite::new(HOST)
        .robots("User-agent: *\nDisallow: /b/1\n")
        .page(
            "/",
            r#"<html><head>
                <link rel="stylesheet" href="/style.css">
                <script src="/app.js"></script>
            </head><body>
                <a href="/a">A</a>
                <a href="b">B</a>
                <a href="http://www.example.com/c">C</a>
                <a href="http://blog.example.com/">Blog</a>
                <a href="mailto:someone@example.com">Mail</a>
                <a href="/a#top">A again</a>
                <a href="/report.pdf">Report</a>
                <img src="/logo.png">
            </body></html>"#,
        )
        .links("/a", &["/a/1", "/shared", "/"])
        .links("/b", &["/b/1", "/shared", "/missing"])
        .links("/c", &["/shared?y=2&x=1", "/c/1"])
        .links("/a/1", &["/deep/1"])
        .links("/b/1", &["/deep/1", "/deep/2"])
        .links("/shared", &["/deep/2"])
        .links("/shared?x=1&y=2", &["/deep/3"])
        .redirect("/c/1", "/c/one")
        .links("/c/one", &["/deep/3"])
        .links("/deep/1", &["/deepest"])
        .links("/deep/2", &["/deepest"])
        .links("/deep/3", &["/deepest"])
        .typed("/report.pdf", "application/pdf", "%PDF-1.4")
}

/// Number of pages [`layered_site`] yields at max depth 3
pub const LAYERED_SITE_PAGES: usize = 15;
