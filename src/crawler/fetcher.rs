//! HTTP fetcher implementation
//!
//! This module defines the gateway the crawler uses for all network access:
//! - The [`Fetch`] trait, so the crawl engine can run over any transport
//! - [`HttpFetcher`], the reqwest-backed implementation
//! - Redirect following with hop counting
//! - Classification of failed requests into [`FetchFailure`] values

use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client, Response};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// HTTP method used for a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMethod {
    Get,
    /// Lightweight probe; the body is not read
    Head,
}

/// A successful response
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Response body (empty for HEAD)
    pub body: String,

    /// HTTP status code of the final response
    pub status_code: u16,

    /// URL of the final response, after redirects
    pub effective_url: Url,

    /// Number of redirects followed to reach `effective_url`
    pub redirect_count: usize,

    /// Content-Type header value, if any
    pub content_type: Option<String>,
}

impl Fetched {
    /// Returns true if the transport followed at least one redirect
    pub fn redirected(&self) -> bool {
        self.redirect_count > 0
    }

    /// Returns false only when a Content-Type is present and is not `text/html`
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(true, |value| value.to_ascii_lowercase().contains("text/html"))
    }
}

/// Reasons a fetch produced no usable response
///
/// These are ordinary results; the crawler records them on the page as
/// "not accessible" and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("returned error code {0}")]
    Status(u16),

    #[error("returned empty body")]
    EmptyBody,

    #[error("exceeded {0} redirects")]
    TooManyRedirects(usize),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Transport used by the crawler
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches `url`, following redirects
    ///
    /// Timeouts, non-2xx statuses and empty GET bodies are reported as
    /// [`FetchFailure`] values rather than panics.
    async fn fetch(&self, url: &Url, method: FetchMethod) -> Result<Fetched, FetchFailure>;
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are disabled on the client; [`HttpFetcher`] follows them itself so it can
/// count hops.
///
/// # Example
///
/// ```no_run
/// use lame_sitemapper::config::HttpConfig;
/// use lame_sitemapper::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`Fetch`] implementation
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_redirects: usize,
}

impl HttpFetcher {
    /// Creates a fetcher from HTTP settings
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            max_redirects: config.max_redirects,
        })
    }

    /// Creates a fetcher around an existing client
    ///
    /// The client should have redirects disabled, otherwise hop counts are always 0.
    pub fn with_client(client: Client, max_redirects: usize) -> Self {
        Self {
            client,
            max_redirects,
        }
    }

    async fn send(&self, url: &Url, method: FetchMethod) -> Result<Response, FetchFailure> {
        let request = match method {
            FetchMethod::Get => self.client.get(url.clone()),
            FetchMethod::Head => self.client.head(url.clone()),
        };

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                tracing::warn!("resource at {} timed-out", url);
                FetchFailure::Timeout
            } else {
                tracing::warn!("resource at {} failed: {}", url, e);
                FetchFailure::Transport(e.to_string())
            }
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    /// # Request Flow
    ///
    /// 1. Send the request
    /// 2. On a 3xx with a `Location` header, resolve it against the current URL and
    ///    repeat, up to `max_redirects` hops
    /// 3. Non-2xx final status → [`FetchFailure::Status`]
    /// 4. GET with an empty body → [`FetchFailure::EmptyBody`]
    async fn fetch(&self, url: &Url, method: FetchMethod) -> Result<Fetched, FetchFailure> {
        let mut current = url.clone();
        let mut redirect_count = 0;

        loop {
            let response = self.send(&current, method).await?;
            let status = response.status();

            if status.is_redirection() {
                if let Some(next) = redirect_target(&response, &current) {
                    redirect_count += 1;
                    if redirect_count > self.max_redirects {
                        tracing::warn!("resource at {} exceeded {} redirects", url, self.max_redirects);
                        return Err(FetchFailure::TooManyRedirects(self.max_redirects));
                    }
                    tracing::trace!("following redirect {} -> {}", current, next);
                    current = next;
                    continue;
                }
            }

            if !status.is_success() {
                tracing::warn!("resource at {} returned error code {}", current, status.as_u16());
                return Err(FetchFailure::Status(status.as_u16()));
            }

            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let body = match method {
                FetchMethod::Head => String::new(),
                FetchMethod::Get => response.text().await.map_err(|e| {
                    if e.is_timeout() {
                        tracing::warn!("resource at {} timed-out", current);
                        FetchFailure::Timeout
                    } else {
                        FetchFailure::Transport(e.to_string())
                    }
                })?,
            };

            if method == FetchMethod::Get && body.is_empty() {
                tracing::warn!("resource at {} returned empty body", current);
                return Err(FetchFailure::EmptyBody);
            }

            return Ok(Fetched {
                body,
                status_code: status.as_u16(),
                effective_url: current,
                redirect_count,
                content_type,
            });
        }
    }
}

/// Resolves the `Location` header of a redirect response
fn redirect_target(response: &Response, current: &Url) -> Option<Url> {
    let location = response.headers().get(header::LOCATION)?.to_str().ok()?;
    current.join(location).ok()
}
