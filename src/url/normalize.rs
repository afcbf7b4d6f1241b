use super::{HostPolicy, SUPPORTED_SCHEMES};
use crate::{UrlError, UrlResult};
use std::borrow::Cow;
use url::Url;

/// Normalizes a crawl host according to Lame-Sitemapper's host rules
///
/// # Normalization Steps
///
/// 1. Assume `http` when the input carries no scheme (`example.com`, `//example.com`)
/// 2. Reject hosts containing whitespace
/// 3. Parse the URL; reject if malformed
/// 4. Reject schemes other than http and https
/// 5. Reject hosts the [`HostPolicy`] does not accept
/// 6. Drop path, query and fragment, leaving a root path `/`
///
/// Scheme and host are lowercased and default ports dropped by the parser; a
/// non-default port is kept.
///
/// # Examples
///
/// ```
/// use lame_sitemapper::url::{normalize_host, HostPolicy};
///
/// let host = normalize_host("WWW.Example.com/users?id=1#top", HostPolicy::PublicSuffix).unwrap();
/// assert_eq!(host.as_str(), "http://www.example.com/");
/// ```
pub fn normalize_host(raw: &str, policy: HostPolicy) -> UrlResult<Url> {
    let candidate = with_default_scheme(raw.trim());

    if authority(&candidate).chars().any(char::is_whitespace) {
        return Err(UrlError::Parse(format!("whitespace in host: {}", raw)));
    }

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;
    check_scope(&url, policy)?;

    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Normalizes a resource address found while crawling `host`
///
/// `raw` is resolved against `host` the way a browser resolves an href on the host's
/// root page, so protocol-relative (`//host/a`), root-relative (`/a`), relative (`a`,
/// `?q=1`) and absolute forms all inherit whatever scheme, host and port they lack.
///
/// # Normalization Steps
///
/// 1. Resolve against the host; reject if malformed
/// 2. Reject schemes other than http and https (`mailto:`, `javascript:`, ...)
/// 3. Reject hosts the [`HostPolicy`] does not accept
/// 4. Remove the fragment
/// 5. Sort query parameters by their raw encoded text
///
/// # Examples
///
/// ```
/// use lame_sitemapper::url::{normalize_host, normalize_resource, HostPolicy};
///
/// let host = normalize_host("https://www.example.com:8080", HostPolicy::PublicSuffix).unwrap();
/// let url = normalize_resource(&host, "/main?world=true&hello=1#intro", HostPolicy::PublicSuffix).unwrap();
/// assert_eq!(url.as_str(), "https://www.example.com:8080/main?hello=1&world=true");
/// ```
pub fn normalize_resource(host: &Url, raw: &str, policy: HostPolicy) -> UrlResult<Url> {
    let mut url = host.join(raw).map_err(|e| UrlError::Parse(e.to_string()))?;
    check_scope(&url, policy)?;

    url.set_fragment(None);

    let sorted = url.query().filter(|q| !q.is_empty()).map(sort_query);
    if let Some(query) = sorted {
        url.set_query(Some(&query));
    }

    Ok(url)
}

/// Prefixes `http://` to inputs that carry no scheme
pub(crate) fn with_default_scheme(raw: &str) -> Cow<'_, str> {
    if raw.contains("://") {
        Cow::Borrowed(raw)
    } else if raw.starts_with("//") {
        Cow::Owned(format!("http:{}", raw))
    } else {
        Cow::Owned(format!("http://{}", raw))
    }
}

/// Returns the authority part of an absolute URL string
fn authority(url: &str) -> &str {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

fn check_scope(url: &Url, policy: HostPolicy) -> UrlResult<()> {
    if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = url.host_str().ok_or(UrlError::MissingHost)?;
    if host.is_empty() {
        return Err(UrlError::MissingHost);
    }

    if !policy.accepts(host) {
        return Err(UrlError::UnregistrableHost(host.to_string()));
    }

    Ok(())
}

/// Sorts `&`-separated query pieces as raw text (no decoding, case-sensitive)
///
/// Trailing empty pieces are dropped, so `a=1&` sorts to `a=1`.
fn sort_query(query: &str) -> String {
    let mut params: Vec<&str> = query.split('&').collect();
    while params.last().is_some_and(|piece| piece.is_empty()) {
        params.pop();
    }

    let mut params: Vec<&str> = params.into_iter().map(str::trim).collect();
    params.sort();
    params.join("&")
}
