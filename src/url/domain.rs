use url::{Position, Url};

/// Returns true if both URLs point at exactly the same host
///
/// Ports are ignored, subdomains are not: `www.example.com` and `blog.example.com`
/// are different domains.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use lame_sitemapper::url::same_domain;
///
/// let host = Url::parse("https://www.example.com:8080/").unwrap();
/// assert!(same_domain(&host, &Url::parse("http://www.example.com/users").unwrap()));
/// assert!(!same_domain(&host, &Url::parse("http://blog.example.com/").unwrap()));
/// ```
pub fn same_domain(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str()
}

/// Key under which an address is claimed in the visited index
///
/// The scheme is left out so that `http://` and `https://` spellings of the same
/// resource collapse to one page.
pub fn dedup_key(url: &Url) -> String {
    url[Position::AfterScheme..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_domain_ignores_scheme_and_port() {
        let host = Url::parse("https://www.example.com:8080/").unwrap();
        let url = Url::parse("http://www.example.com/users?red_dwarf").unwrap();
        assert!(same_domain(&host, &url));
    }

    #[test]
    fn test_subdomains_are_distinct() {
        let host = Url::parse("https://www.example.com:8080/").unwrap();
        let url = Url::parse("http://blog.example.com/users?red_dwarf").unwrap();
        assert!(!same_domain(&host, &url));
    }

    #[test]
    fn test_dedup_key_ignores_scheme() {
        let http = Url::parse("http://www.example.com/a?x=1").unwrap();
        let https = Url::parse("https://www.example.com/a?x=1").unwrap();
        assert_eq!(dedup_key(&http), dedup_key(&https));
        assert_eq!(dedup_key(&http), "://www.example.com/a?x=1");
    }

    #[test]
    fn test_dedup_key_distinguishes_paths_and_ports() {
        let a = Url::parse("http://www.example.com/a").unwrap();
        let b = Url::parse("http://www.example.com/b").unwrap();
        let port = Url::parse("http://www.example.com:8080/a").unwrap();
        assert_ne!(dedup_key(&a), dedup_key(&b));
        assert_ne!(dedup_key(&a), dedup_key(&port));
    }
}
